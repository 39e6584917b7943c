use crate::card::Card;
use crate::error::GameError;
use crate::meld::{self, MeldAnalysis};
use crate::rules::HAND_SIZE;
use serde::{Deserialize, Serialize};

/// 一位玩家的手牌
///
/// 平时 10 张，摸牌之后、弃牌之前是 11 张。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Hand::default()
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        Hand { cards }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, card: &Card) -> bool {
        self.cards.contains(card)
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn remove(&mut self, card: &Card) -> Result<(), GameError> {
        let pos = self.cards.iter().position(|c| c == card).ok_or(GameError::CardNotInHand(*card))?;
        self.cards.remove(pos);
        Ok(())
    }

    pub fn analysis(&self) -> MeldAnalysis {
        meld::analyze(&self.cards)
    }

    pub fn deadwood_value(&self) -> u32 {
        meld::deadwood_value(&self.cards)
    }

    /// 10 张牌全部成组
    pub fn is_gin(&self) -> bool {
        self.cards.len() == HAND_SIZE && self.deadwood_value() == 0
    }

    /// 摸牌后 11 张牌全部成组，不需要弃牌
    pub fn is_big_gin(&self) -> bool {
        self.cards.len() == HAND_SIZE + 1 && self.deadwood_value() == 0
    }

    /// 去掉 `card` 之后剩余牌的 deadwood
    pub fn deadwood_without(&self, card: &Card) -> u32 {
        let rest: Vec<Card> = self.cards.iter().filter(|c| *c != card).copied().collect();
        meld::deadwood_value(&rest)
    }

    /// 11 张牌时，弃掉哪张能让剩下 10 张的 deadwood 最小
    pub fn best_discard(&self) -> Option<(Card, u32)> {
        if self.cards.len() != HAND_SIZE + 1 {
            return None;
        }
        self.cards
            .iter()
            .map(|c| (*c, self.deadwood_without(c)))
            .min_by_key(|&(c, value)| (value, std::cmp::Reverse(c.points())))
    }
}
