use crate::card::{Card, Deck, DECK_SIZE};
use crate::error::GameError;
use crate::hand::Hand;
use crate::rules::{Rules, HAND_SIZE};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type SessionId = Uuid;

/// 座位。玩家身份在建局时解析成座位，引擎内部只认座位，不认名字。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seat {
    One,
    Two,
}

impl Seat {
    pub const BOTH: [Seat; 2] = [Seat::One, Seat::Two];

    pub fn index(self) -> usize {
        match self {
            Seat::One => 0,
            Seat::Two => 1,
        }
    }

    pub fn other(self) -> Seat {
        match self {
            Seat::One => Seat::Two,
            Seat::Two => Seat::One,
        }
    }

    pub fn from_index(idx: usize) -> Option<Seat> {
        match idx {
            0 => Some(Seat::One),
            1 => Some(Seat::Two),
            _ => None,
        }
    }

    /// 随机选出第一手的庄家；给定种子时结果可复现
    pub fn random_dealer(seed: Option<u64>) -> Seat {
        // 与洗牌用的随机流错开
        let pick_two = match seed {
            Some(s) => StdRng::seed_from_u64(s ^ 0x9e37_79b9_7f4a_7c15).random_bool(0.5),
            None => rand::rng().random_bool(0.5),
        };
        if pick_two { Seat::Two } else { Seat::One }
    }
}

/// 一手牌的结束方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Gin(Seat),
    BigGin(Seat),
    Knock(Seat),
    /// 牌堆摸空，不计分
    Stalemate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// 等待该座位摸牌
    AwaitingDraw(Seat),
    /// 该座位已摸牌 (11 张)，等待弃牌或敲牌
    AwaitingDiscard(Seat),
    Finished(Outcome),
}

/// 玩家发起的动作，被拒绝时随错误一起返回
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Draw { from_discard_pile: bool },
    Discard(Card),
    /// 敲牌时同时弃掉的那张牌
    Knock(Card),
}

/// 摸牌的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawOutcome {
    Drew(Card),
    /// 摸到的牌让 11 张全部成组，本手直接结束
    BigGin(Card),
    /// 牌堆已空，本手以和局结束
    Stalemate,
}

/// 一手金拉米的完整状态
///
/// 牌堆、两家手牌和弃牌堆都归它所有，任何时刻合计 52 张。
/// 当前该谁行动记录在 `phase` 里。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    pub(crate) id: SessionId,
    pub(crate) dealer: Seat,
    pub(crate) rules: Rules,
    pub(crate) hands: [Hand; 2],
    pub(crate) deck: Deck,
    // 最后一个元素是翻开的那张
    pub(crate) discard_pile: Vec<Card>,
    pub(crate) phase: Phase,
}

impl GameSession {
    /// 用给定的牌堆开一手牌
    ///
    /// - 从非庄家开始轮流各发 10 张
    /// - 翻开一张作为弃牌堆的第一张
    /// - 非庄家先行动
    pub fn new(id: SessionId, dealer: Seat, rules: Rules, mut deck: Deck) -> Result<Self, GameError> {
        if deck.remaining() != DECK_SIZE {
            return Err(GameError::InvalidDeck(format!("开局需要完整的牌堆，实际剩余 {} 张", deck.remaining())));
        }

        let starter = dealer.other();
        let mut hands = [Hand::new(), Hand::new()];
        for _ in 0..HAND_SIZE {
            for seat in [starter, dealer] {
                hands[seat.index()].add(deck.draw()?);
            }
        }
        let upcard = deck.draw()?;

        Ok(GameSession {
            id,
            dealer,
            rules,
            hands,
            deck,
            discard_pile: vec![upcard],
            phase: Phase::AwaitingDraw(starter),
        })
    }

    /// 洗一副新牌开局；给定种子时发牌可复现
    pub fn shuffled(id: SessionId, dealer: Seat, rules: Rules, seed: Option<u64>) -> Result<Self, GameError> {
        GameSession::new(id, dealer, rules, Deck::new_shuffled(seed))
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn dealer(&self) -> Seat {
        self.dealer
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn hand(&self, seat: Seat) -> &Hand {
        &self.hands[seat.index()]
    }

    pub fn discard_top(&self) -> Option<Card> {
        self.discard_pile.last().copied()
    }

    pub fn discard_pile_size(&self) -> usize {
        self.discard_pile.len()
    }

    pub fn deck_remaining(&self) -> usize {
        self.deck.remaining()
    }

    /// 当前该行动的座位，结束后为 None
    pub fn current_seat(&self) -> Option<Seat> {
        match self.phase {
            Phase::AwaitingDraw(seat) | Phase::AwaitingDiscard(seat) => Some(seat),
            Phase::Finished(_) => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished(_))
    }

    /// 牌堆 + 两家手牌 + 弃牌堆的总张数，恒为 52
    pub fn card_count(&self) -> usize {
        self.deck.remaining() + self.hands.iter().map(Hand::len).sum::<usize>() + self.discard_pile.len()
    }

    /// 所有位置上的牌，用于校验没有重复
    pub fn all_cards(&self) -> impl Iterator<Item = &Card> {
        self.deck
            .cards()
            .iter()
            .chain(self.hands.iter().flat_map(|h| h.cards().iter()))
            .chain(self.discard_pile.iter())
    }
}
