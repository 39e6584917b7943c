use crate::error::GameError;
use rand::prelude::SliceRandom;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

// --- 核心数据结构定义 ---

/// 一副牌的张数
pub const DECK_SIZE: usize = 52;

/// 花色 (Suit)
/// 变体顺序决定了牌在 52 位掩码中的分段：♠ ♥ ♦ ♣
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Suit {
    #[serde(alias = "spades")]
    Spades,   // 黑桃 ♠️
    #[serde(alias = "hearts")]
    Hearts,   // 红心 ♥️
    #[serde(alias = "diamonds")]
    Diamonds, // 方块 ♦️
    #[serde(alias = "clubs")]
    Clubs,    // 梅花 ♣️
}

/// 点数 (Rank)
/// 金拉米中 A 永远是最小的牌：A-2-3 是顺子，Q-K-A 不是
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Rank {
    #[serde(rename = "A")]
    Ace,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "J")]
    Jack,
    #[serde(rename = "Q")]
    Queen,
    #[serde(rename = "K")]
    King,
}

/// 单张扑克牌 (Card)
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Ace, Rank::Two, Rank::Three, Rank::Four, Rank::Five, Rank::Six, Rank::Seven,
        Rank::Eight, Rank::Nine, Rank::Ten, Rank::Jack, Rank::Queen, Rank::King,
    ];

    /// 排序值：A=1 .. K=13
    pub fn order(self) -> u8 {
        self as u8 + 1
    }

    /// 计算 deadwood 时的点数：人头牌 10 点，A 1 点，其余按面值
    pub fn points(self) -> u32 {
        match self {
            Rank::Jack | Rank::Queen | Rank::King => 10,
            r => r.order() as u32,
        }
    }

    /// 按排序值取点数，超出 1..=13 返回 None
    pub fn from_order(order: u8) -> Option<Rank> {
        if (1..=13).contains(&order) {
            Some(Rank::ALL[(order - 1) as usize])
        } else {
            None
        }
    }
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Card {
        Card { rank, suit }
    }

    pub fn points(&self) -> u32 {
        self.rank.points()
    }

    /// 该牌在 0..52 中的唯一下标：花色分段，段内按 A..K
    pub fn index(&self) -> u32 {
        self.suit as u32 * 13 + self.rank as u32
    }

    /// 该牌对应的单比特掩码
    pub fn bit(&self) -> u64 {
        1u64 << self.index()
    }

    pub fn from_index(index: u32) -> Option<Card> {
        if index as usize >= DECK_SIZE {
            return None;
        }
        let suit = Suit::ALL[(index / 13) as usize];
        let rank = Rank::ALL[(index % 13) as usize];
        Some(Card { rank, suit })
    }
}

/// 一组牌的掩码
pub fn mask_of<'a>(cards: impl IntoIterator<Item = &'a Card>) -> u64 {
    cards.into_iter().fold(0, |m, c| m | c.bit())
}

/// 把掩码还原成牌，按下标从小到大排列
pub fn cards_in_mask(mask: u64) -> Vec<Card> {
    (0..DECK_SIZE as u32)
        .filter(|i| mask & (1u64 << i) != 0)
        .filter_map(Card::from_index)
        .collect()
}

// --- 实现辅助功能 ---

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Suit::Spades => "♠️",
            Suit::Hearts => "♥️",
            Suit::Diamonds => "♦️",
            Suit::Clubs => "♣️",
        })
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        })
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.suit, self.rank)
    }
}

// --- 牌堆 ---

/// 创建一副按花色、点数顺序排列的完整 52 张牌
pub fn full_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for &suit in &Suit::ALL {
        for &rank in &Rank::ALL {
            deck.push(Card { rank, suit });
        }
    }
    deck
}

/// 牌堆 (Deck)
/// 内部从尾部抽牌，`cards.last()` 就是下一张要摸的牌
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// 用给定的随机数发生器洗出一副新牌
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Deck {
        let mut cards = full_deck();
        cards.shuffle(rng);
        Deck { cards }
    }

    /// 洗出一副新牌；给定种子时结果可复现（测试用）
    pub fn new_shuffled(seed: Option<u64>) -> Deck {
        match seed {
            Some(s) => Deck::shuffled(&mut StdRng::seed_from_u64(s)),
            None => Deck::shuffled(&mut rand::rng()),
        }
    }

    /// 按指定顺序叠好的牌堆，`cards[0]` 最先被摸到
    ///
    /// 输入必须恰好是完整的 52 张不重复的牌。
    pub fn from_draw_order(cards: Vec<Card>) -> Result<Deck, GameError> {
        if cards.len() != DECK_SIZE {
            return Err(GameError::InvalidDeck(format!("需要 {} 张牌，实际 {} 张", DECK_SIZE, cards.len())));
        }
        let mut seen = 0u64;
        for card in &cards {
            if seen & card.bit() != 0 {
                return Err(GameError::InvalidDeck(format!("重复的牌 {}", card)));
            }
            seen |= card.bit();
        }
        let mut cards = cards;
        cards.reverse();
        Ok(Deck { cards })
    }

    /// 摸走牌堆顶的一张牌
    pub fn draw(&mut self) -> Result<Card, GameError> {
        self.cards.pop().ok_or(GameError::DeckEmpty)
    }

    /// 剩余未摸的牌数
    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub(crate) fn cards(&self) -> &[Card] {
        &self.cards
    }
}

// --- 单元测试 ---
