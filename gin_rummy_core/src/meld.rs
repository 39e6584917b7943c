//! 组牌 (meld) 分析
//!
//! 给定最多 11 张牌，找出互不相交的顺子/刻子组合，使剩余散牌 (deadwood)
//! 的点数之和最小。一张牌可能同时属于某个顺子和某个刻子，
//! 所以贪心会算错，这里用以"尚未分配的牌"掩码为状态的记忆化搜索。

use crate::card::{cards_in_mask, mask_of, Card};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 组成一个 meld 的最少张数
pub const MIN_MELD_SIZE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeldKind {
    /// 同花色连续点数，至少 3 张
    Run,
    /// 同点数不同花色，3 或 4 张
    Set,
}

/// 一组已成型的牌，`cards` 按点数升序
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Meld {
    pub kind: MeldKind,
    pub cards: Vec<Card>,
}

impl Meld {
    fn new(kind: MeldKind, mut cards: Vec<Card>) -> Meld {
        cards.sort();
        Meld { kind, cards }
    }

    pub fn mask(&self) -> u64 {
        mask_of(&self.cards)
    }

    pub fn points(&self) -> u32 {
        self.cards.iter().map(Card::points).sum()
    }

    /// 这张牌能否接到该组牌上 (lay-off)
    pub fn accepts(&self, card: &Card) -> bool {
        if self.cards.contains(card) {
            return false;
        }
        match self.kind {
            MeldKind::Set => self.cards.len() < 4 && self.cards[0].rank == card.rank,
            MeldKind::Run => {
                let (low, high) = (self.cards[0], self.cards[self.cards.len() - 1]);
                card.suit == low.suit
                    && (card.rank.order() + 1 == low.rank.order() || card.rank.order() == high.rank.order() + 1)
            }
        }
    }

    fn extend(&mut self, card: Card) {
        self.cards.push(card);
        self.cards.sort();
    }
}

/// 一手牌的最优拆分结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeldAnalysis {
    pub melds: Vec<Meld>,
    pub deadwood: Vec<Card>,
    pub deadwood_value: u32,
}

/// 考虑 lay-off 之后的拆分结果（被敲牌一方使用）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoffAnalysis {
    pub melds: Vec<Meld>,
    /// 接到对方 meld 上的牌
    pub laid_off: Vec<Card>,
    pub deadwood: Vec<Card>,
    pub deadwood_value: u32,
}

// --- 候选 meld 枚举 ---

/// 枚举手牌中所有可能的 meld
///
/// 顺子会列出每个极大连续段的所有长度 ≥3 的子窗口，四条会额外列出
/// 它的 4 个三张子集：当其中一张牌被另一个 meld 占用时，仍需要较短的版本。
pub fn candidate_melds(cards: &[Card]) -> Vec<Meld> {
    let mut sorted = cards.to_vec();
    sorted.sort_by_key(|c| (c.suit, c.rank));
    sorted.dedup();

    let mut melds = Vec::new();

    // 顺子：按花色切分，再按连续段切分
    for group in sorted.chunk_by(|a, b| a.suit == b.suit) {
        for streak in group.chunk_by(|a, b| a.rank.order() + 1 == b.rank.order()) {
            let n = streak.len();
            for start in 0..n {
                for end in (start + MIN_MELD_SIZE)..=n {
                    melds.push(Meld::new(MeldKind::Run, streak[start..end].to_vec()));
                }
            }
        }
    }

    // 刻子：按点数分组
    sorted.sort();
    for same_rank in sorted.chunk_by(|a, b| a.rank == b.rank) {
        match same_rank.len() {
            3 => melds.push(Meld::new(MeldKind::Set, same_rank.to_vec())),
            4 => {
                melds.push(Meld::new(MeldKind::Set, same_rank.to_vec()));
                for skip in 0..4 {
                    let subset = same_rank
                        .iter()
                        .enumerate()
                        .filter(|(i, _)| *i != skip)
                        .map(|(_, c)| *c)
                        .collect();
                    melds.push(Meld::new(MeldKind::Set, subset));
                }
            }
            _ => {}
        }
    }

    melds
}

// --- 最小 deadwood 搜索 ---

#[derive(Debug, Clone, Copy)]
enum Choice {
    Deadwood,
    Meld(usize),
}

struct Search<'a> {
    candidates: &'a [Meld],
    masks: Vec<u64>,
    memo: HashMap<u64, (u32, Choice)>,
}

impl<'a> Search<'a> {
    fn new(candidates: &'a [Meld]) -> Self {
        let masks = candidates.iter().map(Meld::mask).collect();
        Search { candidates, masks, memo: HashMap::new() }
    }

    /// `rest` 中的牌还没有分配，返回它们能达到的最小 deadwood
    fn best(&mut self, rest: u64) -> u32 {
        if rest == 0 {
            return 0;
        }
        if let Some(&(value, _)) = self.memo.get(&rest) {
            return value;
        }

        // 最低位的牌要么是散牌，要么属于某个包含它的 meld
        let lowest = rest & rest.wrapping_neg();
        let points = Card::from_index(lowest.trailing_zeros()).map_or(0, |c| c.points());

        let mut best_value = points + self.best(rest & !lowest);
        let mut best_choice = Choice::Deadwood;

        for i in 0..self.candidates.len() {
            let mask = self.masks[i];
            if mask & lowest == 0 || mask & !rest != 0 {
                continue;
            }
            let value = self.best(rest & !mask);
            if value < best_value {
                best_value = value;
                best_choice = Choice::Meld(i);
            }
        }

        self.memo.insert(rest, (best_value, best_choice));
        best_value
    }

    fn reconstruct(&self, all: u64) -> MeldAnalysis {
        let mut melds = Vec::new();
        let mut deadwood = Vec::new();
        let mut rest = all;

        while rest != 0 {
            let lowest = rest & rest.wrapping_neg();
            match self.memo.get(&rest).map(|&(_, choice)| choice) {
                Some(Choice::Meld(i)) => {
                    melds.push(self.candidates[i].clone());
                    rest &= !self.masks[i];
                }
                _ => {
                    deadwood.extend(Card::from_index(lowest.trailing_zeros()));
                    rest &= !lowest;
                }
            }
        }

        let deadwood_value = deadwood.iter().map(Card::points).sum();
        MeldAnalysis { melds, deadwood, deadwood_value }
    }
}

/// 找出 deadwood 最小的拆分
///
/// 多种拆分 deadwood 相同时返回其中任意一种。
pub fn analyze(cards: &[Card]) -> MeldAnalysis {
    let candidates = candidate_melds(cards);
    let mut search = Search::new(&candidates);
    let all = mask_of(cards);
    search.best(all);
    search.reconstruct(all)
}

/// 只求最小 deadwood 点数
pub fn deadwood_value(cards: &[Card]) -> u32 {
    let candidates = candidate_melds(cards);
    Search::new(&candidates).best(mask_of(cards))
}

// --- lay-off ---

/// 把 `loose` 中的牌尽可能接到 `targets` 上，返回接出去的牌的掩码
///
/// 接牌只会让 meld 变长，不会让其他牌失去可接性，所以反复接到不动点即为最大集合。
/// 一张牌同时能接顺子和刻子时优先接顺子，因为顺子变长后可能还能继续接。
fn lay_off(loose: u64, targets: &[Meld]) -> u64 {
    let mut melds = targets.to_vec();
    let mut laid = 0u64;

    loop {
        let mut progressed = false;
        for card in cards_in_mask(loose & !laid) {
            let target = melds
                .iter_mut()
                .filter(|m| m.accepts(&card))
                .max_by_key(|m| m.kind == MeldKind::Run);
            if let Some(meld) = target {
                meld.extend(card);
                laid |= card.bit();
                progressed = true;
            }
        }
        if !progressed {
            return laid;
        }
    }
}

struct LayoffSearch<'a> {
    candidates: Vec<Meld>,
    masks: Vec<u64>,
    targets: &'a [Meld],
    all: u64,
    // (deadwood, 选中的 meld 下标, 接出去的牌)
    best: Option<(u32, Vec<usize>, u64)>,
}

impl LayoffSearch<'_> {
    /// 对候选 meld 做"选/不选"的枚举，叶子处计算 lay-off 后的 deadwood
    fn select(&mut self, i: usize, used: u64, chosen: &mut Vec<usize>) {
        if matches!(self.best, Some((0, ..))) {
            return;
        }
        if i == self.candidates.len() {
            let loose = self.all & !used;
            let laid = lay_off(loose, self.targets);
            let value = cards_in_mask(loose & !laid).iter().map(Card::points).sum();
            if self.best.as_ref().map_or(true, |(b, ..)| value < *b) {
                self.best = Some((value, chosen.clone(), laid));
            }
            return;
        }

        if self.masks[i] & used == 0 {
            chosen.push(i);
            self.select(i + 1, used | self.masks[i], chosen);
            chosen.pop();
        }
        self.select(i + 1, used, chosen);
    }
}

/// 被敲牌一方的最优拆分：自己的 meld 加上接到敲牌方 meld 上的牌
pub fn analyze_with_layoffs(cards: &[Card], targets: &[Meld]) -> LayoffAnalysis {
    let candidates = candidate_melds(cards);
    let masks = candidates.iter().map(Meld::mask).collect();
    let mut search = LayoffSearch { candidates, masks, targets, all: mask_of(cards), best: None };
    search.select(0, 0, &mut Vec::new());

    let (deadwood_value, chosen, laid) = search.best.unwrap_or((0, Vec::new(), 0));
    let melds: Vec<Meld> = chosen.iter().map(|&i| search.candidates[i].clone()).collect();
    let used = melds.iter().fold(0u64, |m, meld| m | meld.mask());

    LayoffAnalysis {
        melds,
        laid_off: cards_in_mask(laid),
        deadwood: cards_in_mask(search.all & !used & !laid),
        deadwood_value,
    }
}

// --- 单元测试 ---
