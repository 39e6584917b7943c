//! 随机对局的性质测试：任意种子、任意动作序列下，牌数守恒且没有重复，
//! 被拒绝的动作不改变牌局；组牌分析的结果与穷举一致。

use proptest::prelude::*;

use crate::card::{full_deck, mask_of, Card, DECK_SIZE};
use crate::meld::analyze;
use crate::error::GameError;
use crate::rules::Rules;
use crate::state::{GameSession, Phase, Seat};
use uuid::Uuid;

#[derive(Debug, Clone)]
enum Step {
    Draw { from_discard: bool },
    Discard { pick: usize },
    Knock { pick: usize },
    /// 故意发一个不合法的动作
    OutOfTurn { pick: usize },
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => any::<bool>().prop_map(|from_discard| Step::Draw { from_discard }),
        4 => any::<usize>().prop_map(|pick| Step::Discard { pick }),
        1 => any::<usize>().prop_map(|pick| Step::Knock { pick }),
        1 => any::<usize>().prop_map(|pick| Step::OutOfTurn { pick }),
    ]
}

fn assert_conserved(session: &GameSession) -> Result<(), TestCaseError> {
    prop_assert_eq!(session.card_count(), DECK_SIZE);
    prop_assert_eq!(mask_of(session.all_cards()).count_ones() as usize, DECK_SIZE);
    Ok(())
}

/// 逐一枚举手牌的所有子集，挑出合法的组（同点数 3-4 张，或同花色连续 3 张以上）
fn all_melds(cards: &[Card]) -> Vec<u32> {
    (1u32..1 << cards.len())
        .filter(|subset| subset.count_ones() >= 3)
        .filter(|&subset| {
            let members: Vec<Card> = (0..cards.len()).filter(|i| subset & (1 << i) != 0).map(|i| cards[i]).collect();
            let same_rank = members.iter().all(|c| c.rank == members[0].rank);
            let same_suit = members.iter().all(|c| c.suit == members[0].suit);
            let mut orders: Vec<u8> = members.iter().map(|c| c.rank.order()).collect();
            orders.sort_unstable();
            same_rank || (same_suit && orders.windows(2).all(|w| w[1] == w[0] + 1))
        })
        .collect()
}

/// 穷举所有不相交的组合方式，返回最小 deadwood
fn brute_force_deadwood(cards: &[Card], melds: &[u32], remaining: u32) -> u32 {
    if remaining == 0 {
        return 0;
    }
    // 剩余牌中下标最小的那张要么是散牌，要么属于某个组
    let low = remaining.trailing_zeros();
    let bit = 1u32 << low;
    let mut best = cards[low as usize].points() + brute_force_deadwood(cards, melds, remaining & !bit);
    for &meld in melds {
        if meld & bit != 0 && meld & !remaining == 0 {
            best = best.min(brute_force_deadwood(cards, melds, remaining & !meld));
        }
    }
    best
}

/// 只取 A-7 的 28 张牌，让随机手牌里更常出现组
fn low_cards() -> Vec<Card> {
    full_deck().into_iter().filter(|c| c.rank.order() <= 7).collect()
}

fn pick_card(session: &GameSession, seat: Seat, pick: usize) -> Card {
    let cards = session.hand(seat).cards();
    cards[pick % cards.len()]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_cards_are_conserved(seed in any::<u64>(), steps in prop::collection::vec(step(), 0..120)) {
        let mut session = GameSession::shuffled(Uuid::new_v4(), Seat::One, Rules::default(), Some(seed)).unwrap();
        assert_conserved(&session)?;

        for step in steps {
            let Some(seat) = session.current_seat() else { break };
            let before = session.clone();

            let outcome: Result<(), GameError> = match step {
                Step::Draw { from_discard } => session.draw_card(seat, from_discard).map(|_| ()),
                Step::Discard { pick } => {
                    let card = pick_card(&session, seat, pick);
                    session.discard_card(seat, card).map(|_| ())
                }
                Step::Knock { pick } => {
                    let card = pick_card(&session, seat, pick);
                    session.knock(seat, card).map(|_| ())
                }
                Step::OutOfTurn { pick } => {
                    let card = pick_card(&session, seat.other(), pick);
                    let result = session.discard_card(seat.other(), card).map(|_| ());
                    prop_assert!(matches!(result, Err(GameError::IllegalAction { .. })), "不是该座位的回合");
                    result
                }
            };

            if outcome.is_err() {
                prop_assert_eq!(&session, &before);
            }
            assert_conserved(&session)?;

            // 手牌张数与阶段一致
            match session.phase() {
                Phase::AwaitingDraw(s) => {
                    prop_assert_eq!(session.hand(s).len(), 10);
                    prop_assert_eq!(session.hand(s.other()).len(), 10);
                }
                Phase::AwaitingDiscard(s) => {
                    prop_assert_eq!(session.hand(s).len(), 11);
                    prop_assert_eq!(session.hand(s.other()).len(), 10);
                }
                Phase::Finished(_) => prop_assert!(session.result().is_some()),
            }
        }
    }

    #[test]
    fn prop_analysis_is_self_consistent(seed in any::<u64>()) {
        // 分析结果的 deadwood 不超过全部牌的点数，且刚好等于散牌之和
        let session = GameSession::shuffled(Uuid::new_v4(), Seat::Two, Rules::default(), Some(seed)).unwrap();
        for seat in Seat::BOTH {
            let hand = session.hand(seat);
            let analysis = hand.analysis();
            let total: u32 = hand.cards().iter().map(Card::points).sum();
            prop_assert!(analysis.deadwood_value <= total);
            prop_assert_eq!(analysis.deadwood_value, analysis.deadwood.iter().map(Card::points).sum::<u32>());
            prop_assert_eq!(analysis.deadwood_value, hand.deadwood_value());
            let covered: usize = analysis.melds.iter().map(|m| m.cards.len()).sum();
            prop_assert_eq!(covered + analysis.deadwood.len(), hand.len());
        }
    }

    #[test]
    fn prop_analysis_finds_minimum_deadwood(cards in prop::sample::subsequence(low_cards(), 10..=11)) {
        let melds = all_melds(&cards);
        let expected = brute_force_deadwood(&cards, &melds, (1u32 << cards.len()) - 1);
        let analysis = analyze(&cards);
        prop_assert_eq!(analysis.deadwood_value, expected);
        for meld in &analysis.melds {
            let members: Vec<u32> = meld.cards.iter().map(|c| cards.iter().position(|h| h == c).unwrap() as u32).collect();
            let subset = members.iter().fold(0u32, |acc, &i| acc | 1 << i);
            prop_assert!(melds.contains(&subset), "{:?} 不是合法的组", meld.cards);
        }
    }
}
