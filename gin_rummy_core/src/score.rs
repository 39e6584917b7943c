use crate::meld::{analyze, analyze_with_layoffs};
use crate::rules::Rules;
use crate::state::{GameSession, Outcome, Phase, Seat};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreKind {
    Gin,
    BigGin,
    Knock,
    /// 被敲牌一方的 deadwood 不高于敲牌方，反过来赢下这一手
    Undercut,
    Stalemate,
}

/// 一手牌的结算结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub winner: Option<Seat>,
    pub loser: Option<Seat>,
    pub points: u32,
    pub kind: ScoreKind,
    /// 结算时两家各自计入的 deadwood，按座位下标排列
    pub deadwood: [u32; 2],
}

impl ScoreResult {
    fn win(winner: Seat, points: u32, kind: ScoreKind, deadwood: [u32; 2]) -> Self {
        ScoreResult { winner: Some(winner), loser: Some(winner.other()), points, kind, deadwood }
    }

    fn stalemate() -> Self {
        ScoreResult { winner: None, loser: None, points: 0, kind: ScoreKind::Stalemate, deadwood: [0, 0] }
    }
}

fn by_seat(seat: Seat, own: u32, other: u32) -> [u32; 2] {
    let mut values = [0; 2];
    values[seat.index()] = own;
    values[seat.other().index()] = other;
    values
}

/// 敲牌结算
///
/// `defender_deadwood` 已经扣除了 lay-off。双方相等也算 undercut。
pub fn settle_knock(knocker: Seat, knocker_deadwood: u32, defender_deadwood: u32, rules: &Rules) -> ScoreResult {
    let deadwood = by_seat(knocker, knocker_deadwood, defender_deadwood);
    if defender_deadwood <= knocker_deadwood {
        let points = rules.undercut_bonus + (knocker_deadwood - defender_deadwood);
        ScoreResult::win(knocker.other(), points, ScoreKind::Undercut, deadwood)
    } else {
        ScoreResult::win(knocker, defender_deadwood - knocker_deadwood, ScoreKind::Knock, deadwood)
    }
}

/// 计算一手已结束的牌的得分，未结束时返回 None
pub fn score(session: &GameSession) -> Option<ScoreResult> {
    let Phase::Finished(outcome) = session.phase() else {
        return None;
    };
    let rules = session.rules();

    let result = match outcome {
        Outcome::Gin(seat) | Outcome::BigGin(seat) => {
            // gin 时对手不能 lay-off
            let opponent = session.hand(seat.other()).deadwood_value();
            let (bonus, kind) = match outcome {
                Outcome::BigGin(_) => (rules.big_gin_bonus, ScoreKind::BigGin),
                _ => (rules.gin_bonus, ScoreKind::Gin),
            };
            ScoreResult::win(seat, bonus + opponent, kind, by_seat(seat, 0, opponent))
        }
        Outcome::Knock(seat) => {
            let knocker = analyze(session.hand(seat).cards());
            let defender = analyze_with_layoffs(session.hand(seat.other()).cards(), &knocker.melds);
            settle_knock(seat, knocker.deadwood_value, defender.deadwood_value, rules)
        }
        Outcome::Stalemate => ScoreResult::stalemate(),
    };
    Some(result)
}

impl GameSession {
    /// 本手的结算结果，未结束时为 None
    pub fn result(&self) -> Option<ScoreResult> {
        score(self)
    }
}
