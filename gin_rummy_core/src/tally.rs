use crate::rules::Rules;
use crate::score::ScoreResult;
use crate::state::{GameSession, Seat, SessionId};
use serde::{Deserialize, Serialize};

/// 整场比赛的累计比分
///
/// 一场比赛由若干手牌组成，某一方累计到 `rules.match_target` 分时结束。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchTally {
    pub scores: [u32; 2],
    pub hands_won: [u32; 2],
    pub hands_played: u32,
    // 最近一次计入的牌局，防止同一手被记两次
    last_recorded: Option<SessionId>,
}

impl MatchTally {
    pub fn new() -> Self {
        MatchTally::default()
    }

    /// 把一手已结束的牌计入比分
    ///
    /// 牌局未结束或已经计过时返回 None。
    pub fn record(&mut self, session: &GameSession) -> Option<ScoreResult> {
        if self.last_recorded == Some(session.id()) {
            return None;
        }
        let result = session.result()?;
        self.apply(&result);
        self.last_recorded = Some(session.id());
        Some(result)
    }

    fn apply(&mut self, result: &ScoreResult) {
        self.hands_played += 1;
        if let Some(winner) = result.winner {
            self.scores[winner.index()] += result.points;
            self.hands_won[winner.index()] += 1;
        }
    }

    pub fn is_recorded(&self, session: &GameSession) -> bool {
        self.last_recorded == Some(session.id())
    }

    pub fn is_over(&self, rules: &Rules) -> bool {
        self.scores.iter().any(|&s| s >= rules.match_target)
    }

    /// 比赛结束时的总分：累计分加上每赢一手的奖励
    pub fn final_scores(&self, rules: &Rules) -> [u32; 2] {
        [0, 1].map(|i| self.scores[i] + self.hands_won[i] * rules.hand_win_bonus)
    }

    /// 比赛结束后的胜者，未结束或总分相同时为 None
    pub fn winner(&self, rules: &Rules) -> Option<Seat> {
        if !self.is_over(rules) {
            return None;
        }
        let [a, b] = self.final_scores(rules);
        match a.cmp(&b) {
            std::cmp::Ordering::Greater => Some(Seat::One),
            std::cmp::Ordering::Less => Some(Seat::Two),
            std::cmp::Ordering::Equal => None,
        }
    }
}
