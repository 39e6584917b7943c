use crate::card::Card;
use crate::error::GameError;
use crate::rules::HAND_SIZE;
use crate::state::*;

// --- 核心游戏流程函数 ---
//
// 每个动作都先完整校验，再修改状态：返回错误时牌局没有任何变化。

impl GameSession {
    fn expect_phase(&self, expected: Phase, action: Action) -> Result<(), GameError> {
        if self.phase != expected {
            return Err(GameError::IllegalAction { phase: self.phase, action });
        }
        Ok(())
    }

    /// 摸牌
    ///
    /// 只能在 `AwaitingDraw(seat)` 阶段调用。
    /// - 从弃牌堆摸：拿走最上面那张
    /// - 从牌堆摸：牌堆已空时本手以和局结束
    ///
    /// 摸完后 11 张全部成组则直接 Big Gin，不再弃牌；否则进入弃牌阶段。
    pub fn draw_card(&mut self, seat: Seat, from_discard_pile: bool) -> Result<DrawOutcome, GameError> {
        self.expect_phase(Phase::AwaitingDraw(seat), Action::Draw { from_discard_pile })?;

        let card = if from_discard_pile {
            self.discard_pile.pop().ok_or(GameError::EmptyDiscardPile)?
        } else {
            if self.deck.is_empty() {
                self.phase = Phase::Finished(Outcome::Stalemate);
                return Ok(DrawOutcome::Stalemate);
            }
            self.deck.draw()?
        };

        let hand = &mut self.hands[seat.index()];
        hand.add(card);

        if hand.is_big_gin() {
            self.phase = Phase::Finished(Outcome::BigGin(seat));
            Ok(DrawOutcome::BigGin(card))
        } else {
            self.phase = Phase::AwaitingDiscard(seat);
            Ok(DrawOutcome::Drew(card))
        }
    }

    /// 弃牌
    ///
    /// 只能在 `AwaitingDiscard(seat)` 阶段调用。弃牌后剩下的 10 张
    /// 全部成组则本手以 Gin 结束，否则轮到对手摸牌。
    pub fn discard_card(&mut self, seat: Seat, card: Card) -> Result<Phase, GameError> {
        self.expect_phase(Phase::AwaitingDiscard(seat), Action::Discard(card))?;

        let hand = &mut self.hands[seat.index()];
        hand.remove(&card)?;
        self.discard_pile.push(card);

        self.phase = if hand.is_gin() {
            Phase::Finished(Outcome::Gin(seat))
        } else {
            Phase::AwaitingDraw(seat.other())
        };
        Ok(self.phase)
    }

    /// 敲牌：弃掉 `discard` 并结束本手
    ///
    /// 只能在 `AwaitingDiscard(seat)` 阶段调用，弃牌后剩余 10 张的
    /// deadwood 不能超过 `rules.knock_limit`。deadwood 为 0 时按 Gin 结算。
    pub fn knock(&mut self, seat: Seat, discard: Card) -> Result<Phase, GameError> {
        self.expect_phase(Phase::AwaitingDiscard(seat), Action::Knock(discard))?;

        let limit = self.rules.knock_limit;
        let hand = &self.hands[seat.index()];
        if !hand.contains(&discard) {
            return Err(GameError::CardNotInHand(discard));
        }
        let deadwood = hand.deadwood_without(&discard);
        if hand.len() != HAND_SIZE + 1 || deadwood > limit {
            return Err(GameError::CannotKnock { deadwood, limit });
        }

        self.hands[seat.index()].remove(&discard)?;
        self.discard_pile.push(discard);

        self.phase = if deadwood == 0 {
            Phase::Finished(Outcome::Gin(seat))
        } else {
            Phase::Finished(Outcome::Knock(seat))
        };
        Ok(self.phase)
    }

    /// 该座位现在是否可以敲牌（用于提示，不代替 `knock` 中的校验）
    pub fn can_knock(&self, seat: Seat) -> bool {
        self.phase == Phase::AwaitingDiscard(seat)
            && self.hand(seat).best_discard().is_some_and(|(_, dw)| dw <= self.rules.knock_limit)
    }
}

// --- 单元测试 ---
