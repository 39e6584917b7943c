use crate::card::Card;
use crate::rules::HAND_SIZE;
use crate::score::ScoreResult;
use crate::state::{GameSession, Phase, Seat, SessionId};
use crate::tally::MatchTally;
use serde::{Deserialize, Serialize};

// --- 客户端 -> 服务器 的请求体 ---
// 玩家用名字标识，服务器在建局时把名字映射到座位。

/// 新开一场比赛
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct InitializeGameRequest {
    pub player_names: [String; 2],
    /// 指定种子时发牌可复现
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DrawCardRequest {
    pub player_name: String,
    pub from_discard_stack: bool,
}

/// 弃牌，牌以 `{rank, suit}` 平铺在请求体里
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DiscardCardRequest {
    pub player_name: String,
    #[serde(flatten)]
    pub card: Card,
}

/// 敲牌，同时给出要弃掉的牌
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct KnockRequest {
    pub player_name: String,
    #[serde(flatten)]
    pub discard: Card,
}

// --- 服务器 -> 客户端 的响应体 ---

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct InitializeGameResponse {
    pub session_id: SessionId,
    pub players: [String; 2],
    /// 先行动的玩家名
    pub current_player: String,
}

/// 某位玩家视角下的牌局
///
/// 只包含该玩家自己的手牌；对手的手牌只给张数，本手结束后才公开。
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GameStateView {
    pub player_hand: Vec<Card>,
    pub opponent_hand_size: usize,
    pub discard_pile_top: Option<Card>,
    pub deck_size: usize,
    pub is_current_player: bool,
    pub can_knock: bool,
    pub is_gin: bool,
    pub gin_score: u32,
    pub is_big_gin: bool,
    pub big_gin_score: u32,

    pub seat: Seat,
    pub phase: Phase,
    pub opponent_hand: Option<Vec<Card>>,
    pub result: Option<ScoreResult>,
    pub scores: [u32; 2],
    pub hands_won: [u32; 2],
    pub match_over: bool,
    /// 比赛结束后的总分（含每手胜利奖励），未结束时为 None
    pub final_scores: Option<[u32; 2]>,
    /// 比赛胜者，未结束或平分时为 None
    pub match_winner: Option<Seat>,
}

impl GameStateView {
    pub fn for_seat(session: &GameSession, tally: &MatchTally, seat: Seat) -> Self {
        let rules = session.rules();
        let hand = session.hand(seat);
        let opponent = session.hand(seat.other());
        let opponent_deadwood = || opponent.deadwood_value();

        // 只有轮到该座位且已摸牌时才能敲，与 `knock` 的校验一致
        let can_knock = session.can_knock(seat);
        let (is_gin, is_big_gin) = match hand.len() {
            n if n == HAND_SIZE + 1 => {
                let big = hand.is_big_gin();
                (!big && hand.best_discard().is_some_and(|(_, dw)| dw == 0), big)
            }
            _ => (hand.is_gin(), false),
        };

        let gin_score = if is_gin { rules.gin_bonus + opponent_deadwood() } else { 0 };
        let big_gin_score = if is_big_gin { rules.big_gin_bonus + opponent_deadwood() } else { 0 };

        let opponent_hand = session.is_finished().then(|| opponent.cards().to_vec());
        let match_over = tally.is_over(rules);

        GameStateView {
            player_hand: hand.cards().to_vec(),
            opponent_hand_size: opponent.len(),
            discard_pile_top: session.discard_top(),
            deck_size: session.deck_remaining(),
            is_current_player: session.current_seat() == Some(seat),
            can_knock,
            is_gin,
            gin_score,
            is_big_gin,
            big_gin_score,
            seat,
            phase: session.phase(),
            opponent_hand,
            result: session.result(),
            scores: tally.scores,
            hands_won: tally.hands_won,
            match_over,
            final_scores: match_over.then(|| tally.final_scores(rules)),
            match_winner: tally.winner(rules),
        }
    }
}

/// 请求被拒绝时的响应体，附带未被修改的牌局
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
    pub state: Option<GameStateView>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GameError;
    use crate::fixtures::{card, stacked_session};

    const TWO_FOURTEEN: &str = "4S 5S 6S 7S 8D 8C 8H 8S 10D 4C";

    #[test]
    fn test_view_hides_opponent_hand_while_live() {
        let s = stacked_session("AH 2H 3H 4H 9S 9C 9D JC QC 2S", TWO_FOURTEEN, "6D", "KC");
        let view = GameStateView::for_seat(&s, &MatchTally::new(), Seat::One);
        assert_eq!(view.player_hand.len(), 10);
        assert_eq!(view.opponent_hand_size, 10);
        assert_eq!(view.opponent_hand, None);
        assert_eq!(view.discard_pile_top, Some(card("6D")));
        assert_eq!(view.deck_size, 31);
        assert!(view.is_current_player);
        assert!(!view.can_knock, "J♣ Q♣ 2♠ 共 22 点");
        assert!(!view.is_gin);

        let other = GameStateView::for_seat(&s, &MatchTally::new(), Seat::Two);
        assert!(!other.is_current_player);
    }

    #[test]
    fn test_view_after_draw_reports_gin_option() {
        let mut s = stacked_session("AH 2H 3H 4H 9S 9C 9D JC QC 2S", TWO_FOURTEEN, "6D", "KC");
        s.draw_card(Seat::One, false).unwrap();
        let view = GameStateView::for_seat(&s, &MatchTally::new(), Seat::One);
        assert_eq!(view.player_hand.len(), 11);
        assert!(view.can_knock);
        assert!(view.is_gin);
        assert_eq!(view.gin_score, 25 + 14);
        assert!(!view.is_big_gin);
        assert_eq!(view.big_gin_score, 0);
    }

    #[test]
    fn test_view_after_big_gin_reveals_and_scores() {
        let mut s = stacked_session("AH 2H 3H 4H 9S 9C 9D JC QC KC", TWO_FOURTEEN, "6D", "5H");
        s.draw_card(Seat::One, false).unwrap();
        let mut tally = MatchTally::new();
        tally.record(&s);

        let view = GameStateView::for_seat(&s, &tally, Seat::One);
        assert!(view.is_big_gin);
        assert_eq!(view.big_gin_score, 31 + 14);
        assert_eq!(view.result.map(|r| r.points), Some(45));
        assert_eq!(view.opponent_hand.map(|h| h.len()), Some(10));
        assert_eq!(view.scores, [45, 0]);
        assert!(!view.is_current_player);
    }

    #[test]
    fn test_waiting_player_cannot_knock() {
        // Seat::Two 只有 6 点散牌，但现在轮到 Seat::One 摸牌
        let mut s = stacked_session(TWO_FOURTEEN, "AH 2H 3H 4H 9S 9C 9D 3C 2S AC", "6D", "KC");
        let view = GameStateView::for_seat(&s, &MatchTally::new(), Seat::Two);
        assert_eq!(view.player_hand.len(), 10);
        assert!(!view.is_current_player);
        assert!(!view.can_knock);
        assert_eq!(view.can_knock, s.can_knock(Seat::Two));
        assert!(matches!(s.knock(Seat::Two, card("AC")), Err(GameError::IllegalAction { .. })));

        // 轮到自己但还没摸牌，同样不能敲
        s.draw_card(Seat::One, false).unwrap();
        s.discard_card(Seat::One, card("KC")).unwrap();
        let view = GameStateView::for_seat(&s, &MatchTally::new(), Seat::Two);
        assert!(view.is_current_player);
        assert!(!view.can_knock);

        s.draw_card(Seat::Two, false).unwrap();
        let view = GameStateView::for_seat(&s, &MatchTally::new(), Seat::Two);
        assert!(view.can_knock);
        assert_eq!(view.can_knock, s.can_knock(Seat::Two));
    }

    #[test]
    fn test_final_standing_only_after_match_over() {
        let mut s = stacked_session("AH 2H 3H 4H 9S 9C 9D JC QC KC", TWO_FOURTEEN, "6D", "5H");
        s.draw_card(Seat::One, false).unwrap();
        let mut tally = MatchTally::new();
        tally.record(&s);

        let view = GameStateView::for_seat(&s, &tally, Seat::Two);
        assert!(!view.match_over);
        assert_eq!(view.final_scores, None);
        assert_eq!(view.match_winner, None);

        tally.scores[Seat::One.index()] = 100;
        let view = GameStateView::for_seat(&s, &tally, Seat::Two);
        assert!(view.match_over);
        assert_eq!(view.final_scores, Some([100 + 25, 0]));
        assert_eq!(view.match_winner, Some(Seat::One));
    }

    #[test]
    fn test_request_bodies_parse() {
        let discard: DiscardCardRequest =
            serde_json::from_str(r#"{"player_name":"alice","rank":"10","suit":"Hearts"}"#).unwrap();
        assert_eq!(discard.card, card("10H"));

        let draw: DrawCardRequest = serde_json::from_str(r#"{"player_name":"bob","from_discard_stack":true}"#).unwrap();
        assert!(draw.from_discard_stack);

        let init: InitializeGameRequest = serde_json::from_str(r#"{"player_names":["a","b"]}"#).unwrap();
        assert_eq!(init.seed, None);
    }
}
