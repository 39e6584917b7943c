use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use gin_rummy_core::{
    DiscardCardRequest, DrawCardRequest, GameError, GameSession, GameStateView, InitializeGameRequest,
    InitializeGameResponse, KnockRequest, Seat, SessionId,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::store::{SessionStore, TableState};

pub type SharedStore = Arc<SessionStore>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionQuery {
    pub session_id: SessionId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateQuery {
    pub session_id: SessionId,
    pub player_name: String,
}

pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route("/initialize_game", post(initialize_game))
        .route("/get_game_state", get(get_game_state))
        .route("/draw_card", post(draw_card))
        .route("/discard_card", post(discard_card))
        .route("/knock", post(knock))
        .route("/next_hand", post(next_hand))
        .route("/end_game", post(end_game))
        .with_state(store)
}

fn lineup(session_id: SessionId, state: &TableState) -> InitializeGameResponse {
    let current_player = state.session.current_seat().map(|s| state.name_of(s).to_string()).unwrap_or_default();
    InitializeGameResponse { session_id, players: state.names.clone(), current_player }
}

/// 新开一场比赛
pub async fn initialize_game(
    State(store): State<SharedStore>,
    Json(req): Json<InitializeGameRequest>,
) -> Result<Json<InitializeGameResponse>, ApiError> {
    let (session_id, table) = store.create(req.player_names, req.seed)?;
    let state = table.state.read();
    info!("玩家 {} 与 {} 开始新比赛 {}", state.names[0], state.names[1], session_id);
    Ok(Json(lineup(session_id, &state)))
}

pub async fn get_game_state(
    State(store): State<SharedStore>,
    Query(q): Query<StateQuery>,
) -> Result<Json<GameStateView>, ApiError> {
    let table = store.get(&q.session_id)?;
    let state = table.state.read();
    let seat = state.seat_of(&q.player_name)?;
    Ok(Json(state.view(seat)))
}

/// 以某位玩家的身份执行一个动作，返回该玩家视角的新状态
fn play(
    store: &SessionStore,
    session_id: SessionId,
    player_name: &str,
    action: impl FnOnce(&mut GameSession, Seat) -> Result<(), GameError>,
) -> Result<Json<GameStateView>, ApiError> {
    let table = store.get(&session_id)?;
    let mut state = table.state.write();
    let seat = state.seat_of(player_name)?;

    match state.act(seat, |session| action(session, seat)) {
        Ok(((), scored)) => {
            debug!("牌局 {}: 玩家 {} 的动作已执行，当前阶段 {:?}", session_id, player_name, state.session.phase());
            if let Some(result) = scored {
                info!("牌局 {} 本手结束: {:?}，{:?} 得 {} 分", session_id, result.kind, result.winner, result.points);
            }
            Ok(Json(state.view(seat)))
        }
        Err(e) => {
            warn!("牌局 {}: 拒绝了玩家 {} 的动作: {}", session_id, player_name, e);
            Err(e)
        }
    }
}

pub async fn draw_card(
    State(store): State<SharedStore>,
    Query(q): Query<SessionQuery>,
    Json(req): Json<DrawCardRequest>,
) -> Result<Json<GameStateView>, ApiError> {
    play(&store, q.session_id, &req.player_name, |session, seat| {
        session.draw_card(seat, req.from_discard_stack).map(|_| ())
    })
}

pub async fn discard_card(
    State(store): State<SharedStore>,
    Query(q): Query<SessionQuery>,
    Json(req): Json<DiscardCardRequest>,
) -> Result<Json<GameStateView>, ApiError> {
    play(&store, q.session_id, &req.player_name, |session, seat| session.discard_card(seat, req.card).map(|_| ()))
}

pub async fn knock(
    State(store): State<SharedStore>,
    Query(q): Query<SessionQuery>,
    Json(req): Json<KnockRequest>,
) -> Result<Json<GameStateView>, ApiError> {
    play(&store, q.session_id, &req.player_name, |session, seat| session.knock(seat, req.discard).map(|_| ()))
}

/// 上一手结束后发下一手牌
pub async fn next_hand(
    State(store): State<SharedStore>,
    Query(q): Query<SessionQuery>,
) -> Result<Json<InitializeGameResponse>, ApiError> {
    let table = store.get(&q.session_id)?;
    let mut state = table.state.write();
    state.next_hand()?;
    info!("牌局 {} 开始第 {} 手", q.session_id, state.tally.hands_played + 1);
    Ok(Json(lineup(q.session_id, &state)))
}

pub async fn end_game(
    State(store): State<SharedStore>,
    Query(q): Query<SessionQuery>,
) -> Result<StatusCode, ApiError> {
    if store.remove(&q.session_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::SessionNotFound(q.session_id))
    }
}
