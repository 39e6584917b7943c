use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use gin_rummy_core::{ErrorBody, GameError, GameStateView, SessionId};
use thiserror::Error;

/// HTTP 层的错误，附带未被修改的牌局（如果能确定是哪位玩家的视角）
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("牌局 {0} 不存在")]
    SessionNotFound(SessionId),
    #[error("玩家 {0} 不在这局中")]
    UnknownPlayer(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("本手尚未结束")]
    HandInProgress,
    #[error("比赛已经结束")]
    MatchOver,
    #[error("{source}")]
    Game {
        #[source]
        source: GameError,
        state: Option<Box<GameStateView>>,
    },
}

impl ApiError {
    pub fn game(source: GameError, state: GameStateView) -> Self {
        ApiError::Game { source, state: Some(Box::new(state)) }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::UnknownPlayer(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::HandInProgress | ApiError::MatchOver => StatusCode::CONFLICT,
            ApiError::Game { source, .. } => match source {
                GameError::IllegalAction { .. } => StatusCode::CONFLICT,
                GameError::CardNotInHand(_) | GameError::CannotKnock { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                GameError::DeckEmpty | GameError::EmptyDiscardPile => StatusCode::CONFLICT,
                GameError::InvalidDeck(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::SessionNotFound(_) => "session_not_found",
            ApiError::UnknownPlayer(_) => "unknown_player",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::HandInProgress => "hand_in_progress",
            ApiError::MatchOver => "match_over",
            ApiError::Game { source, .. } => source.code(),
        }
    }
}

impl From<GameError> for ApiError {
    fn from(source: GameError) -> Self {
        ApiError::Game { source, state: None }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code().to_string();
        let error = self.to_string();
        let state = match self {
            ApiError::Game { state, .. } => state.map(|s| *s),
            _ => None,
        };
        (status, Json(ErrorBody { error, code, state })).into_response()
    }
}
