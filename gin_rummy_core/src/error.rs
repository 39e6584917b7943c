use crate::card::Card;
use crate::state::{Action, Phase};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 引擎拒绝一个操作时返回的错误
///
/// 所有错误都在修改状态之前产生，调用方拿到错误时牌局保持原样。
/// 用相同参数重试不会成功，调用方需要换一个合法的动作。
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    /// 阶段不对或者不是该玩家的回合
    #[error("当前阶段 {phase:?} 不允许执行 {action:?}")]
    IllegalAction { phase: Phase, action: Action },
    #[error("手牌中没有 {0}")]
    CardNotInHand(Card),
    #[error("牌堆已空")]
    DeckEmpty,
    #[error("deadwood 为 {deadwood} 点，超过敲牌上限 {limit} 点")]
    CannotKnock { deadwood: u32, limit: u32 },
    #[error("弃牌堆为空")]
    EmptyDiscardPile,
    #[error("非法的牌堆: {0}")]
    InvalidDeck(String),
}

impl GameError {
    /// 稳定的错误码，供上层协议使用
    pub fn code(&self) -> &'static str {
        match self {
            GameError::IllegalAction { .. } => "illegal_action",
            GameError::CardNotInHand(_) => "card_not_in_hand",
            GameError::DeckEmpty => "deck_empty",
            GameError::CannotKnock { .. } => "cannot_knock",
            GameError::EmptyDiscardPile => "empty_discard_pile",
            GameError::InvalidDeck(_) => "invalid_deck",
        }
    }
}
