//! # 金拉米 (Gin Rummy) 核心逻辑库
//!
//! 这个 `core` crate 包含了双人金拉米的牌局状态机、组牌 (meld) 与
//! deadwood 计算、敲牌/gin/big gin/undercut 的计分，以及客户端-服务器
//! 之间的请求与响应结构。
//! 它与具体实现（如 HTTP 服务器、前端界面）解耦，可以被任何上层应用复用。

mod card;
mod error;
mod hand;
mod logic;
mod meld;
mod message;
mod rules;
mod score;
mod state;
mod tally;

#[cfg(test)]
mod fixtures;
#[cfg(test)]
mod tests_props;

pub use card::*;

pub use error::*;

pub use hand::*;

pub use meld::{analyze, analyze_with_layoffs, candidate_melds, deadwood_value, LayoffAnalysis, Meld, MeldAnalysis, MeldKind};

pub use message::*;

pub use rules::*;

pub use score::*;

pub use state::*;

pub use tally::*;
