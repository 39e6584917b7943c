use serde::{Deserialize, Serialize};

/// 每位玩家的基本手牌数
pub const HAND_SIZE: usize = 10;

/// 计分和敲牌规则中的可配置常数
///
/// 反序列化时缺省的字段使用标准金拉米规则的值。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// 敲牌时剩余 deadwood 的上限
    pub knock_limit: u32,
    pub gin_bonus: u32,
    pub big_gin_bonus: u32,
    pub undercut_bonus: u32,
    /// 整场比赛的目标分
    pub match_target: u32,
    /// 比赛结束时每赢一手附加的分数
    pub hand_win_bonus: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            knock_limit: 10,
            gin_bonus: 25,
            big_gin_bonus: 31,
            undercut_bonus: 25,
            match_target: 100,
            hand_win_bonus: 25,
        }
    }
}
