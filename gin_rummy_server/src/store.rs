use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use gin_rummy_core::{GameError, GameSession, GameStateView, MatchTally, Rules, ScoreResult, Seat, SessionId};
use parking_lot::{Mutex as P_Mutex, RwLock as P_RwLock};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;

/// 一张牌桌：两位玩家之间的一场比赛
// 重要‼️：`state` 和 `last_active` 从不同时持有，避免锁顺序问题
pub struct Table {
    // 修改牌局拿写锁，查询拿读锁，读者永远看不到做了一半的动作
    pub state: P_RwLock<TableState>,
    last_active: P_Mutex<Instant>,
}

pub struct TableState {
    /// 玩家名 -> 座位 的映射，只在 HTTP 层使用
    pub names: [String; 2],
    pub session: GameSession,
    pub tally: MatchTally,
    seed: Option<u64>,
}

impl Table {
    fn new(state: TableState) -> Self {
        Table { state: P_RwLock::new(state), last_active: P_Mutex::new(Instant::now()) }
    }

    pub fn touch(&self) {
        *self.last_active.lock() = Instant::now();
    }

    pub fn idle_for(&self) -> Duration {
        self.last_active.lock().elapsed()
    }
}

impl TableState {
    pub fn seat_of(&self, player_name: &str) -> Result<Seat, ApiError> {
        self.names
            .iter()
            .position(|n| n == player_name)
            .and_then(Seat::from_index)
            .ok_or_else(|| ApiError::UnknownPlayer(player_name.to_string()))
    }

    pub fn name_of(&self, seat: Seat) -> &str {
        &self.names[seat.index()]
    }

    pub fn view(&self, seat: Seat) -> GameStateView {
        GameStateView::for_seat(&self.session, &self.tally, seat)
    }

    /// 以 `seat` 的身份对牌局执行一个动作
    ///
    /// 动作被拒绝时牌局不变，错误里附带该玩家视角的当前状态；
    /// 动作让本手结束时立即计入比分。
    pub fn act<T>(
        &mut self,
        seat: Seat,
        action: impl FnOnce(&mut GameSession) -> Result<T, GameError>,
    ) -> Result<(T, Option<ScoreResult>), ApiError> {
        match action(&mut self.session) {
            Ok(value) => {
                let scored = self.tally.record(&self.session);
                Ok((value, scored))
            }
            Err(e) => Err(ApiError::game(e, self.view(seat))),
        }
    }

    /// 上一手结束后开始下一手，庄家轮换
    pub fn next_hand(&mut self) -> Result<(), ApiError> {
        if !self.session.is_finished() {
            return Err(ApiError::HandInProgress);
        }
        let rules = *self.session.rules();
        if self.tally.is_over(&rules) {
            return Err(ApiError::MatchOver);
        }
        let dealer = self.session.dealer().other();
        let seed = self.seed.map(|s| s.wrapping_add(self.tally.hands_played as u64));
        // 每手牌有自己的 id，比分按它去重；牌桌仍沿用建局时的 id
        self.session = GameSession::shuffled(Uuid::new_v4(), dealer, rules, seed)?;
        Ok(())
    }
}

/// 所有进行中的牌桌
///
/// 由路由层持有并注入，不是全局变量。不同牌桌之间没有共享的锁。
pub struct SessionStore {
    tables: DashMap<SessionId, Arc<Table>>,
    rules: Rules,
}

impl SessionStore {
    pub fn new(rules: Rules) -> Self {
        SessionStore { tables: DashMap::new(), rules }
    }

    /// 新开一场比赛，`player_names[0]` 坐 Seat::One
    pub fn create(&self, player_names: [String; 2], seed: Option<u64>) -> Result<(SessionId, Arc<Table>), ApiError> {
        let id = Uuid::new_v4();
        // 第一手的庄家随机选出，之后每手轮换
        let session = GameSession::shuffled(id, Seat::random_dealer(seed), self.rules, seed)?;
        self.insert(player_names, session, seed)
    }

    /// 用现成的牌局开桌
    pub fn insert(
        &self,
        player_names: [String; 2],
        session: GameSession,
        seed: Option<u64>,
    ) -> Result<(SessionId, Arc<Table>), ApiError> {
        let [a, b] = &player_names;
        if a.trim().is_empty() || b.trim().is_empty() {
            return Err(ApiError::BadRequest("玩家名不能为空".to_string()));
        }
        if a == b {
            return Err(ApiError::BadRequest("两位玩家的名字不能相同".to_string()));
        }

        let id = session.id();
        let table = Arc::new(Table::new(TableState { names: player_names, session, tally: MatchTally::new(), seed }));
        self.tables.insert(id, table.clone());
        info!("新牌局 {} 已创建", id);
        Ok((id, table))
    }

    pub fn get(&self, id: &SessionId) -> Result<Arc<Table>, ApiError> {
        let table = self.tables.get(id).map(|t| t.clone()).ok_or(ApiError::SessionNotFound(*id))?;
        table.touch();
        Ok(table)
    }

    pub fn remove(&self, id: &SessionId) -> bool {
        let removed = self.tables.remove(id).is_some();
        if removed {
            info!("牌局 {} 已移除", id);
        }
        removed
    }

    /// 清理超过 `max_idle` 无人访问的牌桌，返回清理的数量
    pub fn expire_idle(&self, max_idle: Duration) -> usize {
        let before = self.tables.len();
        self.tables.retain(|_, table| table.idle_for() <= max_idle);
        let expired = before.saturating_sub(self.tables.len());
        if expired > 0 {
            info!("清理了 {} 个空闲牌局", expired);
        }
        expired
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
