//! 比賽事件紀錄（只增不改）

use crate::domain::alias::{Coord, ID, Timestamp};
use crate::domain::core_types::{Position, Unit};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::time::{SystemTime, UNIX_EPOCH};

/// 事件時間來源
pub trait Clock: Debug {
    /// Unix 毫秒
    fn now_millis(&self) -> Timestamp;
}

/// 系統時鐘
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> Timestamp {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as Timestamp)
    }
}

/// 固定時間（測試用）
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now_millis(&self) -> Timestamp {
        self.0
    }
}

/// 比賽事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MatchEvent {
    /// 開戰時的完整單位快照
    Start { time: Timestamp, units: Vec<Unit> },
    #[serde(rename_all = "camelCase")]
    Place {
        time: Timestamp,
        unit_id: ID,
        x: Coord,
        y: Coord,
    },
    #[serde(rename_all = "camelCase")]
    Move {
        time: Timestamp,
        unit_id: ID,
        from: Position,
        to: Position,
    },
    #[serde(rename_all = "camelCase")]
    Attack {
        time: Timestamp,
        attacker_id: ID,
        target_id: ID,
        damage: u32,
        target_hp: u32,
    },
    #[serde(rename_all = "camelCase")]
    Kill {
        time: Timestamp,
        killer_id: ID,
        victim_id: ID,
    },
}

impl MatchEvent {
    pub fn time(&self) -> Timestamp {
        match self {
            MatchEvent::Start { time, .. }
            | MatchEvent::Place { time, .. }
            | MatchEvent::Move { time, .. }
            | MatchEvent::Attack { time, .. }
            | MatchEvent::Kill { time, .. } => *time,
        }
    }

    /// 事件類型名稱（與序列化的 `type` 相同）
    pub fn kind(&self) -> &'static str {
        match self {
            MatchEvent::Start { .. } => "start",
            MatchEvent::Place { .. } => "place",
            MatchEvent::Move { .. } => "move",
            MatchEvent::Attack { .. } => "attack",
            MatchEvent::Kill { .. } => "kill",
        }
    }
}

/// 只能追加的事件序列
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchLog {
    events: Vec<MatchEvent>,
}

impl MatchLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: MatchEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[MatchEvent] {
        &self.events
    }
}
