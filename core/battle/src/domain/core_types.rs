//! 基本資料類型定義

use crate::domain::alias::{Coord, Distance, ID};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// 棋盤位置（座標）
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    pub x: Coord,
    pub y: Coord,
}

impl Position {
    pub fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    /// 兩點之間的曼哈頓距離（溢位時取最大值）
    pub fn manhattan(self, other: Position) -> Distance {
        self.x.abs_diff(other.x).saturating_add(self.y.abs_diff(other.y))
    }
}

/// 單位佔地尺寸，以左上角為錨點
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Footprint {
    pub width: Coord,
    pub height: Coord,
}

impl Default for Footprint {
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
        }
    }
}

/// 陣營
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }

    pub fn is_player(self) -> bool {
        self == Side::Player
    }
}

/// 戰場上的單位
///
/// 由 `Battle` 獨佔擁有，不跨比賽共享。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: ID,
    pub name: String,
    pub side: Side,
    pub hp: u32,
    pub max_hp: u32,
    pub attack: u32,
    pub move_range: Distance,
    pub range: Distance,
    pub initiative: i32,
    #[serde(flatten)]
    pub position: Position,
    #[serde(flatten)]
    pub footprint: Footprint,
}

impl Unit {
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn is_player(&self) -> bool {
        self.side.is_player()
    }

    /// 扣血，最低為 0，回傳扣血後 HP
    pub fn take_damage(&mut self, damage: u32) -> u32 {
        self.hp = self.hp.saturating_sub(damage);
        self.hp
    }
}

/// 勝負結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Winner {
    Player,
    Enemy,
    Draw,
}

/// 比賽階段（狀態機）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Phase {
    /// 部署階段
    Placement,
    /// 玩家回合
    PlayerTurn,
    /// 電腦回合
    AiTurn,
    /// 比賽結束（終態）
    GameOver,
}

impl Phase {
    /// 依行動單位陣營決定回合階段
    pub fn turn_of(side: Side) -> Phase {
        match side {
            Side::Player => Phase::PlayerTurn,
            Side::Enemy => Phase::AiTurn,
        }
    }

    pub fn is_turn(self) -> bool {
        matches!(self, Phase::PlayerTurn | Phase::AiTurn)
    }
}
