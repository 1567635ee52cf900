//! 遊戲常數定義

use crate::domain::alias::Coord;

/// 預設棋盤寬度（欄數）
pub const DEFAULT_COLS: Coord = 12;

/// 預設棋盤高度（列數）
pub const DEFAULT_ROWS: Coord = 10;

/// 預設保留給玩家部署的最左側欄數
pub const DEFAULT_PLAYER_COLUMNS: Coord = 2;

/// 近戰攻擊距離
pub const MELEE_RANGE: Coord = 1;

/// 預設單位佔地尺寸（1x1）
pub const DEFAULT_FOOTPRINT: Coord = 1;
