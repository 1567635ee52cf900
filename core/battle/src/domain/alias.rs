//! 型別別名

/// 棋盤座標（格子索引）
pub type Coord = usize;

/// 單位 ID（比賽內唯一且穩定）
pub type ID = u32;

/// 曼哈頓距離
pub type Distance = usize;

/// 時間戳（Unix 毫秒）
pub type Timestamp = u64;

/// 外部儲存端回傳的比賽 ID
pub type MatchId = u64;
