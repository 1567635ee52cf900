//! 錯誤處理系統
//!
//! 非法行動只回報拒絕原因、不改變狀態；資料錯誤在開局時 fail fast。

use crate::domain::alias::{Coord, Distance, ID};
use crate::domain::core_types::Phase;
use thiserror::Error as ThisError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// 頂層錯誤，包含原始錯誤和 context 鏈
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    contexts: Vec<String>,
}

/// 錯誤種類
#[derive(Debug, ThisError)]
pub enum ErrorKind {
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error(transparent)]
    Data(#[from] DataError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Replay(#[from] ReplayError),
}

/// 非法行動（部署、移動、攻擊）的拒絕原因
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ActionError {
    #[error("位置超出棋盤邊界: ({x}, {y}) 尺寸 {width}x{height}，棋盤 {cols}x{rows}")]
    OutOfBounds {
        x: Coord,
        y: Coord,
        width: Coord,
        height: Coord,
        cols: Coord,
        rows: Coord,
    },
    #[error("位置 ({x}, {y}) 已被單位 {occupant} 佔據")]
    CellOccupied { x: Coord, y: Coord, occupant: ID },
    #[error("玩家單位只能放在最左側 {player_columns} 欄內: x={x} 寬度 {width}")]
    OutsidePlayerColumns {
        x: Coord,
        width: Coord,
        player_columns: Coord,
    },
    #[error("目標太遠: 距離 {distance} 超過上限 {limit}")]
    TooFar { distance: Distance, limit: Distance },
    #[error("目標不在攻擊範圍內: 距離 {distance}，射程 {range}")]
    NotInRange { distance: Distance, range: Distance },
    #[error("目標與原地距離為 0")]
    ZeroDistance,
    #[error("單位 {unit_id} 不是行動中的單位")]
    NotActiveUnit { unit_id: ID },
    #[error("單位 {unit_id} 不存在")]
    UnitNotFound { unit_id: ID },
    #[error("單位 {unit_id} 已陣亡")]
    UnitDead { unit_id: ID },
    #[error("單位 {attacker} 與 {target} 同陣營")]
    SameSide { attacker: ID, target: ID },
    #[error("單位 {unit_id} 不能在 {phase} 行動")]
    WrongSide { unit_id: ID, phase: Phase },
    #[error("位置 ({x}, {y}) 沒有可攻擊的目標")]
    NoTargetAt { x: Coord, y: Coord },
    #[error("單位 {unit_id} 本回合已行動")]
    AlreadyActed { unit_id: ID },
    #[error("目前階段 {phase} 不接受此操作")]
    WrongPhase { phase: Phase },
    #[error("比賽已結束")]
    GameOver,
    #[error("沒有可部署的玩家單位")]
    NothingToPlace,
    #[error("單位 {unit_id} 找不到空位可放置")]
    NoFreeCell { unit_id: ID },
}

/// 初始單位資料錯誤
#[derive(Debug, ThisError)]
pub enum DataError {
    #[error("第 {index} 筆單位資料缺少欄位 `{field}`")]
    MissingField { index: usize, field: &'static str },
    #[error("單位 {unit_id} 的 hp {hp} 超過 maxHp {max_hp}")]
    HpExceedsMax { unit_id: ID, hp: u32, max_hp: u32 },
    #[error("單位 {unit_id} 的 `{field}` 必須大於 0")]
    NotPositive { unit_id: ID, field: &'static str },
    #[error("單位 ID 重複: {unit_id}")]
    DuplicateId { unit_id: ID },
    #[error("單位 {unit_id} 初始位置 ({x}, {y}) 不合法: {reason}")]
    InvalidInitialPosition {
        unit_id: ID,
        x: Coord,
        y: Coord,
        reason: String,
    },
}

/// 棋盤設定錯誤
#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("棋盤尺寸必須大於 0: {cols}x{rows}")]
    EmptyBoard { cols: Coord, rows: Coord },
    #[error("玩家部署欄數 {player_columns} 必須介於 1 與棋盤寬度 {cols} 之間")]
    InvalidPlayerColumns { player_columns: Coord, cols: Coord },
}

/// 格式載入錯誤
#[derive(Debug, ThisError)]
pub enum LoadError {
    #[error("{format} 反序列化失敗: {reason}")]
    DeserializeError { format: String, reason: String },
    #[error("{format} 序列化失敗: {reason}")]
    SerializeError { format: String, reason: String },
    #[error("讀取檔案 {path} 失敗: {reason}")]
    Io { path: String, reason: String },
}

/// 重播事件紀錄錯誤
#[derive(Debug, ThisError)]
pub enum ReplayError {
    #[error("事件紀錄缺少 start 事件")]
    MissingStart,
    #[error("第 {index} 筆事件引用不存在的單位 {unit_id}")]
    UnknownUnit { index: usize, unit_id: ID },
    #[error("第 {index} 筆事件不一致: {reason}")]
    Mismatch { index: usize, reason: String },
    #[error("重播結果與紀錄的單位快照不一致: {reason}")]
    SnapshotMismatch { reason: String },
}

/// 比賽結果傳送失敗（不影響本地結束狀態）
#[derive(Debug, ThisError)]
pub enum SubmitError {
    #[error("傳送失敗: {0}")]
    Transport(String),
    #[error("儲存端拒絕: {0}")]
    Rejected(String),
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// 若為非法行動，回傳拒絕原因
    pub fn action(&self) -> Option<&ActionError> {
        match &self.kind {
            ErrorKind::Action(err) => Some(err),
            _ => None,
        }
    }

    /// 添加錯誤上下文，自動記錄呼叫位置
    #[track_caller]
    pub fn context<C: Into<String>>(mut self, context: C) -> Self {
        let loc = std::panic::Location::caller();
        let msg = format!("{} [{}:{}]", context.into(), loc.file(), loc.line());
        self.contexts.push(msg);
        self
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)?;
        for ctx in &self.contexts {
            write!(f, "\n  {}", ctx)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

impl<E: Into<ErrorKind>> From<E> for Error {
    fn from(error: E) -> Self {
        Self {
            kind: error.into(),
            contexts: Vec::new(),
        }
    }
}

/// Result 擴展 trait，用於添加錯誤上下文
pub trait Context<T> {
    fn context<C: Into<String>>(self, context: C) -> Result<T>;
}

impl<T> Context<T> for Result<T> {
    #[track_caller]
    fn context<C: Into<String>>(self, context: C) -> Result<T> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(err.context(context)),
        }
    }
}
