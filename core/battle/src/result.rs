//! 比賽結果與傳送介面

use crate::domain::alias::{ID, MatchId};
use crate::domain::core_types::{Unit, Winner};
use crate::error::{LoadError, Result, SubmitError};
use crate::recorder::MatchEvent;
use serde::{Deserialize, Serialize};

/// 結果中的單位摘要
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitSummary {
    pub id: ID,
    pub name: String,
    pub is_player: bool,
    pub hp: u32,
    pub max_hp: u32,
    pub attack: u32,
}

impl From<&Unit> for UnitSummary {
    fn from(unit: &Unit) -> Self {
        Self {
            id: unit.id,
            name: unit.name.clone(),
            is_player: unit.is_player(),
            hp: unit.hp,
            max_hp: unit.max_hp,
            attack: unit.attack,
        }
    }
}

/// 比賽結果：勝方、結束回合、最終單位快照、完整事件紀錄
///
/// 只在第一次判定勝負時產生一次。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub winner: Winner,
    pub round: u32,
    pub units: Vec<UnitSummary>,
    pub moves: Vec<MatchEvent>,
}

impl MatchResult {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            LoadError::SerializeError {
                format: "match result".to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            LoadError::DeserializeError {
                format: "match result".to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

/// 比賽結果的外部儲存端
pub trait ResultSink {
    /// 送出結果，成功時回傳儲存端配發的 ID
    fn submit(&mut self, result: &MatchResult) -> std::result::Result<MatchId, SubmitError>;
}

/// 記憶體儲存端（測試用）
#[derive(Debug, Default)]
pub struct MemorySink {
    pub stored: Vec<MatchResult>,
    /// 設定後每次送出都以此原因失敗
    pub fail_with: Option<String>,
}

impl ResultSink for MemorySink {
    fn submit(&mut self, result: &MatchResult) -> std::result::Result<MatchId, SubmitError> {
        if let Some(reason) = &self.fail_with {
            return Err(SubmitError::Transport(reason.clone()));
        }
        self.stored.push(result.clone());
        Ok(self.stored.len() as MatchId)
    }
}
