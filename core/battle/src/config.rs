//! 棋盤設定

use crate::domain::alias::Coord;
use crate::domain::constants::{DEFAULT_COLS, DEFAULT_PLAYER_COLUMNS, DEFAULT_ROWS};
use crate::error::{ConfigError, LoadError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 棋盤尺寸與玩家部署欄數
///
/// TOML 範例：
/// ```toml
/// cols = 12
/// rows = 10
/// playerColumns = 2
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct BattleConfig {
    pub cols: Coord,
    pub rows: Coord,
    pub player_columns: Coord,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            cols: DEFAULT_COLS,
            rows: DEFAULT_ROWS,
            player_columns: DEFAULT_PLAYER_COLUMNS,
        }
    }
}

impl BattleConfig {
    pub fn new(cols: Coord, rows: Coord, player_columns: Coord) -> Result<Self> {
        let config = Self {
            cols,
            rows,
            player_columns,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: BattleConfig =
            toml::from_str(toml_str).map_err(|e| LoadError::DeserializeError {
                format: "board.toml".to_string(),
                reason: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cols == 0 || self.rows == 0 {
            return Err(ConfigError::EmptyBoard {
                cols: self.cols,
                rows: self.rows,
            }
            .into());
        }
        if self.player_columns == 0 || self.player_columns > self.cols {
            return Err(ConfigError::InvalidPlayerColumns {
                player_columns: self.player_columns,
                cols: self.cols,
            }
            .into());
        }
        Ok(())
    }
}
