//! 單位資料載入與驗證

use crate::domain::constants::{DEFAULT_FOOTPRINT, MELEE_RANGE};
use crate::domain::core_types::{Footprint, Position, Side, Unit};
use crate::error::{DataError, LoadError, Result};
use crate::loader_schema::UnitDef;
use std::collections::HashSet;
use std::path::Path;

/// 解析 `units.json` 內容（有序陣列）
pub fn parse_units_json(json: &str) -> Result<Vec<UnitDef>> {
    let defs = serde_json::from_str(json).map_err(|e| LoadError::DeserializeError {
        format: "units.json".to_string(),
        reason: e.to_string(),
    })?;
    Ok(defs)
}

/// 從檔案載入 `units.json`
pub fn load_units_file(path: impl AsRef<Path>) -> Result<Vec<UnitDef>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    parse_units_json(&content)
}

impl UnitDef {
    /// 正規化並驗證為 `Unit`
    ///
    /// 回傳的單位尚未決定位置時 `Position` 為 `None`，由部署階段自動擺放。
    pub fn to_unit(&self, index: usize) -> Result<(Unit, Option<Position>)> {
        let missing = |field: &'static str| DataError::MissingField { index, field };

        let id = self.id.ok_or_else(|| missing("id"))?;
        let name = self.name.clone().ok_or_else(|| missing("name"))?;
        let is_player = self.is_player.ok_or_else(|| missing("isPlayer"))?;
        let hp = self.hp.ok_or_else(|| missing("hp"))?;
        let max_hp = self.max_hp.ok_or_else(|| missing("maxHp"))?;
        let attack = self.attack.ok_or_else(|| missing("attack"))?;
        let move_range = self.move_range.ok_or_else(|| missing("moveRange"))?;
        let initiative = self.initiative.ok_or_else(|| missing("initiative"))?;

        let not_positive = |field: &'static str| DataError::NotPositive { unit_id: id, field };
        if max_hp == 0 {
            return Err(not_positive("maxHp").into());
        }
        if hp == 0 {
            return Err(not_positive("hp").into());
        }
        if hp > max_hp {
            return Err(DataError::HpExceedsMax {
                unit_id: id,
                hp,
                max_hp,
            }
            .into());
        }

        // 別名優先序：w > width > size，h > height > size
        let width = self.w.or(self.width).or(self.size).unwrap_or(DEFAULT_FOOTPRINT);
        let height = self.h.or(self.height).or(self.size).unwrap_or(DEFAULT_FOOTPRINT);
        if width == 0 {
            return Err(not_positive("width").into());
        }
        if height == 0 {
            return Err(not_positive("height").into());
        }

        let range = self.range.unwrap_or(MELEE_RANGE);
        let position = match (self.x, self.y) {
            (Some(x), Some(y)) => Some(Position { x, y }),
            _ => None,
        };

        let unit = Unit {
            id,
            name,
            side: if is_player { Side::Player } else { Side::Enemy },
            hp,
            max_hp,
            attack,
            move_range,
            range,
            initiative,
            position: position.unwrap_or_default(),
            footprint: Footprint { width, height },
        };
        Ok((unit, position))
    }
}

/// 驗證整份單位清單，回傳（單位, 指定位置）並保留原始順序
pub fn validate_defs(defs: &[UnitDef]) -> Result<Vec<(Unit, Option<Position>)>> {
    let mut seen = HashSet::new();
    let mut units = Vec::with_capacity(defs.len());
    for (index, def) in defs.iter().enumerate() {
        let (unit, position) = def.to_unit(index)?;
        if !seen.insert(unit.id) {
            return Err(DataError::DuplicateId { unit_id: unit.id }.into());
        }
        units.push((unit, position));
    }
    Ok(units)
}
