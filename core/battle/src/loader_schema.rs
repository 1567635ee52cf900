//! Loader 相關的資料結構定義

use crate::domain::alias::{Coord, Distance, ID};
use crate::domain::core_types::Unit;
use serde::{Deserialize, Serialize};

/// `units.json` 中的單一單位定義
///
/// 必填欄位以 `Option` 表示，缺漏時在開局驗證階段回報錯誤，而不是靜默套用預設值。
/// 佔地尺寸接受 `w`/`width`/`size` 與 `h`/`height`/`size` 等別名，射程預設為近戰。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitDef {
    pub id: Option<ID>,
    pub name: Option<String>,
    pub is_player: Option<bool>,
    pub hp: Option<u32>,
    pub max_hp: Option<u32>,
    pub attack: Option<u32>,
    pub move_range: Option<Distance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<Distance>,
    pub initiative: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<Coord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<Coord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Coord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub w: Option<Coord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Coord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h: Option<Coord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<Coord>,
}

impl From<&Unit> for UnitDef {
    fn from(unit: &Unit) -> Self {
        Self {
            id: Some(unit.id),
            name: Some(unit.name.clone()),
            is_player: Some(unit.is_player()),
            hp: Some(unit.hp),
            max_hp: Some(unit.max_hp),
            attack: Some(unit.attack),
            move_range: Some(unit.move_range),
            range: Some(unit.range),
            initiative: Some(unit.initiative),
            x: Some(unit.position.x),
            y: Some(unit.position.y),
            size: None,
            w: Some(unit.footprint.width),
            width: None,
            h: Some(unit.footprint.height),
            height: None,
        }
    }
}
