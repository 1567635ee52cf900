//! 部署階段的預設擺放

use crate::config::BattleConfig;
use crate::domain::core_types::{Position, Unit};
use crate::logic::geometry::can_place_at;

/// 為未指定位置的單位找第一個合法空位
///
/// - 玩家單位：由上而下、由左而右掃描保留的部署欄
/// - 敵方單位：由上而下掃描最右側（x = cols - w）
///
/// `placed` 為已決定位置的單位。
pub fn find_free_position(placed: &[Unit], config: &BattleConfig, unit: &Unit) -> Option<Position> {
    let width = unit.footprint.width;
    let height = unit.footprint.height;
    let max_y = config.rows.checked_sub(height)?;
    let max_x = if unit.is_player() {
        config.player_columns.checked_sub(width)?
    } else {
        config.cols.checked_sub(width)?
    };
    let min_x = if unit.is_player() { 0 } else { max_x };

    (0..=max_y)
        .flat_map(|y| (min_x..=max_x).map(move |x| Position { x, y }))
        .find(|&pos| can_place_at(placed, config, unit, pos))
}
