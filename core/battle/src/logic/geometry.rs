//! 棋盤幾何：佔地、邊界、放置合法性
//!
//! 全部為純函數，只讀取當前單位集合，不產生副作用。

use crate::config::BattleConfig;
use crate::domain::alias::Distance;
use crate::domain::core_types::{Footprint, Position, Unit};
use crate::error::ActionError;

/// 移動方向（四方向）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// 電腦評估候選格的順序：+x、-x、+y、-y
pub const ORTHOGONAL: [Direction; 4] = [
    Direction::Right,
    Direction::Left,
    Direction::Down,
    Direction::Up,
];

/// 單位佔地尺寸
pub fn footprint(unit: &Unit) -> Footprint {
    unit.footprint
}

/// 單位存活且 `pos` 落在其佔地矩形內
pub fn occupies(unit: &Unit, pos: Position) -> bool {
    let Footprint { width, height } = footprint(unit);
    unit.is_alive()
        && pos.x >= unit.position.x
        && pos.x - unit.position.x < width
        && pos.y >= unit.position.y
        && pos.y - unit.position.y < height
}

/// 依清單順序找出第一個佔據該格的單位
pub fn unit_at(units: &[Unit], pos: Position) -> Option<&Unit> {
    units.iter().find(|unit| occupies(unit, pos))
}

/// 兩點之間的曼哈頓距離（以左上角為參考點）
pub fn distance(a: Position, b: Position) -> Distance {
    a.manhattan(b)
}

/// 驗證位置是否在棋盤邊界內
pub fn is_valid_position(config: &BattleConfig, pos: Position) -> bool {
    pos.x < config.cols && pos.y < config.rows
}

/// 計算往指定方向移動一格後的位置，超出棋盤回傳 `None`
pub fn step_in_direction(
    config: &BattleConfig,
    pos: Position,
    direction: Direction,
) -> Option<Position> {
    let new_pos = match direction {
        Direction::Up => Position {
            x: pos.x,
            y: pos.y.checked_sub(1)?,
        },
        Direction::Down => Position {
            x: pos.x,
            y: pos.y.checked_add(1)?,
        },
        Direction::Left => Position {
            x: pos.x.checked_sub(1)?,
            y: pos.y,
        },
        Direction::Right => Position {
            x: pos.x.checked_add(1)?,
            y: pos.y,
        },
    };
    is_valid_position(config, new_pos).then_some(new_pos)
}

/// 檢查單位能否以 `pos` 為左上角放置，回傳拒絕原因
///
/// 檢查順序：棋盤邊界、玩家部署欄、與其他存活單位重疊。
pub fn check_placement(
    units: &[Unit],
    config: &BattleConfig,
    unit: &Unit,
    pos: Position,
) -> Result<(), ActionError> {
    let Footprint { width, height } = footprint(unit);
    // 溢位一律視為超出邊界
    let fits = |start: usize, len: usize, limit: usize| {
        start.checked_add(len).is_some_and(|end| end <= limit)
    };
    if !fits(pos.x, width, config.cols) || !fits(pos.y, height, config.rows) {
        return Err(ActionError::OutOfBounds {
            x: pos.x,
            y: pos.y,
            width,
            height,
            cols: config.cols,
            rows: config.rows,
        });
    }
    if unit.is_player() && !fits(pos.x, width, config.player_columns) {
        return Err(ActionError::OutsidePlayerColumns {
            x: pos.x,
            width,
            player_columns: config.player_columns,
        });
    }
    for dy in 0..height {
        for dx in 0..width {
            let cell = Position {
                x: pos.x + dx,
                y: pos.y + dy,
            };
            let other = units
                .iter()
                .find(|other| other.id != unit.id && occupies(other, cell));
            if let Some(other) = other {
                return Err(ActionError::CellOccupied {
                    x: cell.x,
                    y: cell.y,
                    occupant: other.id,
                });
            }
        }
    }
    Ok(())
}

/// `check_placement` 的布林版本
pub fn can_place_at(units: &[Unit], config: &BattleConfig, unit: &Unit, pos: Position) -> bool {
    check_placement(units, config, unit, pos).is_ok()
}

/// 任兩個存活單位的佔地是否重疊
pub fn has_overlap(units: &[Unit]) -> bool {
    let alive: Vec<&Unit> = units.iter().filter(|u| u.is_alive()).collect();
    alive.iter().enumerate().any(|(i, a)| {
        alive[i + 1..].iter().any(|b| {
            spans_overlap(a.position.x, a.footprint.width, b.position.x, b.footprint.width)
                && spans_overlap(a.position.y, a.footprint.height, b.position.y, b.footprint.height)
        })
    })
}

// 以相減比較，座標接近上限時不會溢位
fn spans_overlap(a: usize, a_len: usize, b: usize, b_len: usize) -> bool {
    if a <= b { b - a < a_len } else { a - b < b_len }
}
