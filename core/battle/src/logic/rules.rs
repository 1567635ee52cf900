//! 規則判定：移動距離、攻擊射程、傷害、勝負
//!
//! 只處理單位之間的規則本身，狀態機與事件紀錄由 `Battle` 負責。

use crate::domain::constants::MELEE_RANGE;
use crate::domain::core_types::{Position, Side, Unit, Winner};
use crate::error::ActionError;
use crate::logic::geometry::distance;

/// 攻擊結算結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackOutcome {
    pub damage: u32,
    pub target_hp: u32,
    pub killed: bool,
}

/// 移動距離必須落在 (0, moveRange]
pub fn check_move_range(unit: &Unit, to: Position) -> Result<(), ActionError> {
    let dist = distance(unit.position, to);
    if dist == 0 {
        return Err(ActionError::ZeroDistance);
    }
    if dist > unit.move_range {
        return Err(ActionError::TooFar {
            distance: dist,
            limit: unit.move_range,
        });
    }
    Ok(())
}

pub fn is_in_move_range(unit: &Unit, to: Position) -> bool {
    check_move_range(unit, to).is_ok()
}

/// 射程判定
///
/// - 遠程（range > 1）：0 < 距離 <= range
/// - 近戰（range <= 1）：距離必須剛好為 1
pub fn check_attack_range(attacker: &Unit, target: &Unit) -> Result<(), ActionError> {
    let dist = distance(attacker.position, target.position);
    let in_range = if attacker.range > MELEE_RANGE {
        dist > 0 && dist <= attacker.range
    } else {
        dist == MELEE_RANGE
    };
    if in_range {
        Ok(())
    } else {
        Err(ActionError::NotInRange {
            distance: dist,
            range: attacker.range,
        })
    }
}

pub fn is_in_attack_range(attacker: &Unit, target: &Unit) -> bool {
    check_attack_range(attacker, target).is_ok()
}

/// 結算一次攻擊：target.hp = max(0, hp - attack)
pub fn apply_attack(attacker: &Unit, target: &mut Unit) -> AttackOutcome {
    let damage = attacker.attack;
    let target_hp = target.take_damage(damage);
    AttackOutcome {
        damage,
        target_hp,
        killed: target_hp == 0,
    }
}

/// 判定勝負，雙方都還有存活單位時回傳 `None`
pub fn evaluate_victory(units: &[Unit]) -> Option<Winner> {
    let alive = |side: Side| units.iter().any(|u| u.side == side && u.is_alive());
    match (alive(Side::Player), alive(Side::Enemy)) {
        (true, true) => None,
        (false, false) => Some(Winner::Draw),
        (true, false) => Some(Winner::Player),
        (false, true) => Some(Winner::Enemy),
    }
}
