//! 電腦決策：確定性的貪婪策略
//!
//! 1. 找最近的敵對存活單位（同距離取先出現者）
//! 2. 在射程內就攻擊
//! 3. 否則在四個相鄰格中找能縮短距離的合法格移動，沒有就原地待命

use crate::config::BattleConfig;
use crate::domain::alias::ID;
use crate::domain::core_types::{Position, Unit};
use crate::error::{ActionError, Result};
use crate::logic::geometry::{ORTHOGONAL, can_place_at, distance, step_in_direction};
use crate::logic::rules::is_in_attack_range;

/// 決策結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Attack { target_id: ID },
    Move { to: Position },
    Pass,
}

/// 為指定單位決定本回合行動，不修改任何狀態
pub fn decide_action(units: &[Unit], config: &BattleConfig, unit_id: ID) -> Result<Action> {
    let unit = units
        .iter()
        .find(|u| u.id == unit_id)
        .ok_or(ActionError::UnitNotFound { unit_id })?;
    if !unit.is_alive() {
        return Err(ActionError::UnitDead { unit_id }.into());
    }

    let Some((target, target_dist)) = nearest_target(units, unit) else {
        // 沒有敵對單位，交給勝負判定
        return Ok(Action::Pass);
    };

    if is_in_attack_range(unit, target) {
        return Ok(Action::Attack {
            target_id: target.id,
        });
    }

    let mut best: Option<Position> = None;
    let mut best_dist = target_dist;
    for direction in ORTHOGONAL {
        let Some(candidate) = step_in_direction(config, unit.position, direction) else {
            continue;
        };
        if !can_place_at(units, config, unit, candidate) {
            continue;
        }
        if distance(unit.position, candidate) > unit.move_range {
            continue;
        }
        let dist = distance(candidate, target.position);
        if dist < best_dist {
            best_dist = dist;
            best = Some(candidate);
        }
    }

    Ok(match best {
        Some(to) => Action::Move { to },
        None => Action::Pass,
    })
}

/// 最近的敵對存活單位與其距離
pub fn nearest_target<'a>(units: &'a [Unit], unit: &Unit) -> Option<(&'a Unit, usize)> {
    let opponent = unit.side.opponent();
    let mut nearest: Option<(&Unit, usize)> = None;
    for other in units.iter().filter(|u| u.side == opponent && u.is_alive()) {
        let dist = distance(unit.position, other.position);
        match nearest {
            Some((_, best)) if dist >= best => {}
            _ => nearest = Some((other, dist)),
        }
    }
    nearest
}
