//! 事件紀錄重播：由開戰快照依序套用事件，驗證紀錄能重現同一場比賽

use crate::domain::alias::ID;
use crate::domain::core_types::Unit;
use crate::error::{ReplayError, Result};
use crate::logic::geometry::has_overlap;
use crate::logic::rules::evaluate_victory;
use crate::recorder::MatchEvent;
use crate::result::{MatchResult, UnitSummary};

/// 重播事件紀錄，回傳最終存活單位
///
/// 開戰前的 `place` 事件已反映在 `start` 快照中，直接略過。
pub fn replay(events: &[MatchEvent]) -> Result<Vec<Unit>> {
    let start = events
        .iter()
        .position(|e| matches!(e, MatchEvent::Start { .. }))
        .ok_or(ReplayError::MissingStart)?;
    let mut units = match &events[start] {
        MatchEvent::Start { units, .. } => units.clone(),
        _ => return Err(ReplayError::MissingStart.into()),
    };

    for (index, event) in events.iter().enumerate().skip(start + 1) {
        let mismatch = |reason: String| ReplayError::Mismatch { index, reason };
        match event {
            MatchEvent::Start { .. } | MatchEvent::Place { .. } => {
                return Err(mismatch(format!("開戰後不應出現 {} 事件", event.kind())).into());
            }
            MatchEvent::Move {
                unit_id, from, to, ..
            } => {
                let unit = find_mut(&mut units, index, *unit_id)?;
                if unit.position != *from {
                    return Err(mismatch(format!(
                        "單位 {unit_id} 位於 {:?}，紀錄為 {:?}",
                        unit.position, from
                    ))
                    .into());
                }
                unit.position = *to;
                if has_overlap(&units) {
                    return Err(mismatch(format!("單位 {unit_id} 移動後與其他單位重疊")).into());
                }
            }
            MatchEvent::Attack {
                attacker_id,
                target_id,
                damage,
                target_hp,
                ..
            } => {
                let attack = find_mut(&mut units, index, *attacker_id)?.attack;
                if attack != *damage {
                    return Err(mismatch(format!(
                        "單位 {attacker_id} 攻擊力 {attack}，紀錄傷害 {damage}"
                    ))
                    .into());
                }
                let target = find_mut(&mut units, index, *target_id)?;
                let hp = target.take_damage(*damage);
                if hp != *target_hp {
                    return Err(mismatch(format!(
                        "單位 {target_id} 剩餘 HP {hp}，紀錄為 {target_hp}"
                    ))
                    .into());
                }
            }
            MatchEvent::Kill { victim_id, .. } => {
                let victim = find_mut(&mut units, index, *victim_id)?;
                if victim.is_alive() {
                    return Err(mismatch(format!("單位 {victim_id} 仍有 HP {}", victim.hp)).into());
                }
                units.retain(|u| u.id != *victim_id);
            }
        }
    }

    Ok(units)
}

/// 重播比賽結果並比對最終單位快照與勝方
pub fn verify_result(result: &MatchResult) -> Result<Vec<Unit>> {
    let survivors = replay(&result.moves)?;
    let summaries: Vec<UnitSummary> = survivors.iter().map(UnitSummary::from).collect();
    if summaries != result.units {
        return Err(ReplayError::SnapshotMismatch {
            reason: format!(
                "重播存活 {} 個單位，紀錄 {} 個",
                summaries.len(),
                result.units.len()
            ),
        }
        .into());
    }
    if evaluate_victory(&survivors) != Some(result.winner) {
        return Err(ReplayError::SnapshotMismatch {
            reason: format!("紀錄勝方 {} 與重播結果不符", result.winner),
        }
        .into());
    }
    Ok(survivors)
}

fn find_mut(units: &mut [Unit], index: usize, unit_id: ID) -> Result<&mut Unit> {
    units
        .iter_mut()
        .find(|u| u.id == unit_id)
        .ok_or_else(|| ReplayError::UnknownUnit { index, unit_id }.into())
}
