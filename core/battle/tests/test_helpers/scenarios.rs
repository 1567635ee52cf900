//! 測試輔助：常用的對戰場景

use super::level_builder::{LevelBuilder, Stats};
use battle::battle::{Battle, Command};
use battle::domain::core_types::Phase;

/// 雙方各兩個單位，從兩端互相接近
pub fn skirmish() -> Battle {
    LevelBuilder::from_ascii(
        "
        P1 . . . . E1
        .  . . . . .
        P2 . . . . E2
    ",
    )
    .player("P1", Stats::default().initiative(6).hp(20).attack(5).move_range(2))
    .enemy("E1", Stats::default().initiative(5).hp(15).attack(4).move_range(2))
    .player("P2", Stats::default().initiative(4).hp(20).attack(5).move_range(2))
    .enemy("E2", Stats::default().initiative(3).hp(15).attack(4).move_range(2))
    .battle()
    .unwrap()
}

/// 以貪婪策略替雙方自動對戰到分出勝負（最多 `max_steps` 次行動）
pub fn autoplay(battle: &mut Battle, max_steps: usize) {
    if battle.phase() == Phase::Placement {
        battle.dispatch(Command::StartBattle).unwrap();
    }
    for _ in 0..max_steps {
        if battle.result().is_some() {
            break;
        }
        battle.play_active_with_policy().unwrap();
    }
}
