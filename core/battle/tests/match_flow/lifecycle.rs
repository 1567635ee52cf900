use super::super::test_helpers::level_builder::{LevelBuilder, Stats};
use super::super::test_helpers::scenarios::skirmish;
use battle::battle::{Battle, Command};
use battle::domain::core_types::{Phase, Position, Winner};
use battle::error::ActionError;
use battle::logic::geometry::has_overlap;
use battle::result::MemorySink;
use std::collections::HashSet;

/// 已分出勝負的比賽
fn finished() -> Battle {
    let mut battle = LevelBuilder::from_ascii("P E")
        .player("P", Stats::default().initiative(10).attack(10))
        .enemy("E", Stats::default().hp(10))
        .battle()
        .unwrap();
    battle.dispatch(Command::StartBattle).unwrap();
    battle
        .dispatch(Command::AttackAt {
            pos: Position { x: 1, y: 0 },
        })
        .unwrap();
    battle.dispatch(Command::EndTurn).unwrap();
    battle
}

// ============================================================================
// 比賽結束
// ============================================================================

#[test]
fn test_victory_is_idempotent() {
    let mut battle = finished();
    assert_eq!(battle.phase(), Phase::GameOver);
    let result = battle.result().cloned().unwrap();
    let events = battle.events().len();

    assert_eq!(battle.check_victory(), Some(Winner::Player));
    assert_eq!(battle.check_victory(), Some(Winner::Player));
    assert_eq!(battle.result(), Some(&result));
    assert_eq!(battle.events().len(), events);
}

#[test]
fn test_game_over_rejects_commands() {
    let mut battle = finished();
    for command in [
        Command::EndTurn,
        Command::Abandon,
        Command::StartBattle,
        Command::MoveTo {
            pos: Position { x: 0, y: 0 },
        },
        Command::PlaceAt {
            pos: Position { x: 0, y: 0 },
        },
    ] {
        let err = battle.dispatch(command).unwrap_err();
        assert_eq!(err.action(), Some(&ActionError::GameOver), "{command:?}");
    }
    assert!(battle.run_ai_turn().is_err());
    assert!(battle.play_active_with_policy().is_err());
}

#[test]
fn test_empty_battle_is_draw() {
    let mut battle = LevelBuilder::from_ascii(". .").battle().unwrap();
    battle.dispatch(Command::StartBattle).unwrap();
    assert_eq!(battle.phase(), Phase::GameOver);
    assert_eq!(battle.winner(), Some(Winner::Draw));
}

// ============================================================================
// 放棄
// ============================================================================

#[test]
fn test_abandon_restores_initial_state() {
    let (config, mut defs) = LevelBuilder::from_ascii("P . . . E")
        .player("P", Stats::default().initiative(10))
        .enemy("E", Stats::default())
        .build()
        .unwrap();
    let mut battle = Battle::new(config, &defs).unwrap();
    // 呼叫端之後修改定義不影響比賽
    defs[0].x = Some(1);

    battle.dispatch(Command::StartBattle).unwrap();
    battle
        .dispatch(Command::MoveTo {
            pos: Position { x: 0, y: 2 },
        })
        .unwrap_err();
    battle
        .dispatch(Command::MoveTo {
            pos: Position { x: 1, y: 0 },
        })
        .unwrap();
    assert_eq!(battle.events().len(), 2);

    let phase = battle.dispatch(Command::Abandon).unwrap();
    assert_eq!(phase, Phase::Placement);
    assert!(battle.events().is_empty());
    assert!(battle.result().is_none());
    assert_eq!(battle.round(), 0);
    assert_eq!(battle.unit(1).map(|u| u.position), Some(Position { x: 0, y: 0 }));

    battle.dispatch(Command::StartBattle).unwrap();
    assert_eq!(battle.round(), 1);
    assert_eq!(battle.events().len(), 1);
}

// ============================================================================
// 結果傳送
// ============================================================================

#[test]
fn test_submit_result_once() {
    let mut battle = finished();
    let mut sink = MemorySink::default();

    assert_eq!(battle.submit_result(&mut sink), Some(1));
    assert_eq!(battle.submit_result(&mut sink), Some(1));
    assert_eq!(sink.stored.len(), 1);
    assert_eq!(battle.saved_match_id(), Some(1));
    assert_eq!(Some(&sink.stored[0]), battle.result());
}

#[test]
fn test_submit_failure_is_not_fatal() {
    let mut battle = finished();
    let mut offline = MemorySink {
        fail_with: Some("連線逾時".to_string()),
        ..Default::default()
    };
    assert_eq!(battle.submit_result(&mut offline), None);
    assert_eq!(battle.phase(), Phase::GameOver);
    assert_eq!(battle.winner(), Some(Winner::Player));

    // 不重送
    let mut sink = MemorySink::default();
    assert_eq!(battle.submit_result(&mut sink), None);
    assert!(sink.stored.is_empty());
}

#[test]
fn test_submit_before_game_over_does_nothing() {
    let mut battle = skirmish();
    let mut sink = MemorySink::default();
    assert_eq!(battle.submit_result(&mut sink), None);
    battle.dispatch(Command::StartBattle).unwrap();
    assert_eq!(battle.submit_result(&mut sink), None);
    assert!(sink.stored.is_empty());
}

// ============================================================================
// 自動對戰
// ============================================================================

#[test]
fn test_autoplay_keeps_board_consistent() {
    let mut battle = skirmish();
    battle.dispatch(Command::StartBattle).unwrap();

    for _ in 0..500 {
        if battle.phase() == Phase::GameOver {
            break;
        }
        battle.play_active_with_policy().unwrap();

        assert!(!has_overlap(battle.units()), "單位佔地不應重疊");
        let living: HashSet<u32> = battle
            .units()
            .iter()
            .filter(|u| u.is_alive())
            .map(|u| u.id)
            .collect();
        let ordered: HashSet<u32> = battle.turn_order().order().iter().copied().collect();
        assert_eq!(living, ordered, "行動順序應只包含存活單位");
        assert!(battle.units().iter().all(|u| u.hp <= u.max_hp));
    }

    assert_eq!(battle.phase(), Phase::GameOver);
    let result = battle.result().unwrap();
    assert!(result.round >= 1);
    assert_eq!(result.round, battle.round());
}
