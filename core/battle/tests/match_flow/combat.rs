use super::super::test_helpers::level_builder::{LevelBuilder, Stats};
use super::kinds;
use battle::battle::{Battle, Command};
use battle::domain::core_types::{Phase, Position, Winner};
use battle::error::ActionError;
use battle::recorder::MatchEvent;

/// 玩家先攻且一擊可擊殺的對決
fn duel() -> Battle {
    let mut battle = LevelBuilder::from_ascii(". P E .")
        .player("P", Stats::default().initiative(10).attack(10))
        .enemy("E", Stats::default().initiative(5).hp(10))
        .battle()
        .unwrap();
    battle.dispatch(Command::StartBattle).unwrap();
    battle
}

#[test]
fn test_scenario_player_wins_with_single_attack() {
    let mut battle = duel();
    assert_eq!(battle.phase(), Phase::PlayerTurn);
    assert_eq!(battle.active_unit().map(|u| u.id), Some(1));

    let phase = battle
        .dispatch(Command::AttackAt {
            pos: Position { x: 2, y: 0 },
        })
        .unwrap();
    assert_eq!(phase, Phase::PlayerTurn);
    assert!(battle.unit(2).is_none(), "陣亡單位應移出棋盤");
    assert_eq!(kinds(&battle), vec!["start", "attack", "kill"]);
    assert_eq!(
        battle.events()[1],
        MatchEvent::Attack {
            time: 0,
            attacker_id: 1,
            target_id: 2,
            damage: 10,
            target_hp: 0
        }
    );

    let phase = battle.dispatch(Command::EndTurn).unwrap();
    assert_eq!(phase, Phase::GameOver);
    assert_eq!(battle.winner(), Some(Winner::Player));

    let result = battle.result().expect("比賽結束應產生結果");
    assert_eq!(result.round, 1);
    assert_eq!(result.moves, battle.events());
    assert_eq!(result.units.len(), 1);
    assert_eq!(result.units[0].id, 1);
}

#[test]
fn test_move_beyond_range_rejected_without_side_effects() {
    let mut battle = LevelBuilder::from_ascii(
        "
        P . . E
        . . . .
        . . . .
        . . . .
        . . . .
    ",
    )
    .player("P", Stats::default().initiative(10).move_range(3))
    .enemy("E", Stats::default())
    .battle()
    .unwrap();
    battle.dispatch(Command::StartBattle).unwrap();

    let err = battle
        .dispatch(Command::MoveTo {
            pos: Position { x: 0, y: 4 },
        })
        .unwrap_err();
    assert_eq!(
        err.action(),
        Some(&ActionError::TooFar {
            distance: 4,
            limit: 3
        })
    );
    assert_eq!(battle.unit(1).map(|u| u.position), Some(Position { x: 0, y: 0 }));
    assert_eq!(battle.events().len(), 1);
    assert!(!battle.has_acted());

    battle
        .dispatch(Command::MoveTo {
            pos: Position { x: 0, y: 3 },
        })
        .unwrap();
    assert_eq!(
        battle.events()[1],
        MatchEvent::Move {
            time: 0,
            unit_id: 1,
            from: Position { x: 0, y: 0 },
            to: Position { x: 0, y: 3 },
        }
    );

    // 每回合只能行動一次
    let err = battle
        .dispatch(Command::MoveTo {
            pos: Position { x: 0, y: 2 },
        })
        .unwrap_err();
    assert_eq!(err.action(), Some(&ActionError::AlreadyActed { unit_id: 1 }));
}

#[test]
fn test_move_off_board_rejected() {
    let mut battle = duel();
    let err = battle
        .dispatch(Command::MoveTo {
            pos: Position {
                x: usize::MAX,
                y: usize::MAX,
            },
        })
        .unwrap_err();
    assert!(
        matches!(err.action(), Some(ActionError::OutOfBounds { .. })),
        "應為 OutOfBounds，實際為 {:?}",
        err.kind()
    );
    assert_eq!(battle.unit(1).map(|u| u.position), Some(Position { x: 1, y: 0 }));
    assert_eq!(battle.events().len(), 1);
    assert!(!battle.has_acted());

    let err = battle
        .dispatch(Command::AttackAt {
            pos: Position {
                x: usize::MAX,
                y: 0,
            },
        })
        .unwrap_err();
    assert_eq!(
        err.action(),
        Some(&ActionError::NoTargetAt {
            x: usize::MAX,
            y: 0
        })
    );
}

#[test]
fn test_player_cannot_leave_player_columns() {
    let mut battle = LevelBuilder::from_ascii("P . . . E")
        .player("P", Stats::default().initiative(10))
        .enemy("E", Stats::default())
        .battle()
        .unwrap();
    battle.dispatch(Command::StartBattle).unwrap();

    let err = battle
        .dispatch(Command::MoveTo {
            pos: Position { x: 2, y: 0 },
        })
        .unwrap_err();
    assert!(matches!(
        err.action(),
        Some(ActionError::OutsidePlayerColumns { .. })
    ));
    let err = battle
        .dispatch(Command::MoveTo {
            pos: Position { x: 0, y: 0 },
        })
        .unwrap_err();
    assert_eq!(err.action(), Some(&ActionError::ZeroDistance));
}

#[test]
fn test_attack_rejections() {
    let mut battle = LevelBuilder::from_ascii(
        "
        P Q . E
        . . . .
    ",
    )
    .player("P", Stats::default().initiative(10))
    .player("Q", Stats::default())
    .enemy("E", Stats::default())
    .battle()
    .unwrap();
    battle.dispatch(Command::StartBattle).unwrap();

    let err = battle
        .dispatch(Command::AttackAt {
            pos: Position { x: 1, y: 0 },
        })
        .unwrap_err();
    assert_eq!(
        err.action(),
        Some(&ActionError::SameSide {
            attacker: 1,
            target: 2
        })
    );

    let err = battle
        .dispatch(Command::AttackAt {
            pos: Position { x: 2, y: 1 },
        })
        .unwrap_err();
    assert_eq!(err.action(), Some(&ActionError::NoTargetAt { x: 2, y: 1 }));

    let err = battle
        .dispatch(Command::AttackAt {
            pos: Position { x: 3, y: 0 },
        })
        .unwrap_err();
    assert_eq!(
        err.action(),
        Some(&ActionError::NotInRange {
            distance: 3,
            range: 1
        })
    );

    // 非行動中的單位不能行動
    let err = battle.move_unit(2, Position { x: 1, y: 1 }).unwrap_err();
    assert_eq!(err.action(), Some(&ActionError::NotActiveUnit { unit_id: 2 }));

    assert_eq!(battle.events().len(), 1);
    assert!(!battle.has_acted());
}

#[test]
fn test_ranged_attack_hits_any_cell_of_wide_target() {
    let mut battle = LevelBuilder::from_ascii(
        "
        A . . . .
        . . . O .
        . . . . .
    ",
    )
    .player("A", Stats::default().initiative(10).range(4).attack(4))
    .enemy("O", Stats::default().size(2, 2).hp(20))
    .battle()
    .unwrap();
    battle.dispatch(Command::StartBattle).unwrap();

    // 點擊目標右下角的格子
    battle
        .dispatch(Command::AttackAt {
            pos: Position { x: 4, y: 2 },
        })
        .unwrap();
    assert_eq!(battle.unit(2).map(|u| u.hp), Some(16));
    assert_eq!(kinds(&battle), vec!["start", "attack"]);
}
