use battle::config::BattleConfig;
use battle::domain::core_types::{Footprint, Position, Side, Unit};
use battle::error::ActionError;
use battle::logic::ai::{Action, decide_action, nearest_target};

fn unit(id: u32, side: Side, x: usize, y: usize) -> Unit {
    Unit {
        id,
        name: format!("u{id}"),
        side,
        hp: 10,
        max_hp: 10,
        attack: 3,
        move_range: 2,
        range: 1,
        initiative: 0,
        position: Position { x, y },
        footprint: Footprint::default(),
    }
}

fn open_board() -> BattleConfig {
    BattleConfig::new(6, 6, 6).unwrap()
}

#[test]
fn test_attacks_target_in_range() {
    let units = vec![unit(1, Side::Player, 2, 2), unit(2, Side::Enemy, 3, 2)];
    let action = decide_action(&units, &open_board(), 2).unwrap();
    assert_eq!(action, Action::Attack { target_id: 1 });
}

#[test]
fn test_equidistant_targets_pick_first_listed() {
    let units = vec![
        unit(1, Side::Player, 0, 2),
        unit(2, Side::Player, 4, 2),
        unit(3, Side::Enemy, 2, 2),
    ];
    let (target, dist) = nearest_target(&units, &units[2]).unwrap();
    assert_eq!((target.id, dist), (1, 2));

    let action = decide_action(&units, &open_board(), 3).unwrap();
    assert_eq!(
        action,
        Action::Move {
            to: Position { x: 1, y: 2 }
        }
    );
}

#[test]
fn test_equal_candidates_keep_earlier_direction() {
    // 左與上都縮短到距離 3，依 +x、-x、+y、-y 順序取左
    let units = vec![unit(1, Side::Player, 1, 1), unit(2, Side::Enemy, 3, 3)];
    let action = decide_action(&units, &open_board(), 2).unwrap();
    assert_eq!(
        action,
        Action::Move {
            to: Position { x: 2, y: 3 }
        }
    );
}

#[test]
fn test_blocked_unit_passes() {
    let config = BattleConfig::new(3, 1, 1).unwrap();
    let units = vec![
        unit(1, Side::Player, 0, 0),
        unit(2, Side::Enemy, 1, 0),
        unit(3, Side::Enemy, 2, 0),
    ];
    assert_eq!(decide_action(&units, &config, 3).unwrap(), Action::Pass);
}

#[test]
fn test_zero_move_range_passes() {
    let mut sentry = unit(2, Side::Enemy, 4, 4);
    sentry.move_range = 0;
    let units = vec![unit(1, Side::Player, 0, 0), sentry];
    assert_eq!(decide_action(&units, &open_board(), 2).unwrap(), Action::Pass);
}

#[test]
fn test_no_opponent_passes() {
    let units = vec![unit(1, Side::Enemy, 0, 0), unit(2, Side::Enemy, 3, 3)];
    assert_eq!(decide_action(&units, &open_board(), 1).unwrap(), Action::Pass);
}

#[test]
fn test_player_policy_stays_in_player_columns() {
    let config = BattleConfig::new(6, 1, 2).unwrap();
    let units = vec![unit(1, Side::Player, 1, 0), unit(2, Side::Enemy, 4, 0)];
    assert_eq!(decide_action(&units, &config, 1).unwrap(), Action::Pass);
}

#[test]
fn test_dead_or_unknown_unit_rejected() {
    let mut ghost = unit(2, Side::Enemy, 3, 3);
    ghost.hp = 0;
    let units = vec![unit(1, Side::Player, 0, 0), ghost];

    let err = decide_action(&units, &open_board(), 2).unwrap_err();
    assert_eq!(err.action(), Some(&ActionError::UnitDead { unit_id: 2 }));
    let err = decide_action(&units, &open_board(), 9).unwrap_err();
    assert_eq!(err.action(), Some(&ActionError::UnitNotFound { unit_id: 9 }));
}
