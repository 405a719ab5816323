//! Persisted activity records: every variant survives a round trip, and
//! anything that does not name a known variant is rejected outright.

use idlesim::activity::{
    ActivityError, ActivityState, CombatActivity, CombatContext, CombatProgressState,
    GatheringActivity, ObstacleCourseActivity,
};
use idlesim::core::ids::{ActionId, DungeonId, MonsterId};
use serde_json::json;

fn all_variants() -> Vec<ActivityState> {
    let mut course = ObstacleCourseActivity::new(
        vec![
            ActionId::new("cargo_net"),
            ActionId::new("balance_beam"),
            ActionId::new("rope_swing"),
        ],
        50,
    )
    .unwrap();
    course.current_obstacle_index = 2;
    course.progress_ticks = 17;

    let mut dungeon = CombatContext::sequence(
        DungeonId::new("goblin_camp"),
        vec![
            MonsterId::new("goblin"),
            MonsterId::new("goblin"),
            MonsterId::new("goblin_chief"),
        ],
    )
    .unwrap();
    if let CombatContext::Sequence {
        current_monster_index,
        ..
    } = &mut dungeon
    {
        *current_monster_index = 1;
    }

    vec![
        ActivityState::Gathering(GatheringActivity::new(ActionId::new("normal_tree"), 30, None)),
        ActivityState::Gathering(GatheringActivity {
            progress_ticks: 12,
            ..GatheringActivity::new(ActionId::new("bronze_bar"), 20, Some(1))
        }),
        ActivityState::ObstacleCourse(course),
        ActivityState::Combat(CombatActivity {
            context: CombatContext::single(MonsterId::new("chicken")),
            progress: CombatProgressState::spawning(30, 12),
            progress_ticks: 0,
            total_ticks: 24,
        }),
        ActivityState::Combat(CombatActivity {
            context: dungeon,
            progress: CombatProgressState {
                monster_hp: 41,
                player_attack_ticks_remaining: 5,
                monster_attack_ticks_remaining: 9,
                spawn_ticks_remaining: None,
            },
            progress_ticks: 19,
            total_ticks: 24,
        }),
    ]
}

#[test]
fn test_every_variant_round_trips_through_record() {
    for activity in all_variants() {
        let record = activity.to_record().unwrap();
        let restored = ActivityState::from_record(record.clone()).unwrap();
        assert_eq!(restored, activity, "record: {}", record);
    }
}

#[test]
fn test_every_variant_round_trips_through_json() {
    for activity in all_variants() {
        let json = activity.to_json().unwrap();
        assert_eq!(ActivityState::from_json(&json).unwrap(), activity);
    }
}

#[test]
fn test_serde_deserialize_matches_from_record() {
    for activity in all_variants() {
        let json = activity.to_json().unwrap();
        let via_serde: ActivityState = serde_json::from_str(&json).unwrap();
        assert_eq!(via_serde, activity);
    }
}

#[test]
fn test_derived_fields_survive_round_trip() {
    let activities = all_variants();
    let ActivityState::ObstacleCourse(course) = &activities[2] else {
        panic!("expected a course");
    };
    let restored = ActivityState::from_json(&activities[2].to_json().unwrap()).unwrap();
    let ActivityState::ObstacleCourse(restored) = restored else {
        panic!("expected a course");
    };
    assert_eq!(restored.current_obstacle_id(), course.current_obstacle_id());
    assert!(restored.is_last_obstacle());

    let ActivityState::Combat(fight) = &activities[3] else {
        panic!("expected combat");
    };
    assert!(fight.progress.is_spawning());
    assert!(!fight.context.is_last_monster());
}

#[test]
fn test_unknown_discriminator_fails() {
    let err = ActivityState::from_record(json!({"type": "thieving", "action_id": "man"}))
        .unwrap_err();
    assert!(matches!(err, ActivityError::UnknownType { .. }));
    assert!(err.to_string().contains("thieving"));
}

#[test]
fn test_absent_record_is_none() {
    assert_eq!(ActivityState::maybe_from_record(None).unwrap(), None);
    assert_eq!(
        ActivityState::maybe_from_record(Some(serde_json::Value::Null)).unwrap(),
        None
    );
}

#[test]
fn test_wrong_field_type_is_malformed() {
    let err = ActivityState::from_record(json!({
        "type": "gathering",
        "action_id": "normal_tree",
        "progress_ticks": "soon",
        "total_ticks": 30
    }))
    .unwrap_err();
    assert!(matches!(err, ActivityError::Malformed { .. }), "{:?}", err);
}
