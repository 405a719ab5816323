//! Tagged-record persistence for activities.
//!
//! Records are JSON objects with a `type` discriminator. Reading one either
//! yields a structurally valid activity or a descriptive error; there is no
//! silent fallback for unknown types.

use super::types::{
    ActivityState, CombatActivity, CombatContext, GatheringActivity, ObstacleCourseActivity,
};
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

pub const ACTIVITY_TYPES: &[&str] = &["gathering", "obstacle_course", "combat"];
pub const COMBAT_CONTEXT_TYPES: &[&str] = &["single_monster", "sequence"];

#[derive(Debug, thiserror::Error)]
pub enum ActivityError {
    #[error("unknown {what} type `{found}` (expected one of: {})", .expected.join(", "))]
    UnknownType {
        what: &'static str,
        found: String,
        expected: &'static [&'static str],
    },

    #[error("{what} record has no string `type` field")]
    MissingType { what: &'static str },

    #[error("{what} record must be a JSON object, got {found}")]
    NotAnObject { what: &'static str, found: &'static str },

    #[error("malformed `{kind}` record: {source}")]
    Malformed {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid `{kind}` record: {reason}")]
    Invalid { kind: &'static str, reason: String },

    #[error("failed to encode activity: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ActivityState {
    /// Reads an activity from its tagged record.
    pub fn from_record(record: Value) -> Result<Self, ActivityError> {
        let (kind, fields) = split_tag(record, "activity", ACTIVITY_TYPES)?;
        let activity = match kind {
            "gathering" => ActivityState::Gathering(parse::<GatheringActivity>(kind, fields)?),
            "obstacle_course" => {
                let course = parse::<ObstacleCourseActivity>(kind, fields)?;
                if course.obstacle_ids.is_empty() {
                    return Err(invalid(kind, "course has no obstacles"));
                }
                if !course.index_in_range() {
                    return Err(invalid(
                        kind,
                        format!(
                            "obstacle index {} out of range for {} obstacles",
                            course.current_obstacle_index,
                            course.obstacle_count()
                        ),
                    ));
                }
                ActivityState::ObstacleCourse(course)
            }
            _ => ActivityState::Combat(parse::<CombatActivity>(kind, fields)?),
        };
        Ok(activity)
    }

    /// Like `from_record`, but an absent or `null` record means "no activity".
    pub fn maybe_from_record(record: Option<Value>) -> Result<Option<Self>, ActivityError> {
        match record {
            None | Some(Value::Null) => Ok(None),
            Some(value) => Self::from_record(value).map(Some),
        }
    }

    pub fn to_record(&self) -> Result<Value, ActivityError> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ActivityError> {
        let value: Value = serde_json::from_str(json).map_err(|source| ActivityError::Malformed {
            kind: "activity",
            source,
        })?;
        Self::from_record(value)
    }

    pub fn to_json(&self) -> Result<String, ActivityError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl CombatContext {
    pub fn from_record(record: Value) -> Result<Self, ActivityError> {
        let (kind, mut fields) = split_tag(record, "combat context", COMBAT_CONTEXT_TYPES)?;
        if kind == "single_monster" {
            let monster_id = take_field(&mut fields, kind, "monster_id")?;
            return Ok(CombatContext::SingleMonster { monster_id });
        }

        let sequence_id = take_field(&mut fields, kind, "sequence_id")?;
        let current_monster_index = take_field(&mut fields, kind, "current_monster_index")?;
        let monster_ids: Vec<_> = take_field(&mut fields, kind, "monster_ids")?;
        let context = CombatContext::Sequence {
            sequence_id,
            current_monster_index,
            monster_ids,
        };
        match &context {
            CombatContext::Sequence { monster_ids, .. } if monster_ids.is_empty() => {
                Err(invalid(kind, "sequence has no monsters"))
            }
            _ if !context.index_in_range() => Err(invalid(
                kind,
                format!("monster index {} out of range", current_monster_index),
            )),
            _ => Ok(context),
        }
    }
}

impl<'de> Deserialize<'de> for ActivityState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        ActivityState::from_record(value).map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for CombatContext {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        CombatContext::from_record(value).map_err(de::Error::custom)
    }
}

/// Splits off the `type` field and resolves it against `known`.
fn split_tag(
    record: Value,
    what: &'static str,
    known: &'static [&'static str],
) -> Result<(&'static str, Map<String, Value>), ActivityError> {
    let mut fields = match record {
        Value::Object(fields) => fields,
        other => {
            return Err(ActivityError::NotAnObject {
                what,
                found: json_kind(&other),
            })
        }
    };
    let tag = match fields.remove("type") {
        Some(Value::String(tag)) => tag,
        _ => return Err(ActivityError::MissingType { what }),
    };
    let kind = known
        .iter()
        .copied()
        .find(|k| *k == tag)
        .ok_or(ActivityError::UnknownType {
            what,
            found: tag,
            expected: known,
        })?;
    Ok((kind, fields))
}

fn parse<T: DeserializeOwned>(
    kind: &'static str,
    fields: Map<String, Value>,
) -> Result<T, ActivityError> {
    serde_json::from_value(Value::Object(fields))
        .map_err(|source| ActivityError::Malformed { kind, source })
}

fn take_field<T: DeserializeOwned>(
    fields: &mut Map<String, Value>,
    kind: &'static str,
    name: &'static str,
) -> Result<T, ActivityError> {
    let value = fields
        .remove(name)
        .ok_or_else(|| invalid(kind, format!("missing field `{}`", name)))?;
    serde_json::from_value(value).map_err(|source| ActivityError::Malformed { kind, source })
}

fn invalid(kind: &'static str, reason: impl Into<String>) -> ActivityError {
    ActivityError::Invalid {
        kind,
        reason: reason.into(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::types::CombatProgressState;
    use serde_json::json;

    #[test]
    fn test_gathering_record_shape() {
        let activity =
            ActivityState::Gathering(GatheringActivity::new("oak_tree".into(), 40, None));
        let record = activity.to_record().unwrap();
        assert_eq!(
            record,
            json!({
                "type": "gathering",
                "action_id": "oak_tree",
                "progress_ticks": 0,
                "total_ticks": 40,
            })
        );
    }

    #[test]
    fn test_combat_record_round_trip() {
        let activity = ActivityState::Combat(CombatActivity {
            context: CombatContext::Sequence {
                sequence_id: "goblin_camp".into(),
                current_monster_index: 2,
                monster_ids: vec!["goblin".into(), "goblin".into(), "goblin_chief".into()],
            },
            progress: CombatProgressState {
                monster_hp: 150,
                player_attack_ticks_remaining: 7,
                monster_attack_ticks_remaining: 3,
                spawn_ticks_remaining: None,
            },
            progress_ticks: 17,
            total_ticks: 24,
        });
        let record = activity.to_record().unwrap();
        assert_eq!(record["context"]["type"], "sequence");
        assert_eq!(ActivityState::from_record(record).unwrap(), activity);
    }

    #[test]
    fn test_unknown_type_names_the_type() {
        let err = ActivityState::from_record(json!({ "type": "fletching" })).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("fletching"), "{}", message);
        assert!(message.contains("gathering"), "{}", message);
    }

    #[test]
    fn test_unknown_context_type_fails_whole_record() {
        let record = json!({
            "type": "combat",
            "context": { "type": "raid", "monster_id": "cow" },
            "progress": {
                "monster_hp": 10,
                "player_attack_ticks_remaining": 1,
                "monster_attack_ticks_remaining": 1
            },
            "progress_ticks": 0,
            "total_ticks": 24
        });
        let err = ActivityState::from_record(record).unwrap_err();
        assert!(err.to_string().contains("raid"), "{}", err);
    }

    #[test]
    fn test_missing_type() {
        let err = ActivityState::from_record(json!({ "action_id": "x" })).unwrap_err();
        assert!(matches!(err, ActivityError::MissingType { .. }));
    }

    #[test]
    fn test_not_an_object() {
        let err = ActivityState::from_record(json!([1, 2])).unwrap_err();
        assert!(matches!(err, ActivityError::NotAnObject { found: "an array", .. }));
    }

    #[test]
    fn test_obstacle_index_out_of_range_rejected() {
        let record = json!({
            "type": "obstacle_course",
            "obstacle_ids": ["cargo_net"],
            "current_obstacle_index": 1,
            "progress_ticks": 0,
            "total_ticks": 50
        });
        assert!(matches!(
            ActivityState::from_record(record),
            Err(ActivityError::Invalid { kind: "obstacle_course", .. })
        ));
    }

    #[test]
    fn test_maybe_from_record_absent() {
        assert_eq!(ActivityState::maybe_from_record(None).unwrap(), None);
        assert_eq!(ActivityState::maybe_from_record(Some(Value::Null)).unwrap(), None);
    }

    #[test]
    fn test_optional_recipe_defaults_to_none() {
        let record = json!({
            "type": "gathering",
            "action_id": "bronze_bar",
            "progress_ticks": 3,
            "total_ticks": 30
        });
        match ActivityState::from_record(record).unwrap() {
            ActivityState::Gathering(g) => assert_eq!(g.selected_recipe_index, None),
            other => panic!("expected gathering, got {:?}", other),
        }
    }
}
