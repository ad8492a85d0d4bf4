use jsonschema::JSONSchema;
use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use thiserror::Error;
use tracing::warn;

use crate::models::plan::{PlanOutput, TimelineEntry};
use crate::services::schedule_utils;

/// Duration assumed for entries that omit one.
pub const DEFAULT_ENTRY_MINUTES: u32 = 30;

/// Structural reasons a candidate plan is rejected.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationFailure {
    #[error("plan schema violation: {}", errors.join("; "))]
    Schema { errors: Vec<String> },

    #[error("field `{field}` must not be empty")]
    EmptyField { field: &'static str },

    #[error("timeline[{index}].{field} is not a HH:MM time: {value:?}")]
    MalformedTime {
        index: usize,
        field: &'static str,
        value: String,
    },

    #[error("timeline[{index}].duration must be a positive number of minutes, got {value}")]
    InvalidDuration { index: usize, value: f64 },

    #[error("timeline[{index}].task must not be empty")]
    EmptyTask { index: usize },

    #[error("plan could not be decoded: {0}")]
    Decode(String),
}

static PLAN_SCHEMA: Lazy<Result<JSONSchema, String>> = Lazy::new(|| {
    let schema = json!({
        "type": "object",
        "required": ["greeting", "timeline", "motivationalTip"],
        "properties": {
            "greeting": { "type": "string" },
            "motivationalTip": { "type": "string" },
            "timeline": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["startTime", "endTime", "task"],
                    "properties": {
                        "startTime": { "type": "string" },
                        "endTime": { "type": "string" },
                        "task": { "type": "string" },
                        "description": { "type": "string" },
                        "duration": { "type": "number" },
                        "completed": { "type": "boolean" }
                    }
                }
            }
        }
    });
    JSONSchema::compile(&schema).map_err(|err| err.to_string())
});

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CandidatePlan {
    greeting: String,
    timeline: Vec<CandidateEntry>,
    motivational_tip: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CandidateEntry {
    start_time: String,
    end_time: String,
    task: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
}

/// Checks a candidate plan's shape and converts it into a [`PlanOutput`].
///
/// Unknown fields are ignored. Missing `duration` becomes
/// [`DEFAULT_ENTRY_MINUTES`], fractional durations are rounded to whole
/// minutes, and `completed` always starts out false since only the client
/// marks entries done. Only structure is checked here; timeline contiguity
/// is not enforced on external candidates.
pub fn validate(candidate: &JsonValue) -> Result<PlanOutput, ValidationFailure> {
    let schema = PLAN_SCHEMA
        .as_ref()
        .map_err(|message| ValidationFailure::Schema {
            errors: vec![message.clone()],
        })?;

    if let Err(violations) = schema.validate(candidate) {
        let errors: Vec<String> = violations
            .map(|violation| {
                let path = violation.instance_path.to_string();
                let path = if path.is_empty() {
                    "root".to_string()
                } else {
                    path
                };
                format!("{path}: {violation}")
            })
            .collect();
        warn!(target: "app::validation", errors = ?errors, "candidate plan failed schema");
        return Err(ValidationFailure::Schema { errors });
    }

    let plan: CandidatePlan = serde_json::from_value(candidate.clone())
        .map_err(|err| ValidationFailure::Decode(err.to_string()))?;

    if plan.greeting.trim().is_empty() {
        return Err(ValidationFailure::EmptyField { field: "greeting" });
    }
    if plan.motivational_tip.trim().is_empty() {
        return Err(ValidationFailure::EmptyField {
            field: "motivationalTip",
        });
    }

    let timeline = plan
        .timeline
        .into_iter()
        .enumerate()
        .map(|(index, entry)| validate_entry(index, entry))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PlanOutput {
        greeting: plan.greeting,
        timeline,
        motivational_tip: plan.motivational_tip,
    })
}

fn validate_entry(index: usize, entry: CandidateEntry) -> Result<TimelineEntry, ValidationFailure> {
    for (field, value) in [("startTime", &entry.start_time), ("endTime", &entry.end_time)] {
        if schedule_utils::parse_clock(value).is_err() {
            return Err(ValidationFailure::MalformedTime {
                index,
                field,
                value: value.clone(),
            });
        }
    }

    if entry.task.trim().is_empty() {
        return Err(ValidationFailure::EmptyTask { index });
    }

    let duration = match entry.duration {
        None => DEFAULT_ENTRY_MINUTES,
        Some(value) if value.is_finite() && value > 0.0 && value <= f64::from(u32::MAX) => {
            (value.round() as u32).max(1)
        }
        Some(value) => return Err(ValidationFailure::InvalidDuration { index, value }),
    };

    Ok(TimelineEntry {
        start_time: entry.start_time,
        end_time: entry.end_time,
        task: entry.task,
        description: entry.description,
        duration,
        completed: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(timeline: JsonValue) -> JsonValue {
        json!({
            "greeting": "Good morning!",
            "timeline": timeline,
            "motivationalTip": "Keep going."
        })
    }

    #[test]
    fn accepts_well_formed_plan_and_fills_defaults() {
        let plan = validate(&candidate(json!([
            {"startTime": "09:00", "endTime": "09:30", "task": "Inbox", "extra": 1},
            {"startTime": "09:30", "endTime": "10:15", "task": "Write", "duration": 44.6,
             "description": "Draft", "completed": true}
        ])))
        .expect("valid plan");

        assert_eq!(plan.timeline.len(), 2);
        assert_eq!(plan.timeline[0].duration, DEFAULT_ENTRY_MINUTES);
        assert_eq!(plan.timeline[0].description, None);
        assert_eq!(plan.timeline[1].duration, 45);
        assert!(!plan.timeline[1].completed);
    }

    #[test]
    fn empty_timeline_is_structurally_valid() {
        let plan = validate(&candidate(json!([]))).expect("valid plan");
        assert!(plan.timeline.is_empty());
    }

    #[test]
    fn rejects_missing_required_fields() {
        let failure = validate(&json!({"greeting": "Hi", "timeline": []})).unwrap_err();
        assert!(matches!(failure, ValidationFailure::Schema { .. }));

        let failure = validate(&json!("not an object")).unwrap_err();
        assert!(matches!(failure, ValidationFailure::Schema { .. }));

        let failure = validate(&candidate(json!([{"startTime": "09:00", "task": "x"}])))
            .unwrap_err();
        assert!(matches!(failure, ValidationFailure::Schema { .. }));
    }

    #[test]
    fn rejects_empty_strings() {
        let failure = validate(&json!({
            "greeting": " ",
            "timeline": [],
            "motivationalTip": "tip"
        }))
        .unwrap_err();
        assert_eq!(failure, ValidationFailure::EmptyField { field: "greeting" });

        let failure = validate(&candidate(json!([
            {"startTime": "09:00", "endTime": "09:30", "task": ""}
        ])))
        .unwrap_err();
        assert_eq!(failure, ValidationFailure::EmptyTask { index: 0 });
    }

    #[test]
    fn rejects_malformed_times() {
        let failure = validate(&candidate(json!([
            {"startTime": "9am", "endTime": "09:30", "task": "Inbox"}
        ])))
        .unwrap_err();
        assert_eq!(
            failure,
            ValidationFailure::MalformedTime {
                index: 0,
                field: "startTime",
                value: "9am".into()
            }
        );
    }

    #[test]
    fn rejects_non_positive_duration() {
        let failure = validate(&candidate(json!([
            {"startTime": "09:00", "endTime": "09:30", "task": "Inbox", "duration": 0}
        ])))
        .unwrap_err();
        assert!(matches!(
            failure,
            ValidationFailure::InvalidDuration { index: 0, .. }
        ));
    }
}
