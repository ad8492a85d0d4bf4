use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize, Serializer};

/// Request body for plan generation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanGenerationInput {
    pub mood: String,
    pub time_available: String,
    pub energy_level: String,
    pub priority_tasks: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_goal: Option<String>,
}

impl PlanGenerationInput {
    pub fn energy(&self) -> EnergyLevel {
        EnergyLevel::parse(&self.energy_level)
    }

    pub fn mood(&self) -> Mood {
        Mood::parse(&self.mood)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mood {
    Motivated,
    Tired,
    Overwhelmed,
    Calm,
}

impl Mood {
    /// Unrecognized moods fall back to `Motivated`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "tired" => Mood::Tired,
            "overwhelmed" => Mood::Overwhelmed,
            "calm" => Mood::Calm,
            _ => Mood::Motivated,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Motivated => "motivated",
            Mood::Tired => "tired",
            Mood::Overwhelmed => "overwhelmed",
            Mood::Calm => "calm",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnergyLevel {
    Low,
    Medium,
    High,
}

impl EnergyLevel {
    /// Unrecognized tokens are treated as `Medium`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => EnergyLevel::Low,
            "high" => EnergyLevel::High,
            _ => EnergyLevel::Medium,
        }
    }

    /// Work block length for this energy level, in minutes.
    pub fn base_task_minutes(self) -> u32 {
        match self {
            EnergyLevel::Low => 30,
            EnergyLevel::Medium => 45,
            EnergyLevel::High => 60,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EnergyLevel::Low => "Low",
            EnergyLevel::Medium => "Medium",
            EnergyLevel::High => "High",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub start_time: String,
    pub end_time: String,
    pub task: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub duration: u32,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlanOutput {
    pub greeting: String,
    pub timeline: Vec<TimelineEntry>,
    pub motivational_tip: String,
}

impl PlanOutput {
    pub fn total_minutes(&self) -> u32 {
        self.timeline.iter().map(|entry| entry.duration).sum()
    }
}

/// Why the deterministic builder produced the plan instead of the AI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FallbackReason {
    NoCredentials,
    RateLimited,
    InvalidCredentials,
    Timeout,
    MalformedResponse,
    UnknownError,
    SuspiciousLatency,
}

impl FallbackReason {
    pub fn as_str(self) -> &'static str {
        match self {
            FallbackReason::NoCredentials => "no-credentials",
            FallbackReason::RateLimited => "rate-limited",
            FallbackReason::InvalidCredentials => "invalid-credentials",
            FallbackReason::Timeout => "timeout",
            FallbackReason::MalformedResponse => "malformed-response",
            FallbackReason::UnknownError => "unknown-error",
            FallbackReason::SuspiciousLatency => "suspicious-latency",
        }
    }
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FallbackReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Provenance of a generated plan. Not persisted.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationMeta {
    #[serde(rename = "usedAI")]
    pub used_ai: bool,
    #[serde(serialize_with = "serialize_millis")]
    pub response_time: Duration,
    #[serde(serialize_with = "serialize_reason")]
    pub fallback_reason: Option<FallbackReason>,
}

impl GenerationMeta {
    pub fn ai(response_time: Duration) -> Self {
        Self {
            used_ai: true,
            response_time,
            fallback_reason: None,
        }
    }

    pub fn fallback(reason: FallbackReason, response_time: Duration) -> Self {
        Self {
            used_ai: false,
            response_time,
            fallback_reason: Some(reason),
        }
    }
}

fn serialize_millis<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{}ms", value.as_millis()))
}

fn serialize_reason<S: Serializer>(
    value: &Option<FallbackReason>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value.map(FallbackReason::as_str).unwrap_or(""))
}

/// Result of one generation request: the chosen plan and how it was produced.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlanGenerationOutcome {
    pub plan: PlanOutput,
    pub meta: GenerationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn energy_level_lookup_is_fixed() {
        assert_eq!(EnergyLevel::parse("Low").base_task_minutes(), 30);
        assert_eq!(EnergyLevel::parse("Medium").base_task_minutes(), 45);
        assert_eq!(EnergyLevel::parse("High").base_task_minutes(), 60);
        assert_eq!(EnergyLevel::parse("sleepy"), EnergyLevel::Medium);
    }

    #[test]
    fn unknown_mood_defaults_to_motivated() {
        assert_eq!(Mood::parse("ecstatic"), Mood::Motivated);
        assert_eq!(Mood::parse(" Tired "), Mood::Tired);
    }

    #[test]
    fn input_normalizes_mood_and_energy() {
        let input = PlanGenerationInput {
            mood: " OVERWHELMED ".into(),
            time_available: "2".into(),
            energy_level: "high".into(),
            priority_tasks: Vec::new(),
            personal_goal: None,
        };
        assert_eq!(input.mood().as_str(), "overwhelmed");
        assert_eq!(input.energy().as_str(), "High");
    }

    #[test]
    fn meta_serializes_wire_shape() {
        let ai = GenerationMeta::ai(Duration::from_millis(1234));
        assert_eq!(
            serde_json::to_value(&ai).expect("serialize"),
            json!({"usedAI": true, "responseTime": "1234ms", "fallbackReason": ""})
        );

        let fallback =
            GenerationMeta::fallback(FallbackReason::NoCredentials, Duration::from_millis(3));
        assert_eq!(
            serde_json::to_value(&fallback).expect("serialize"),
            json!({"usedAI": false, "responseTime": "3ms", "fallbackReason": "no-credentials"})
        );
    }

    #[test]
    fn input_personal_goal_is_optional() {
        let input: PlanGenerationInput = serde_json::from_value(json!({
            "mood": "calm",
            "timeAvailable": "4",
            "energyLevel": "High",
            "priorityTasks": ["Read", "Read"]
        }))
        .expect("valid input");

        assert_eq!(input.personal_goal, None);
        assert_eq!(input.priority_tasks.len(), 2);
    }
}
