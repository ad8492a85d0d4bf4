use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A plan persisted by its owner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedPlanRecord {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub mood: String,
    pub time_available: String,
    pub energy_level: String,
    pub priority_tasks: Vec<String>,
    #[serde(default)]
    pub personal_goal: Option<String>,
    pub plan_data: JsonValue,
    pub created_at: String,
}

/// Body of a save request; the owner is supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedPlanInsert {
    pub mood: String,
    pub time_available: String,
    pub energy_level: String,
    pub priority_tasks: Vec<String>,
    #[serde(default)]
    pub personal_goal: Option<String>,
    pub plan_data: JsonValue,
}
