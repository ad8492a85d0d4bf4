use std::convert::TryFrom;

use rusqlite::{named_params, Connection, OptionalExtension, Row};
use serde_json::Value as JsonValue;

use crate::error::AppResult;
use crate::models::saved_plan::{SavedPlanInsert, SavedPlanRecord};

#[derive(Debug, Clone)]
pub struct PlanRow {
    pub id: i64,
    pub user_id: Option<i64>,
    pub mood: String,
    pub time_available: String,
    pub energy_level: String,
    pub priority_tasks: String,
    pub personal_goal: Option<String>,
    pub plan_data: String,
    pub created_at: String,
}

impl PlanRow {
    pub fn into_record(self) -> AppResult<SavedPlanRecord> {
        Ok(SavedPlanRecord {
            id: self.id,
            user_id: self.user_id,
            mood: self.mood,
            time_available: self.time_available,
            energy_level: self.energy_level,
            priority_tasks: deserialize_vec(&self.priority_tasks)?,
            personal_goal: self.personal_goal,
            plan_data: deserialize_required_json(&self.plan_data)?,
            created_at: self.created_at,
        })
    }
}

impl TryFrom<&Row<'_>> for PlanRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            mood: row.get("mood")?,
            time_available: row.get("time_available")?,
            energy_level: row.get("energy_level")?,
            priority_tasks: row.get("priority_tasks")?,
            personal_goal: row.get("personal_goal")?,
            plan_data: row.get("plan_data")?,
            created_at: row.get("created_at")?,
        })
    }
}

const SELECT_COLUMNS: &str = "SELECT id, user_id, mood, time_available, energy_level, \
     priority_tasks, personal_goal, plan_data, created_at FROM plans";

pub struct PlanRepository;

impl PlanRepository {
    pub fn insert(
        conn: &Connection,
        user_id: Option<i64>,
        plan: &SavedPlanInsert,
        created_at: &str,
    ) -> AppResult<SavedPlanRecord> {
        conn.execute(
            r#"
                INSERT INTO plans (
                    user_id, mood, time_available, energy_level,
                    priority_tasks, personal_goal, plan_data, created_at
                ) VALUES (
                    :user_id, :mood, :time_available, :energy_level,
                    :priority_tasks, :personal_goal, :plan_data, :created_at
                )
            "#,
            named_params! {
                ":user_id": user_id,
                ":mood": plan.mood,
                ":time_available": plan.time_available,
                ":energy_level": plan.energy_level,
                ":priority_tasks": serialize_vec(&plan.priority_tasks)?,
                ":personal_goal": plan.personal_goal,
                ":plan_data": serialize_required_json(&plan.plan_data)?,
                ":created_at": created_at,
            },
        )?;

        let id = conn.last_insert_rowid();
        Self::find_by_id(conn, id)?.ok_or_else(|| crate::error::AppError::NotFound)
    }

    pub fn find_by_id(conn: &Connection, id: i64) -> AppResult<Option<SavedPlanRecord>> {
        let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1"))?;
        let row = stmt
            .query_row([id], |row| PlanRow::try_from(row))
            .optional()?;

        row.map(PlanRow::into_record).transpose()
    }

    /// Plans owned by `user_id`, newest first.
    pub fn list_by_owner(conn: &Connection, user_id: i64) -> AppResult<Vec<SavedPlanRecord>> {
        let mut stmt = conn.prepare(&format!(
            "{SELECT_COLUMNS} WHERE user_id = ?1 ORDER BY created_at DESC, id DESC"
        ))?;
        let rows = stmt.query_map([user_id], |row| PlanRow::try_from(row))?;

        let mut plans = Vec::new();
        for row in rows {
            plans.push(row?.into_record()?);
        }
        Ok(plans)
    }
}

fn serialize_vec(values: &[String]) -> AppResult<String> {
    Ok(serde_json::to_string(values)?)
}

fn deserialize_vec(raw: &str) -> AppResult<Vec<String>> {
    if raw.is_empty() {
        Ok(Vec::new())
    } else {
        Ok(serde_json::from_str(raw)?)
    }
}

fn serialize_required_json(value: &JsonValue) -> AppResult<String> {
    Ok(serde_json::to_string(value)?)
}

fn deserialize_required_json(raw: &str) -> AppResult<JsonValue> {
    Ok(serde_json::from_str(raw)?)
}
