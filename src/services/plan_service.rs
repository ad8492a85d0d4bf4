use chrono::{SecondsFormat, Utc};
use tracing::{debug, info};

use crate::db::repositories::plan_repository::PlanRepository;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::saved_plan::{SavedPlanInsert, SavedPlanRecord};

/// Persists generated plans for their owners.
#[derive(Clone)]
pub struct PlanService {
    db: DbPool,
}

impl PlanService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub fn save(&self, owner_id: i64, plan: SavedPlanInsert) -> AppResult<SavedPlanRecord> {
        if plan.mood.trim().is_empty() || plan.energy_level.trim().is_empty() {
            return Err(AppError::validation("mood and energy level are required"));
        }

        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let record = self.db.with_connection(|conn| {
            PlanRepository::insert(conn, Some(owner_id), &plan, &created_at)
        })?;

        info!(target: "app::plans", plan_id = record.id, owner_id, "plan saved");
        Ok(record)
    }

    pub fn list_by_owner(&self, owner_id: i64) -> AppResult<Vec<SavedPlanRecord>> {
        let plans = self
            .db
            .with_connection(|conn| PlanRepository::list_by_owner(conn, owner_id))?;
        debug!(target: "app::plans", owner_id, count = plans.len(), "plans listed");
        Ok(plans)
    }
}
