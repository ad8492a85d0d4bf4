use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use tracing::debug;

use crate::db::migrations::DEMO_USER_ID;
use crate::models::plan::{PlanGenerationInput, PlanGenerationOutcome};
use crate::models::saved_plan::{SavedPlanInsert, SavedPlanRecord};

use super::{run_blocking, AppState, CommandError, CommandResult};

#[derive(Debug, Serialize)]
pub struct GeneratePlanResponse {
    pub success: bool,
    #[serde(flatten)]
    pub outcome: PlanGenerationOutcome,
}

#[derive(Debug, Serialize)]
pub struct SavedPlanResponse {
    pub success: bool,
    pub plan: SavedPlanRecord,
}

#[derive(Debug, Serialize)]
pub struct PlanListResponse {
    pub success: bool,
    pub plans: Vec<SavedPlanRecord>,
}

/// `POST /api/plans/generate`. Always answers with a plan once the input
/// parses; AI problems only show up in `meta`.
pub async fn plans_generate(
    State(state): State<AppState>,
    body: Result<Json<JsonValue>, JsonRejection>,
) -> CommandResult<Json<GeneratePlanResponse>> {
    let input: PlanGenerationInput = decode_body(body)?;
    debug!(
        target: "app::command",
        mood = input.mood().as_str(),
        energy = input.energy().as_str(),
        time = %input.time_available,
        tasks = input.priority_tasks.len(),
        "generating plan"
    );

    let outcome = state.dispatcher().generate(&input).await;
    Ok(Json(GeneratePlanResponse {
        success: true,
        outcome,
    }))
}

/// `POST /api/plans`. Saves a plan for the demo user.
pub async fn plans_save(
    State(state): State<AppState>,
    body: Result<Json<JsonValue>, JsonRejection>,
) -> CommandResult<Json<SavedPlanResponse>> {
    let insert: SavedPlanInsert = decode_body(body)?;
    let plans = state.plans();
    let plan = run_blocking(
        move || plans.save(DEMO_USER_ID, insert),
        "Failed to save plan",
    )
    .await?;

    Ok(Json(SavedPlanResponse {
        success: true,
        plan,
    }))
}

/// `GET /api/plans`. Demo user's plans, newest first.
pub async fn plans_list(State(state): State<AppState>) -> CommandResult<Json<PlanListResponse>> {
    let plans = state.plans();
    let plans = run_blocking(
        move || plans.list_by_owner(DEMO_USER_ID),
        "Failed to fetch plans",
    )
    .await?;

    Ok(Json(PlanListResponse {
        success: true,
        plans,
    }))
}

fn decode_body<T: DeserializeOwned>(
    body: Result<Json<JsonValue>, JsonRejection>,
) -> CommandResult<T> {
    let Json(value) = body.map_err(|rejection| {
        CommandError::invalid_input(json!([{ "message": rejection.body_text() }]))
    })?;

    serde_json::from_value(value).map_err(|error| {
        CommandError::invalid_input(json!([{ "message": error.to_string() }]))
    })
}
