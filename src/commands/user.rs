use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::db::migrations::DEMO_USER_ID;
use crate::models::user::UserRecord;

use super::{run_blocking, AppState, CommandError, CommandResult};

#[derive(Debug, Serialize)]
pub struct CurrentUserResponse {
    pub success: bool,
    pub user: UserRecord,
}

/// `GET /api/me`. The password never leaves the store layer.
pub async fn me(State(state): State<AppState>) -> CommandResult<Json<CurrentUserResponse>> {
    let users = state.users();
    let user = run_blocking(move || users.get_by_id(DEMO_USER_ID), "Failed to fetch user")
        .await?
        .ok_or_else(|| {
            CommandError::new(StatusCode::NOT_FOUND, "NOT_FOUND", "User not found", None)
        })?;

    Ok(Json(CurrentUserResponse {
        success: true,
        user,
    }))
}
