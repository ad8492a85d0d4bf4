pub mod planning;
pub mod user;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value as JsonValue;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::db::DbPool;
use crate::error::AppError;
use crate::services::plan_dispatcher::PlanDispatcher;
use crate::services::plan_service::PlanService;
use crate::services::user_service::UserService;

#[derive(Clone)]
pub struct AppState {
    dispatcher: Arc<PlanDispatcher>,
    plan_service: Arc<PlanService>,
    user_service: Arc<UserService>,
}

impl AppState {
    pub fn new(db_pool: DbPool, dispatcher: PlanDispatcher) -> Self {
        let plan_service = Arc::new(PlanService::new(db_pool.clone()));
        let user_service = Arc::new(UserService::new(db_pool));

        Self {
            dispatcher: Arc::new(dispatcher),
            plan_service,
            user_service,
        }
    }

    pub fn dispatcher(&self) -> Arc<PlanDispatcher> {
        Arc::clone(&self.dispatcher)
    }

    pub fn plans(&self) -> Arc<PlanService> {
        Arc::clone(&self.plan_service)
    }

    pub fn users(&self) -> Arc<UserService> {
        Arc::clone(&self.user_service)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/plans/generate", post(planning::plans_generate))
        .route(
            "/api/plans",
            post(planning::plans_save).get(planning::plans_list),
        )
        .route("/api/me", get(user::me))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub data: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        data: "OK",
    })
}

pub type CommandResult<T> = Result<T, CommandError>;

/// Failure body: `{ success: false, code, message, errors? }`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
    #[serde(skip)]
    pub status: StatusCode,
    pub success: bool,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<JsonValue>,
}

impl CommandError {
    pub fn new(
        status: StatusCode,
        code: impl Into<String>,
        message: impl Into<String>,
        errors: Option<JsonValue>,
    ) -> Self {
        Self {
            status,
            success: false,
            code: code.into(),
            message: message.into(),
            errors,
        }
    }

    pub fn invalid_input(errors: JsonValue) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "Invalid input data",
            Some(errors),
        )
    }

    /// Converts a collaborator failure, replacing internal detail on server
    /// errors with `server_message`.
    pub fn from_app(error: AppError, server_message: &str) -> Self {
        match error {
            AppError::Validation {
                message, details, ..
            } => {
                let errors = match details {
                    Some(JsonValue::Array(items)) => JsonValue::Array(items),
                    Some(other) => JsonValue::Array(vec![other]),
                    None => JsonValue::Array(vec![serde_json::json!({ "message": message })]),
                };
                Self::invalid_input(errors)
            }
            AppError::NotFound => {
                Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found", None)
            }
            AppError::Conflict { message } => {
                warn!(target: "app::command", %message, "conflict in command");
                Self::new(StatusCode::CONFLICT, "CONFLICT", message, None)
            }
            AppError::Ai { code, message, .. } => {
                error!(target: "app::command", %code, %message, "unexpected AI error in command");
                Self::new(StatusCode::BAD_GATEWAY, code.as_str(), server_message, None)
            }
            other => {
                error!(target: "app::command", error = %other, "command failed");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    server_message,
                    None,
                )
            }
        }
    }
}

impl From<AppError> for CommandError {
    fn from(error: AppError) -> Self {
        Self::from_app(error, "Internal server error")
    }
}

impl IntoResponse for CommandError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Runs blocking store work off the async executor.
pub(crate) async fn run_blocking<F, T>(task: F, server_message: &'static str) -> CommandResult<T>
where
    F: FnOnce() -> crate::error::AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(task).await {
        Ok(result) => result.map_err(|error| CommandError::from_app(error, server_message)),
        Err(join_error) => {
            error!(target: "app::command", error = %join_error, "blocking task panicked");
            Err(CommandError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                server_message,
                None,
            ))
        }
    }
}
