use std::fmt;

use rusqlite::ErrorCode;
use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::{error, warn};

pub type AppResult<T> = Result<T, AppError>;

/// Failure classes reported by an AI provider call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiErrorCode {
    Unauthorized,
    Forbidden,
    HttpTimeout,
    RateLimited,
    EmptyResponse,
    InvalidResponse,
    InvalidRequest,
    ProviderUnavailable,
    Unknown,
}

impl AiErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            AiErrorCode::Unauthorized => "UNAUTHORIZED",
            AiErrorCode::Forbidden => "FORBIDDEN",
            AiErrorCode::HttpTimeout => "HTTP_TIMEOUT",
            AiErrorCode::RateLimited => "RATE_LIMITED",
            AiErrorCode::EmptyResponse => "EMPTY_RESPONSE",
            AiErrorCode::InvalidResponse => "INVALID_RESPONSE",
            AiErrorCode::InvalidRequest => "INVALID_REQUEST",
            AiErrorCode::ProviderUnavailable => "PROVIDER_UNAVAILABLE",
            AiErrorCode::Unknown => "UNKNOWN_AI_ERROR",
        }
    }
}

impl fmt::Display for AiErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("plan store error: {message}")]
    Database { message: String },

    #[error("record not found")]
    NotFound,

    #[error("record conflict: {message}")]
    Conflict { message: String },

    #[error("invalid input: {message}")]
    Validation {
        message: String,
        details: Option<JsonValue>,
    },

    #[error("{message}")]
    Ai {
        code: AiErrorCode,
        message: String,
        correlation_id: Option<String>,
        details: Option<JsonValue>,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        let message = message.into();
        warn!(target: "app::validation", %message, "invalid input");
        AppError::Validation {
            message,
            details: None,
        }
    }

    pub fn validation_with_details(message: impl Into<String>, details: JsonValue) -> Self {
        let message = message.into();
        warn!(target: "app::validation", %message, %details, "invalid input");
        AppError::Validation {
            message,
            details: Some(details),
        }
    }

    pub fn ai(code: AiErrorCode, message: impl Into<String>) -> Self {
        Self::ai_with_details(code, message, None, None)
    }

    /// Provider failure tagged with the request's correlation id, when one
    /// was issued.
    pub fn ai_with_details(
        code: AiErrorCode,
        message: impl Into<String>,
        correlation_id: Option<&str>,
        details: Option<JsonValue>,
    ) -> Self {
        let message = message.into();
        warn!(
            target: "app::ai::error",
            %code,
            correlation_id = correlation_id.unwrap_or("-"),
            details = ?details,
            %message
        );

        AppError::Ai {
            code,
            message,
            correlation_id: correlation_id.map(str::to_string),
            details,
        }
    }

    pub fn ai_code(&self) -> Option<AiErrorCode> {
        match self {
            AppError::Ai { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn ai_correlation_id(&self) -> Option<&str> {
        match self {
            AppError::Ai { correlation_id, .. } => correlation_id.as_deref(),
            _ => None,
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        let message = message.into();
        error!(target: "app::other", %message, "unexpected error");
        AppError::Other(message)
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::QueryReturnedNoRows => AppError::NotFound,
            rusqlite::Error::SqliteFailure(failure, detail)
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                let message = detail.unwrap_or_else(|| "constraint violated".to_string());
                warn!(target: "app::db", %message, "constraint violation");
                AppError::Conflict { message }
            }
            other => {
                error!(target: "app::db", error = ?other, "sqlite error");
                AppError::Database {
                    message: other.to_string(),
                }
            }
        }
    }
}
