use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration as StdDuration, Instant};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value as JsonValue};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{AiErrorCode, AppError, AppResult};
use crate::models::ai_types::{AiPlanCandidate, AiProviderMetadata, PlanProvider};
use crate::models::plan::PlanGenerationInput;
use crate::services::prompt_templates::build_plan_request;
use crate::utils::redact::{mask_api_key, redact_secrets, redact_sensitive_data};

pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_MODEL: &str = "OPENAI_MODEL";
pub const ENV_TIMEOUT_SECS: &str = "AUTOPILOT_AI_TIMEOUT_SECS";

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_HTTP_TIMEOUT: StdDuration = StdDuration::from_secs(30);

const API_KEY_PREFIX: &str = "sk-";
const MIN_API_KEY_LEN: usize = 21;

#[derive(Debug, Clone)]
pub struct AiServiceConfig {
    pub api_key: Option<String>,
    pub api_base_url: String,
    pub model: String,
    pub http_timeout: StdDuration,
}

impl Default for AiServiceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            http_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

impl AiServiceConfig {
    pub fn from_env() -> Self {
        let api_key = std::env::var(ENV_API_KEY).ok();
        let api_base_url = std::env::var(ENV_BASE_URL)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let model = std::env::var(ENV_MODEL)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let http_timeout = std::env::var(ENV_TIMEOUT_SECS)
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(StdDuration::from_secs)
            .unwrap_or(DEFAULT_HTTP_TIMEOUT);

        Self {
            api_key,
            api_base_url,
            model,
            http_timeout,
        }
    }

    /// The configured key, if it looks like a real credential: `sk-`
    /// prefixed and longer than 20 characters.
    pub fn usable_api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| key.starts_with(API_KEY_PREFIX) && key.len() >= MIN_API_KEY_LEN)
    }

    /// Builds the HTTP provider, or `None` when no usable credential exists.
    pub fn build_provider(&self) -> AppResult<Option<Arc<dyn PlanProvider>>> {
        match self.usable_api_key() {
            Some(api_key) => {
                debug!(
                    target: "app::ai",
                    key = %mask_api_key(api_key),
                    model = %self.model,
                    "AI provider configured"
                );
                let provider = OpenAiProvider::try_new(self, api_key.to_string())?;
                Ok(Some(Arc::new(provider)))
            }
            None => {
                if self.api_key.is_some() {
                    warn!(target: "app::ai", "configured API key is malformed, AI generation disabled");
                } else {
                    debug!(target: "app::ai", "no API key configured, AI generation disabled");
                }
                Ok(None)
            }
        }
    }
}

/// OpenAI-compatible chat-completions client.
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl OpenAiProvider {
    pub fn try_new(config: &AiServiceConfig, api_key: String) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .pool_max_idle_per_host(2)
            .pool_idle_timeout(Some(StdDuration::from_secs(90)))
            .build()
            .map_err(|err| AppError::other(format!("failed to build AI HTTP client: {err}")))?;

        let base_url = config.api_base_url.trim_end_matches('/').to_string();
        let endpoint = format!("{}/v1/chat/completions", base_url);

        Ok(Self {
            client,
            api_key,
            endpoint,
            model: config.model.clone(),
        })
    }

    async fn invoke_chat(&self, input: &PlanGenerationInput) -> AppResult<AiPlanCandidate> {
        let correlation_id = Uuid::new_v4().to_string();
        let request_body = build_plan_request(&self.model, input);
        let sanitized = redact_sensitive_data(&request_body);

        debug!(
            target: "app::ai::openai",
            correlation_id = %correlation_id,
            payload = %sanitized,
            "invoking chat completions"
        );

        let start = Instant::now();
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|err| Self::error_from_reqwest(err, &correlation_id))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| Self::error_from_reqwest(err, &correlation_id))?;
        let latency_ms = start.elapsed().as_millis();

        if !status.is_success() {
            warn!(
                target: "app::ai::openai",
                correlation_id = %correlation_id,
                status = status.as_u16(),
                latency_ms,
                body = %redact_secrets(&text),
                "chat completions returned non-success status"
            );
            return Err(Self::map_http_error(status, &text, &correlation_id));
        }

        debug!(
            target: "app::ai::openai",
            correlation_id = %correlation_id,
            latency_ms,
            body_len = text.len(),
            "chat completions responded"
        );

        if text.trim().is_empty() {
            return Err(AppError::ai_with_details(
                AiErrorCode::EmptyResponse,
                "AI provider returned an empty body",
                Some(&correlation_id),
                None,
            ));
        }

        let body: JsonValue = serde_json::from_str(&text).map_err(|err| {
            AppError::ai_with_details(
                AiErrorCode::InvalidResponse,
                "failed to decode AI provider response",
                Some(&correlation_id),
                Some(json!({ "reason": err.to_string() })),
            )
        })?;

        let content = body
            .pointer("/choices/0/message/content")
            .and_then(|value| value.as_str())
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| {
                AppError::ai_with_details(
                    AiErrorCode::EmptyResponse,
                    "AI provider response has no message content",
                    Some(&correlation_id),
                    Some(json!({ "reason": "missing_message_content" })),
                )
            })?;

        let content = Self::parse_content(content, &correlation_id)?;

        Ok(AiPlanCandidate {
            content,
            metadata: AiProviderMetadata {
                provider_id: Some("openai".to_string()),
                model: Some(self.model.clone()),
                latency_ms: Some(latency_ms),
                tokens_used: Self::extract_tokens(&body),
                correlation_id: Some(correlation_id),
            },
        })
    }

    fn parse_content(content: &str, correlation_id: &str) -> AppResult<JsonValue> {
        let trimmed = content.trim();
        let cleaned = if trimmed.starts_with("```") {
            let without_prefix = trimmed
                .trim_start_matches("```json")
                .trim_start_matches("```JSON")
                .trim_start_matches("```");
            without_prefix.trim_end_matches("```").trim()
        } else {
            trimmed
        };

        serde_json::from_str(cleaned).map_err(|err| {
            AppError::ai_with_details(
                AiErrorCode::InvalidResponse,
                format!("AI response content is not JSON: {err}"),
                Some(correlation_id),
                Some(json!({ "reason": "invalid_json" })),
            )
        })
    }

    fn extract_tokens(body: &JsonValue) -> Option<HashMap<String, u64>> {
        let usage = body.get("usage")?;
        let mut tokens = HashMap::new();
        for (field, key) in [
            ("prompt_tokens", "prompt"),
            ("completion_tokens", "completion"),
            ("total_tokens", "total"),
        ] {
            if let Some(value) = usage.get(field).and_then(|v| v.as_u64()) {
                tokens.insert(key.to_string(), value);
            }
        }

        if tokens.is_empty() {
            None
        } else {
            Some(tokens)
        }
    }

    fn map_http_error(status: StatusCode, body: &str, correlation_id: &str) -> AppError {
        // Quota exhaustion is reported as rate limiting whatever the status.
        if body.contains("insufficient_quota") {
            return AppError::ai_with_details(
                AiErrorCode::RateLimited,
                "AI provider quota exceeded",
                Some(correlation_id),
                Some(json!({ "status": status.as_u16() })),
            );
        }

        let (code, message) = match status {
            StatusCode::UNAUTHORIZED => (AiErrorCode::Unauthorized, "AI provider rejected the API key".to_string()),
            StatusCode::FORBIDDEN => (AiErrorCode::Forbidden, "AI provider denied access".to_string()),
            StatusCode::TOO_MANY_REQUESTS => (AiErrorCode::RateLimited, "AI provider rate limit exceeded".to_string()),
            StatusCode::REQUEST_TIMEOUT => (AiErrorCode::HttpTimeout, "AI provider request timed out".to_string()),
            StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND => (
                AiErrorCode::InvalidRequest,
                format!("AI provider rejected the request (status {})", status.as_u16()),
            ),
            status if status.is_server_error() => (
                AiErrorCode::ProviderUnavailable,
                format!("AI provider unavailable (status {})", status.as_u16()),
            ),
            status => (
                AiErrorCode::Unknown,
                format!("AI provider returned status {}", status.as_u16()),
            ),
        };

        AppError::ai_with_details(code, message, Some(correlation_id), None)
    }

    fn error_from_reqwest(err: reqwest::Error, correlation_id: &str) -> AppError {
        if err.is_timeout() {
            AppError::ai_with_details(
                AiErrorCode::HttpTimeout,
                "AI provider request timed out",
                Some(correlation_id),
                None,
            )
        } else if err.is_connect() {
            AppError::ai_with_details(
                AiErrorCode::ProviderUnavailable,
                "could not connect to AI provider",
                Some(correlation_id),
                None,
            )
        } else if let Some(status) = err.status() {
            Self::map_http_error(status, "", correlation_id)
        } else {
            AppError::ai_with_details(
                AiErrorCode::Unknown,
                format!("AI provider request failed: {}", redact_secrets(&err.to_string())),
                Some(correlation_id),
                None,
            )
        }
    }
}

#[async_trait]
impl PlanProvider for OpenAiProvider {
    async fn generate_plan(&self, input: &PlanGenerationInput) -> AppResult<AiPlanCandidate> {
        self.invoke_chat(input).await
    }
}

pub mod testing {
    use super::*;

    /// Exposes HTTP error mapping for integration tests.
    pub fn map_http_error(status: StatusCode, body: &str) -> AppError {
        OpenAiProvider::map_http_error(status, body, "test-correlation-id")
    }

    pub async fn generate_via_http(
        base_url: &str,
        timeout: StdDuration,
        input: &PlanGenerationInput,
    ) -> AppResult<AiPlanCandidate> {
        let config = AiServiceConfig {
            api_key: Some("sk-test-key-0123456789abcdef".to_string()),
            api_base_url: base_url.trim_end_matches('/').to_string(),
            model: DEFAULT_MODEL.to_string(),
            http_timeout: timeout,
        };
        let provider = OpenAiProvider::try_new(&config, "sk-test-key-0123456789abcdef".to_string())?;
        provider.generate_plan(input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key(key: Option<&str>) -> AiServiceConfig {
        AiServiceConfig {
            api_key: key.map(str::to_string),
            ..AiServiceConfig::default()
        }
    }

    #[test]
    fn usable_api_key_requires_prefix_and_length() {
        assert_eq!(config_with_key(None).usable_api_key(), None);
        assert_eq!(config_with_key(Some("   ")).usable_api_key(), None);
        assert_eq!(config_with_key(Some("sk-short")).usable_api_key(), None);
        assert_eq!(
            config_with_key(Some("pk-0123456789abcdefghijkl")).usable_api_key(),
            None
        );
        assert_eq!(
            config_with_key(Some(" sk-0123456789abcdefghij ")).usable_api_key(),
            Some("sk-0123456789abcdefghij")
        );
    }

    #[test]
    fn build_provider_skips_malformed_keys() {
        let provider = config_with_key(Some("demo")).build_provider().expect("config ok");
        assert!(provider.is_none());

        let provider = config_with_key(Some("sk-0123456789abcdefghij"))
            .build_provider()
            .expect("config ok");
        assert!(provider.is_some());
    }

    #[test]
    fn parse_content_strips_code_fences() {
        let value = OpenAiProvider::parse_content("```json\n{\"a\": 1}\n```", "cid").expect("json");
        assert_eq!(value, json!({"a": 1}));

        let error = OpenAiProvider::parse_content("not json", "cid").unwrap_err();
        assert_eq!(error.ai_code(), Some(AiErrorCode::InvalidResponse));
    }

    #[test]
    fn extract_tokens_reads_usage_block() {
        let tokens = OpenAiProvider::extract_tokens(&json!({
            "usage": {"prompt_tokens": 3, "completion_tokens": 4, "total_tokens": 7}
        }))
        .expect("tokens");
        assert_eq!(tokens.get("total"), Some(&7));
        assert!(OpenAiProvider::extract_tokens(&json!({})).is_none());
    }
}
