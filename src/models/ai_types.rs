use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::AppResult;
use crate::models::plan::PlanGenerationInput;

/// Metadata describing the provider call that produced a candidate.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AiProviderMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u128>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<HashMap<String, u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

/// Unvalidated plan JSON returned by a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct AiPlanCandidate {
    pub content: JsonValue,
    pub metadata: AiProviderMetadata,
}

/// A generative backend able to draft a plan. Implementations make at most
/// one outbound request per call and never retry.
#[async_trait]
pub trait PlanProvider: Send + Sync {
    async fn generate_plan(&self, input: &PlanGenerationInput) -> AppResult<AiPlanCandidate>;
}
