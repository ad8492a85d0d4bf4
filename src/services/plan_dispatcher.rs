//! Chooses between AI-generated and deterministically built plans.
//!
//! Each request walks `Idle -> AwaitingAi -> {Validating, Failed} -> Resolved`.
//! All state lives on the stack of [`PlanDispatcher::generate`], so one
//! dispatcher can serve concurrent requests.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{Local, Timelike};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::error::{AiErrorCode, AppError, AppResult};
use crate::models::ai_types::PlanProvider;
use crate::models::plan::{
    FallbackReason, GenerationMeta, PlanGenerationInput, PlanGenerationOutcome, PlanOutput,
};
use crate::services::ai_service::AiServiceConfig;
use crate::services::greeting_service::{self, DEFAULT_NAME};
use crate::services::response_validator;
use crate::services::schedule_builder::ScheduleBuilder;
use crate::services::time_budget::TimeBudget;

/// AI answers faster than this are assumed not to have made a real round
/// trip and are replaced by the built plan. This is a heuristic: a genuinely
/// fast provider will be misreported as a fallback.
pub const SUSPICIOUS_LATENCY_THRESHOLD: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatcherConfig {
    pub request_timeout: Duration,
    pub suspicious_latency: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            suspicious_latency: SUSPICIOUS_LATENCY_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Idle,
    AwaitingAi,
    Validating,
    Failed(FallbackReason),
    Resolved { used_ai: bool },
}

#[derive(Clone)]
pub struct PlanDispatcher {
    provider: Option<Arc<dyn PlanProvider>>,
    builder: ScheduleBuilder,
    config: DispatcherConfig,
}

impl PlanDispatcher {
    pub fn new(provider: Option<Arc<dyn PlanProvider>>, config: DispatcherConfig) -> Self {
        Self {
            provider,
            builder: ScheduleBuilder::new(),
            config,
        }
    }

    pub fn from_config(ai_config: &AiServiceConfig, config: DispatcherConfig) -> AppResult<Self> {
        Ok(Self::new(ai_config.build_provider()?, config))
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Produces a plan for `input`. Never fails: every AI problem resolves
    /// to the built plan with the classified reason in the metadata.
    pub async fn generate(&self, input: &PlanGenerationInput) -> PlanGenerationOutcome {
        let start = Instant::now();
        let mut state = DispatchState::Idle;

        let attempt = self.attempt_ai(input, &mut state).await;
        let elapsed = start.elapsed();

        let attempt = match attempt {
            Ok(plan) if elapsed < self.config.suspicious_latency => {
                warn!(
                    target: "app::dispatch",
                    elapsed_ms = elapsed.as_millis(),
                    threshold_ms = self.config.suspicious_latency.as_millis(),
                    "AI plan arrived implausibly fast, discarding it"
                );
                drop(plan);
                Err(FallbackReason::SuspiciousLatency)
            }
            other => other,
        };

        match attempt {
            Ok(plan) => {
                transition(&mut state, DispatchState::Resolved { used_ai: true });
                info!(
                    target: "app::dispatch",
                    elapsed_ms = elapsed.as_millis(),
                    entries = plan.timeline.len(),
                    "plan generated by AI"
                );
                PlanGenerationOutcome {
                    plan,
                    meta: GenerationMeta::ai(elapsed),
                }
            }
            Err(reason) => {
                if !matches!(state, DispatchState::Failed(_)) {
                    transition(&mut state, DispatchState::Failed(reason));
                }
                let plan = self.fallback_plan(input);
                let elapsed = start.elapsed();
                transition(&mut state, DispatchState::Resolved { used_ai: false });
                info!(
                    target: "app::dispatch",
                    reason = %reason,
                    elapsed_ms = elapsed.as_millis(),
                    entries = plan.timeline.len(),
                    "plan built without AI"
                );
                PlanGenerationOutcome {
                    plan,
                    meta: GenerationMeta::fallback(reason, elapsed),
                }
            }
        }
    }

    async fn attempt_ai(
        &self,
        input: &PlanGenerationInput,
        state: &mut DispatchState,
    ) -> Result<PlanOutput, FallbackReason> {
        let Some(provider) = self.provider.as_ref() else {
            transition(state, DispatchState::Failed(FallbackReason::NoCredentials));
            return Err(FallbackReason::NoCredentials);
        };

        transition(state, DispatchState::AwaitingAi);
        let call = provider.generate_plan(input);
        let candidate = match tokio::time::timeout(self.config.request_timeout, call).await {
            Err(_) => {
                warn!(
                    target: "app::dispatch",
                    timeout_ms = self.config.request_timeout.as_millis(),
                    "AI call exceeded timeout"
                );
                transition(state, DispatchState::Failed(FallbackReason::Timeout));
                return Err(FallbackReason::Timeout);
            }
            Ok(Err(error)) => {
                let reason = classify_failure(&error);
                warn!(
                    target: "app::dispatch",
                    error = %error,
                    reason = %reason,
                    correlation_id = error.ai_correlation_id().unwrap_or("-"),
                    "AI call failed"
                );
                transition(state, DispatchState::Failed(reason));
                return Err(reason);
            }
            Ok(Ok(candidate)) => candidate,
        };

        transition(state, DispatchState::Validating);
        response_validator::validate(&candidate.content).map_err(|failure| {
            warn!(
                target: "app::dispatch",
                failure = %failure,
                correlation_id = candidate.metadata.correlation_id.as_deref().unwrap_or("-"),
                "AI plan rejected by validator"
            );
            transition(state, DispatchState::Failed(FallbackReason::MalformedResponse));
            FallbackReason::MalformedResponse
        })
    }

    /// Deterministic plan using the current local hour and thread RNG for
    /// greeting and tip selection.
    pub fn fallback_plan(&self, input: &PlanGenerationInput) -> PlanOutput {
        self.fallback_plan_with(input, Local::now().hour(), &mut rand::thread_rng())
    }

    pub fn fallback_plan_with<R: Rng + ?Sized>(
        &self,
        input: &PlanGenerationInput,
        hour: u32,
        rng: &mut R,
    ) -> PlanOutput {
        let timeline = self.builder.build(
            &input.priority_tasks,
            input.energy(),
            TimeBudget::from_token(&input.time_available),
        );

        PlanOutput {
            greeting: greeting_service::greeting_with(&input.mood, DEFAULT_NAME, hour, rng),
            timeline,
            motivational_tip: greeting_service::tip_with(rng),
        }
    }
}

/// Maps a provider error onto the fallback taxonomy.
pub fn classify_failure(error: &AppError) -> FallbackReason {
    match error.ai_code() {
        Some(AiErrorCode::Unauthorized) | Some(AiErrorCode::Forbidden) => {
            FallbackReason::InvalidCredentials
        }
        Some(AiErrorCode::RateLimited) => FallbackReason::RateLimited,
        Some(AiErrorCode::HttpTimeout) => FallbackReason::Timeout,
        Some(AiErrorCode::EmptyResponse) | Some(AiErrorCode::InvalidResponse) => {
            FallbackReason::MalformedResponse
        }
        Some(AiErrorCode::InvalidRequest)
        | Some(AiErrorCode::ProviderUnavailable)
        | Some(AiErrorCode::Unknown)
        | None => FallbackReason::UnknownError,
    }
}

fn transition(state: &mut DispatchState, next: DispatchState) {
    debug!(target: "app::dispatch", from = ?*state, to = ?next, "state transition");
    *state = next;
}
