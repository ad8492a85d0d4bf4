use std::path::PathBuf;
use std::time::Duration;

use crate::services::ai_service::AiServiceConfig;
use crate::services::plan_dispatcher::{DispatcherConfig, SUSPICIOUS_LATENCY_THRESHOLD};

pub const ENV_PORT: &str = "PORT";
pub const ENV_DB_PATH: &str = "AUTOPILOT_DB_PATH";
pub const ENV_LOG_DIR: &str = "AUTOPILOT_LOG_DIR";
pub const ENV_SUSPICIOUS_LATENCY_MS: &str = "AUTOPILOT_SUSPICIOUS_LATENCY_MS";

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DB_PATH: &str = "data/autopilot.sqlite";
const DEFAULT_LOG_DIR: &str = "logs";

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub ai: AiServiceConfig,
    pub dispatcher: DispatcherConfig,
}

impl AppConfig {
    /// Reads the environment, after loading a `.env` file if one exists.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let port = env_string(ENV_PORT)
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let db_path = env_string(ENV_DB_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));
        let log_dir = env_string(ENV_LOG_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR));
        let suspicious_latency = env_string(ENV_SUSPICIOUS_LATENCY_MS)
            .and_then(|value| value.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(SUSPICIOUS_LATENCY_THRESHOLD);

        let ai = AiServiceConfig::from_env();
        let dispatcher = DispatcherConfig {
            request_timeout: ai.http_timeout,
            suspicious_latency,
        };

        Self {
            port,
            db_path,
            log_dir,
            ai,
            dispatcher,
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
