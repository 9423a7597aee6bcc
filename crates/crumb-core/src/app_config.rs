use std::path::PathBuf;

/// Runtime environment the client is configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

/// Application configuration resolved from environment variables.
///
/// Built once at startup via [`crate::load_app_config`] and passed down to
/// the API clients and storage layer; nothing reads env vars after that.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the remote storefront backend.
    pub api_base_url: String,
    pub env: Environment,
    pub log_level: String,
    /// Directory used by the file-backed persisted stores.
    pub storage_dir: PathBuf,
    /// Bearer token for the current session, when one exists.
    pub session_token: Option<String>,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
}
