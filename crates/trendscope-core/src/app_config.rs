use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

pub const DEFAULT_CONFIRMATION_MIN_BRANDS: usize = 3;
pub const DEFAULT_SATURATION_SCORE: i32 = 5;
pub const DEFAULT_PREDICTION_WINDOW: usize = 500;
pub const DEFAULT_LISTING_OVERFETCH: usize = 3;
pub const DEFAULT_CONFIRMATION_SCAN_LIMIT: usize = 10_000;

/// Tunables for the trend engine. The defaults are the production contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Distinct brands sharing a canonical key before its signals are confirmed.
    pub confirmation_min_brands: usize,
    /// Confirmation score at which a trend is considered saturated.
    pub saturation_score: i32,
    /// Most-recently-seen signals loaded for prediction.
    pub prediction_window: usize,
    /// Multiplier on the requested limit when reading confirmed signals.
    pub listing_overfetch: usize,
    /// Upper bound on signals read for one key during a confirmation pass.
    pub confirmation_scan_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            confirmation_min_brands: DEFAULT_CONFIRMATION_MIN_BRANDS,
            saturation_score: DEFAULT_SATURATION_SCORE,
            prediction_window: DEFAULT_PREDICTION_WINDOW,
            listing_overfetch: DEFAULT_LISTING_OVERFETCH,
            confirmation_scan_limit: DEFAULT_CONFIRMATION_SCAN_LIMIT,
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub log_level: String,
    pub sources_path: PathBuf,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub engine: EngineConfig,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("sources_path", &self.sources_path)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("engine", &self.engine)
            .finish()
    }
}
