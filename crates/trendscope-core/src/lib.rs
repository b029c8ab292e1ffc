//! Shared domain types and configuration for the trendscope workspace.

pub mod app_config;
pub mod config;
pub mod products;
pub mod records;
pub mod signals;
pub mod sources;
pub mod trends;

use thiserror::Error;

pub use app_config::{AppConfig, EngineConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use products::NormalizedProduct;
pub use records::{ListingSection, RawProductRecord, Segment};
pub use signals::{NewTrendSignal, SignalIdentity, TrendSignal};
pub use sources::{apply_source_defaults, load_sources, SourceConfig, SourcesFile};
pub use trends::{
    ConfidenceLevel, IngestSummary, Recommendation, RecommendedTrend, TrendFilters,
    TrendGroupSummary, TrendPhase, TrendPrediction,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read sources file {path}: {source}")]
    SourcesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse sources file: {0}")]
    SourcesFileParse(#[from] serde_yaml::Error),

    #[error("sources validation failed: {0}")]
    Validation(String),
}
