//! Trend detection and prediction over harvested product listings.
//!
//! Raw listings are normalized into a small product taxonomy, keyed by
//! `type|cut|material`, persisted as trend signals, confirmed once enough
//! distinct brands share a key, and scored for lifecycle phase and
//! buy/avoid recommendation.

pub mod aggregate;
pub mod engine;
pub mod error;
pub mod group;
pub mod key;
pub mod memory;
pub mod normalize;
pub mod predict;
pub mod recommend;
pub mod repository;
pub mod stats;

pub use aggregate::{confirm_key, ingest_batch, list_confirmed_trends};
pub use engine::TrendEngine;
pub use error::TrendError;
pub use group::{group_by_key, TrendGroup};
pub use key::{canonical_key, record_key, signal_key};
pub use memory::InMemorySignalRepository;
pub use normalize::{normalize, resolve_attributes, ResolvedAttributes};
pub use predict::{determine_trend_phase, predict_group, predict_groups};
pub use recommend::{classify, recommend};
pub use repository::{
    RepositoryError, SignalFilter, SignalOrder, SignalQuery, SignalRepository, SignalUpdate,
};
