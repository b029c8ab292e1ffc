//! Storage seam for trend signals.
//!
//! The engine only talks to storage through [`SignalRepository`]. Both update
//! kinds are expected to be atomic per row; `Confirm` must be a no-op on rows
//! that are already confirmed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use trendscope_core::{NewTrendSignal, SignalIdentity, TrendSignal};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("signal not found: {0}")]
    NotFound(Uuid),
    #[error("signal already exists: {0}")]
    Conflict(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SignalOrder {
    /// Highest confirmation score first, then most recently seen.
    #[default]
    ConfirmationScoreDesc,
    LastSeenDesc,
}

/// Equality filters. Text comparisons are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignalFilter {
    pub country: Option<String>,
    pub style: Option<String>,
    pub product_type: Option<String>,
    pub canonical_key: Option<String>,
    pub is_confirmed: Option<bool>,
}

impl SignalFilter {
    /// Whether `signal` passes every set filter.
    #[must_use]
    pub fn matches(&self, signal: &TrendSignal) -> bool {
        fn eq_ci(wanted: Option<&String>, actual: Option<&str>) -> bool {
            match wanted {
                None => true,
                Some(w) => actual.is_some_and(|a| a.eq_ignore_ascii_case(w)),
            }
        }

        eq_ci(self.country.as_ref(), signal.country.as_deref())
            && eq_ci(self.style.as_ref(), signal.style.as_deref())
            && eq_ci(self.product_type.as_ref(), Some(&signal.product_type))
            && eq_ci(self.canonical_key.as_ref(), Some(&signal.canonical_key))
            && self.is_confirmed.is_none_or(|c| c == signal.is_confirmed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalQuery {
    pub filter: SignalFilter,
    pub order: SignalOrder,
    pub limit: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SignalUpdate {
    /// A repeat sighting: `appearance_count += 1`, `last_seen_at = seen_at`,
    /// price and currency refreshed, image refreshed when present.
    Sighting {
        price: Decimal,
        currency: String,
        image_reference: Option<String>,
        seen_at: DateTime<Utc>,
    },
    /// Upgrade to confirmed. Ignored for rows that are already confirmed.
    Confirm {
        score: i32,
        confirmed_at: DateTime<Utc>,
    },
}

#[async_trait]
pub trait SignalRepository: Send + Sync {
    async fn find_by_identity(
        &self,
        identity: &SignalIdentity,
    ) -> Result<Option<TrendSignal>, RepositoryError>;

    /// Inserts a first sighting.
    ///
    /// Fails with [`RepositoryError::Conflict`] if the identity already exists.
    async fn create(&self, signal: NewTrendSignal) -> Result<TrendSignal, RepositoryError>;

    /// Applies `update` to one row. Returns `false` when the row was left
    /// unchanged (a `Confirm` on an already-confirmed row).
    async fn update(&self, id: Uuid, update: SignalUpdate) -> Result<bool, RepositoryError>;

    async fn query(&self, query: &SignalQuery) -> Result<Vec<TrendSignal>, RepositoryError>;
}
