use std::collections::HashMap;

use tokio::sync::RwLock;
use trendscope_core::{NewTrendSignal, SignalIdentity, TrendSignal};
use uuid::Uuid;

use crate::repository::{
    RepositoryError, SignalOrder, SignalQuery, SignalRepository, SignalUpdate,
};

#[derive(Default)]
struct Store {
    /// Insertion order doubles as the final tie-break for queries.
    rows: Vec<TrendSignal>,
    by_identity: HashMap<SignalIdentity, usize>,
}

/// Process-local signal store for tests and database-free callers.
#[derive(Default)]
pub struct InMemorySignalRepository {
    store: RwLock<Store>,
}

impl InMemorySignalRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored signal in insertion order.
    pub async fn all(&self) -> Vec<TrendSignal> {
        self.store.read().await.rows.clone()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.rows.is_empty()
    }
}

#[async_trait::async_trait]
impl SignalRepository for InMemorySignalRepository {
    async fn find_by_identity(
        &self,
        identity: &SignalIdentity,
    ) -> Result<Option<TrendSignal>, RepositoryError> {
        let store = self.store.read().await;
        Ok(store
            .by_identity
            .get(identity)
            .map(|&idx| store.rows[idx].clone()))
    }

    async fn create(&self, signal: NewTrendSignal) -> Result<TrendSignal, RepositoryError> {
        let mut store = self.store.write().await;
        let identity = signal.identity();
        if store.by_identity.contains_key(&identity) {
            return Err(RepositoryError::Conflict(format!(
                "{} / {} / {}",
                identity.product_name, identity.brand, identity.source_reference
            )));
        }
        let row = signal.into_signal(Uuid::new_v4());
        let idx = store.rows.len();
        store.rows.push(row.clone());
        store.by_identity.insert(identity, idx);
        Ok(row)
    }

    async fn update(&self, id: Uuid, update: SignalUpdate) -> Result<bool, RepositoryError> {
        let mut store = self.store.write().await;
        let row = store
            .rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(RepositoryError::NotFound(id))?;

        match update {
            SignalUpdate::Sighting {
                price,
                currency,
                image_reference,
                seen_at,
            } => {
                row.appearance_count = row.appearance_count.saturating_add(1);
                row.last_seen_at = seen_at;
                row.price = price;
                row.currency = currency;
                if image_reference.is_some() {
                    row.image_reference = image_reference;
                }
                Ok(true)
            }
            SignalUpdate::Confirm {
                score,
                confirmed_at,
            } => {
                if row.is_confirmed {
                    return Ok(false);
                }
                row.is_confirmed = true;
                row.confirmation_score = score;
                row.confirmed_at = Some(confirmed_at);
                Ok(true)
            }
        }
    }

    async fn query(&self, query: &SignalQuery) -> Result<Vec<TrendSignal>, RepositoryError> {
        let store = self.store.read().await;
        let mut rows: Vec<TrendSignal> = store
            .rows
            .iter()
            .filter(|r| query.filter.matches(r))
            .cloned()
            .collect();

        match query.order {
            SignalOrder::ConfirmationScoreDesc => rows.sort_by(|a, b| {
                b.confirmation_score
                    .cmp(&a.confirmation_score)
                    .then_with(|| b.last_seen_at.cmp(&a.last_seen_at))
            }),
            SignalOrder::LastSeenDesc => rows.sort_by(|a, b| b.last_seen_at.cmp(&a.last_seen_at)),
        }
        rows.truncate(query.limit);
        Ok(rows)
    }
}
