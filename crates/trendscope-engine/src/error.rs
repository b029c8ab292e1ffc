use thiserror::Error;

use crate::repository::RepositoryError;

#[derive(Debug, Error)]
pub enum TrendError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Records before the failing one stay committed; replaying the whole
    /// batch only bumps their appearance counts again.
    #[error("ingest batch interrupted after {processed} records: {source}")]
    BatchInterrupted {
        processed: usize,
        #[source]
        source: RepositoryError,
    },
}
