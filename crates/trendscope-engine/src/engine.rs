use chrono::{DateTime, Utc};
use trendscope_core::{
    EngineConfig, IngestSummary, RawProductRecord, RecommendedTrend, TrendFilters,
    TrendGroupSummary, TrendPrediction,
};

use crate::aggregate;
use crate::error::TrendError;
use crate::group::group_by_key;
use crate::predict::predict_groups;
use crate::recommend::recommend;
use crate::repository::{SignalFilter, SignalOrder, SignalQuery, SignalRepository};

/// Entry point for the four engine operations over one signal store.
///
/// Every operation has an `_at` variant taking the clock reading explicitly;
/// the plain variants use `Utc::now()`.
pub struct TrendEngine<R> {
    repo: R,
    config: EngineConfig,
}

impl<R: SignalRepository> TrendEngine<R> {
    #[must_use]
    pub fn new(repo: R, config: EngineConfig) -> Self {
        Self { repo, config }
    }

    #[must_use]
    pub fn repository(&self) -> &R {
        &self.repo
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Upserts a batch of raw records and re-runs confirmation for the keys
    /// it touched.
    ///
    /// # Errors
    ///
    /// See [`aggregate::ingest_batch`].
    pub async fn ingest_batch(
        &self,
        records: &[RawProductRecord],
    ) -> Result<IngestSummary, TrendError> {
        self.ingest_batch_at(records, Utc::now()).await
    }

    /// # Errors
    ///
    /// See [`aggregate::ingest_batch`].
    pub async fn ingest_batch_at(
        &self,
        records: &[RawProductRecord],
        now: DateTime<Utc>,
    ) -> Result<IngestSummary, TrendError> {
        aggregate::ingest_batch(&self.repo, &self.config, records, now).await
    }

    /// # Errors
    ///
    /// Returns [`TrendError::Repository`] if the read fails.
    pub async fn list_confirmed_trends(
        &self,
        filters: &TrendFilters,
        limit: usize,
    ) -> Result<Vec<TrendGroupSummary>, TrendError> {
        aggregate::list_confirmed_trends(&self.repo, &self.config, filters, limit).await
    }

    /// Predictions for the most recently seen signals, best first.
    ///
    /// # Errors
    ///
    /// Returns [`TrendError::Repository`] if the read fails.
    pub async fn predict_trends(&self, limit: usize) -> Result<Vec<TrendPrediction>, TrendError> {
        self.predict_trends_at(limit, Utc::now()).await
    }

    /// # Errors
    ///
    /// Returns [`TrendError::Repository`] if the read fails.
    pub async fn predict_trends_at(
        &self,
        limit: usize,
        now: DateTime<Utc>,
    ) -> Result<Vec<TrendPrediction>, TrendError> {
        let mut predictions = self.predict_window(now).await?;
        predictions.truncate(limit);
        Ok(predictions)
    }

    /// Confirmed trends with a buy/avoid classification.
    ///
    /// # Errors
    ///
    /// Returns [`TrendError::Repository`] if either read fails.
    pub async fn list_trends_with_recommendation(
        &self,
        filters: &TrendFilters,
        limit: usize,
    ) -> Result<Vec<RecommendedTrend>, TrendError> {
        self.list_trends_with_recommendation_at(filters, limit, Utc::now())
            .await
    }

    /// # Errors
    ///
    /// Returns [`TrendError::Repository`] if either read fails.
    pub async fn list_trends_with_recommendation_at(
        &self,
        filters: &TrendFilters,
        limit: usize,
        now: DateTime<Utc>,
    ) -> Result<Vec<RecommendedTrend>, TrendError> {
        let groups = self.list_confirmed_trends(filters, limit).await?;
        if groups.is_empty() {
            return Ok(Vec::new());
        }
        let predictions = self.predict_window(now).await?;
        Ok(recommend(
            groups,
            &predictions,
            self.config.saturation_score,
        ))
    }

    /// Scores every key present among the `prediction_window` most recently
    /// seen signals, confirmed or not.
    async fn predict_window(&self, now: DateTime<Utc>) -> Result<Vec<TrendPrediction>, TrendError> {
        let signals = self
            .repo
            .query(&SignalQuery {
                filter: SignalFilter::default(),
                order: SignalOrder::LastSeenDesc,
                limit: self.config.prediction_window,
            })
            .await?;
        let groups = group_by_key(signals);
        tracing::debug!(
            groups = groups.len(),
            window = self.config.prediction_window,
            "scoring trend groups"
        );
        Ok(predict_groups(&groups, now))
    }
}
