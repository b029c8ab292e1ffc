//! Postgres storage for `trend_signals`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use trendscope_core::{ListingSection, NewTrendSignal, SignalIdentity, TrendSignal};
use trendscope_engine::{
    RepositoryError, SignalOrder, SignalQuery, SignalRepository, SignalUpdate,
};
use uuid::Uuid;

const SIGNAL_COLUMNS: &str = "id, product_name, product_type, cut, material, color, brand, \
     source_reference, source_section, price, currency, image_reference, country, style, \
     canonical_key, appearance_count, first_seen_at, last_seen_at, is_confirmed, \
     confirmation_score, confirmed_at";

/// A row from the `trend_signals` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TrendSignalRow {
    pub id: Uuid,
    pub product_name: String,
    pub product_type: String,
    pub cut: Option<String>,
    pub material: Option<String>,
    pub color: Option<String>,
    pub brand: String,
    pub source_reference: String,
    /// `new_in` or `best_sellers`, enforced by a CHECK constraint.
    pub source_section: String,
    pub price: Decimal,
    pub currency: String,
    pub image_reference: Option<String>,
    pub country: Option<String>,
    pub style: Option<String>,
    pub canonical_key: String,
    pub appearance_count: i32,
    pub first_seen_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
    pub is_confirmed: bool,
    pub confirmation_score: i32,
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl TryFrom<TrendSignalRow> for TrendSignal {
    type Error = RepositoryError;

    fn try_from(row: TrendSignalRow) -> Result<Self, Self::Error> {
        let source_section = ListingSection::parse(&row.source_section).ok_or_else(|| {
            RepositoryError::Decode(format!(
                "unknown source_section '{}' on signal {}",
                row.source_section, row.id
            ))
        })?;

        Ok(TrendSignal {
            id: row.id,
            product_name: row.product_name,
            product_type: row.product_type,
            cut: row.cut,
            material: row.material,
            color: row.color,
            brand: row.brand,
            source_reference: row.source_reference,
            source_section,
            price: row.price,
            currency: row.currency,
            image_reference: row.image_reference,
            country: row.country,
            style: row.style,
            canonical_key: row.canonical_key,
            appearance_count: row.appearance_count,
            first_seen_at: row.first_seen_at,
            last_seen_at: row.last_seen_at,
            is_confirmed: row.is_confirmed,
            confirmation_score: row.confirmation_score,
            confirmed_at: row.confirmed_at,
        })
    }
}

/// [`SignalRepository`] over a Postgres pool.
///
/// Filters compare case-insensitively via `lower()`. Each update is a single
/// statement, so concurrent batches can interleave without coordination.
#[derive(Debug, Clone)]
pub struct PgSignalRepository {
    pool: PgPool,
}

impl PgSignalRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn exists(&self, id: Uuid) -> Result<bool, RepositoryError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM trend_signals WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(database_error)
    }
}

fn database_error(err: sqlx::Error) -> RepositoryError {
    RepositoryError::Database(err.to_string())
}

fn order_clause(order: SignalOrder) -> &'static str {
    match order {
        SignalOrder::ConfirmationScoreDesc => {
            "confirmation_score DESC, last_seen_at DESC, created_at ASC"
        }
        SignalOrder::LastSeenDesc => "last_seen_at DESC, created_at ASC",
    }
}

#[async_trait]
impl SignalRepository for PgSignalRepository {
    async fn find_by_identity(
        &self,
        identity: &SignalIdentity,
    ) -> Result<Option<TrendSignal>, RepositoryError> {
        let sql = format!(
            "SELECT {SIGNAL_COLUMNS} FROM trend_signals \
             WHERE product_name = $1 AND brand = $2 AND source_reference = $3"
        );
        let row = sqlx::query_as::<_, TrendSignalRow>(&sql)
            .bind(&identity.product_name)
            .bind(&identity.brand)
            .bind(&identity.source_reference)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)?;

        row.map(TrendSignal::try_from).transpose()
    }

    async fn create(&self, signal: NewTrendSignal) -> Result<TrendSignal, RepositoryError> {
        let sql = format!(
            "INSERT INTO trend_signals \
               (id, product_name, product_type, cut, material, color, brand, \
                source_reference, source_section, price, currency, image_reference, \
                country, style, canonical_key, appearance_count, first_seen_at, last_seen_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, 1, $16, $16) \
             RETURNING {SIGNAL_COLUMNS}"
        );
        let result = sqlx::query_as::<_, TrendSignalRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&signal.product_name)
            .bind(&signal.product_type)
            .bind(&signal.cut)
            .bind(&signal.material)
            .bind(&signal.color)
            .bind(&signal.brand)
            .bind(&signal.source_reference)
            .bind(signal.source_section.as_str())
            .bind(signal.price)
            .bind(&signal.currency)
            .bind(&signal.image_reference)
            .bind(&signal.country)
            .bind(&signal.style)
            .bind(&signal.canonical_key)
            .bind(signal.seen_at)
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(row) => TrendSignal::try_from(row),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(RepositoryError::Conflict(format!(
                    "{} / {} / {}",
                    signal.product_name, signal.brand, signal.source_reference
                )))
            }
            Err(err) => Err(database_error(err)),
        }
    }

    async fn update(&self, id: Uuid, update: SignalUpdate) -> Result<bool, RepositoryError> {
        let result = match update {
            SignalUpdate::Sighting {
                price,
                currency,
                image_reference,
                seen_at,
            } => {
                sqlx::query(
                    "UPDATE trend_signals SET \
                       appearance_count = appearance_count + 1, \
                       last_seen_at = $2, \
                       price = $3, \
                       currency = $4, \
                       image_reference = COALESCE($5, image_reference), \
                       updated_at = NOW() \
                     WHERE id = $1",
                )
                .bind(id)
                .bind(seen_at)
                .bind(price)
                .bind(currency)
                .bind(image_reference)
                .execute(&self.pool)
                .await
            }
            SignalUpdate::Confirm {
                score,
                confirmed_at,
            } => {
                sqlx::query(
                    "UPDATE trend_signals SET \
                       is_confirmed = TRUE, \
                       confirmation_score = $2, \
                       confirmed_at = $3, \
                       updated_at = NOW() \
                     WHERE id = $1 AND is_confirmed = FALSE",
                )
                .bind(id)
                .bind(score)
                .bind(confirmed_at)
                .execute(&self.pool)
                .await
            }
        }
        .map_err(database_error)?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }
        // Nothing changed: either the row is gone or it was already confirmed.
        if self.exists(id).await? {
            Ok(false)
        } else {
            Err(RepositoryError::NotFound(id))
        }
    }

    async fn query(&self, query: &SignalQuery) -> Result<Vec<TrendSignal>, RepositoryError> {
        let sql = format!(
            "SELECT {SIGNAL_COLUMNS} FROM trend_signals \
             WHERE ($1::TEXT IS NULL OR lower(country) = lower($1)) \
               AND ($2::TEXT IS NULL OR lower(style) = lower($2)) \
               AND ($3::TEXT IS NULL OR lower(product_type) = lower($3)) \
               AND ($4::TEXT IS NULL OR canonical_key = lower($4)) \
               AND ($5::BOOLEAN IS NULL OR is_confirmed = $5) \
             ORDER BY {} \
             LIMIT $6",
            order_clause(query.order)
        );
        let rows = sqlx::query_as::<_, TrendSignalRow>(&sql)
            .bind(&query.filter.country)
            .bind(&query.filter.style)
            .bind(&query.filter.product_type)
            .bind(&query.filter.canonical_key)
            .bind(query.filter.is_confirmed)
            .bind(i64::try_from(query.limit).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(database_error)?;

        tracing::debug!(rows = rows.len(), limit = query.limit, "queried trend signals");
        rows.into_iter().map(TrendSignal::try_from).collect()
    }
}
