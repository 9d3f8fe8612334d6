use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tax_core::{
    DEFAULT_DONATION_DEDUCTION_MAX, DEFAULT_K_RECEIPT_DEDUCTION_MAX, DEFAULT_PERSONAL_DEDUCTION,
    DeductionConfigRepository, MAIN_CONFIG_NAME, RepositoryError, TaxDeductionConfig,
};
use tracing::{debug, info};

use crate::decimal::{decimal_to_f64, get_decimal};

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Connects to `database_url`, creating the database file when missing.
    ///
    /// Accepts `sqlite:` URLs, bare file paths and `:memory:`. In-memory
    /// databases are limited to one connection so every query sees the same
    /// schema.
    pub async fn new(database_url: &str) -> Result<Self> {
        let url = normalize_url(database_url);
        let options = SqliteConnectOptions::from_str(&url)
            .with_context(|| format!("Invalid database URL: {}", database_url))?
            .create_if_missing(true);

        let mut pool_options = SqlitePoolOptions::new();
        if url.contains(":memory:") || url.contains("mode=memory") {
            pool_options = pool_options.max_connections(1);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to database: {}", database_url))?;
        debug!(database_url, "connected to sqlite");
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    /// Inserts the main configuration row with default amounts unless it
    /// already exists. Existing amounts are never overwritten.
    pub async fn ensure_default_config(&self) -> Result<()> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO tax_deduction_config
                (config_name, personal_deduction, k_receipt_deduction_max, donation_deduction_max)
             VALUES (?, ?, ?, ?)",
        )
        .bind(MAIN_CONFIG_NAME)
        .bind(decimal_to_f64(DEFAULT_PERSONAL_DEDUCTION))
        .bind(decimal_to_f64(DEFAULT_K_RECEIPT_DEDUCTION_MAX))
        .bind(decimal_to_f64(DEFAULT_DONATION_DEDUCTION_MAX))
        .execute(&self.pool)
        .await
        .context("Failed to insert default deduction config")?;

        if result.rows_affected() > 0 {
            info!(config = MAIN_CONFIG_NAME, "default deduction config created");
        }
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn update_amount(
        &self,
        column: &'static str,
        amount: Decimal,
    ) -> Result<(), RepositoryError> {
        let sql = format!(
            "UPDATE tax_deduction_config
             SET {column} = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%SZ', 'now')
             WHERE config_name = ?"
        );

        let result = sqlx::query(&sql)
            .bind(decimal_to_f64(amount))
            .bind(MAIN_CONFIG_NAME)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

/// Maps bare paths and `:memory:` onto sqlx `sqlite:` URLs.
fn normalize_url(database_url: &str) -> String {
    if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite:{}", database_url)
    }
}

#[async_trait]
impl DeductionConfigRepository for SqliteRepository {
    async fn get_config(&self) -> Result<TaxDeductionConfig, RepositoryError> {
        let row = sqlx::query(
            "SELECT personal_deduction, k_receipt_deduction_max, donation_deduction_max
             FROM tax_deduction_config WHERE config_name = ?",
        )
        .bind(MAIN_CONFIG_NAME)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?
        .ok_or(RepositoryError::NotFound)?;

        Ok(TaxDeductionConfig {
            personal_deduction: get_decimal(&row, "personal_deduction")?,
            k_receipt_deduction_max: get_decimal(&row, "k_receipt_deduction_max")?,
            donation_deduction_max: get_decimal(&row, "donation_deduction_max")?,
        })
    }

    async fn update_personal_deduction(
        &self,
        amount: Decimal,
    ) -> Result<(), RepositoryError> {
        self.update_amount("personal_deduction", amount).await
    }

    async fn update_k_receipt_deduction_max(
        &self,
        amount: Decimal,
    ) -> Result<(), RepositoryError> {
        self.update_amount("k_receipt_deduction_max", amount).await
    }
}
