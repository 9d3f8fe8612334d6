//! Process-local configuration storage for tests and throwaway runs.

use std::sync::RwLock;

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::factory::{DbConfig, RepositoryFactory};
use super::repository::{DeductionConfigRepository, RepositoryError};
use crate::models::TaxDeductionConfig;

/// Holds the configuration record in memory.
///
/// [`InMemoryRepository::empty`] starts without a record so callers can
/// exercise the not-found path.
#[derive(Debug)]
pub struct InMemoryRepository {
    config: RwLock<Option<TaxDeductionConfig>>,
}

impl InMemoryRepository {
    pub fn new(config: TaxDeductionConfig) -> Self {
        Self {
            config: RwLock::new(Some(config)),
        }
    }

    pub fn empty() -> Self {
        Self {
            config: RwLock::new(None),
        }
    }

    fn update(
        &self,
        apply: impl FnOnce(&mut TaxDeductionConfig),
    ) -> Result<(), RepositoryError> {
        let mut guard = self
            .config
            .write()
            .map_err(|e| RepositoryError::Database(e.to_string()))?;
        let config = guard.as_mut().ok_or(RepositoryError::NotFound)?;
        apply(config);
        Ok(())
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new(TaxDeductionConfig::default())
    }
}

#[async_trait]
impl DeductionConfigRepository for InMemoryRepository {
    async fn get_config(&self) -> Result<TaxDeductionConfig, RepositoryError> {
        let guard = self
            .config
            .read()
            .map_err(|e| RepositoryError::Database(e.to_string()))?;
        guard.clone().ok_or(RepositoryError::NotFound)
    }

    async fn update_personal_deduction(
        &self,
        amount: Decimal,
    ) -> Result<(), RepositoryError> {
        self.update(|config| config.personal_deduction = amount)
    }

    async fn update_k_receipt_deduction_max(
        &self,
        amount: Decimal,
    ) -> Result<(), RepositoryError> {
        self.update(|config| config.k_receipt_deduction_max = amount)
    }
}

/// Registers the `"memory"` backend. The connection string is ignored.
pub struct InMemoryRepositoryFactory;

#[async_trait]
impl RepositoryFactory for InMemoryRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(
        &self,
        _config: &DbConfig,
    ) -> Result<Box<dyn DeductionConfigRepository>, RepositoryError> {
        Ok(Box::new(InMemoryRepository::default()))
    }
}
