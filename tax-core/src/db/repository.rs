use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::TaxDeductionConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Storage for the single deduction configuration record.
///
/// Updates touch one field and leave the others untouched. Implementations
/// return [`RepositoryError::NotFound`] when the record does not exist.
#[async_trait]
pub trait DeductionConfigRepository: Send + Sync {
    async fn get_config(&self) -> Result<TaxDeductionConfig, RepositoryError>;

    async fn update_personal_deduction(
        &self,
        amount: Decimal,
    ) -> Result<(), RepositoryError>;

    async fn update_k_receipt_deduction_max(
        &self,
        amount: Decimal,
    ) -> Result<(), RepositoryError>;
}
