use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::info;

use crate::db::{DeductionConfigRepository, RepositoryError};
use crate::models::{
    K_RECEIPT_DEDUCTION_MAX, K_RECEIPT_DEDUCTION_MIN, PERSONAL_DEDUCTION_MAX,
    PERSONAL_DEDUCTION_MIN,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdminServiceError {
    #[error("amount must be between 10,000 and 100,000 (got {0})")]
    PersonalDeductionOutOfRange(Decimal),

    #[error("amount must be between 0 and 100,000 (got {0})")]
    KReceiptDeductionOutOfRange(Decimal),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl AdminServiceError {
    /// True for errors caused by the submitted amount rather than storage.
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::Repository(_))
    }
}

/// Range-checked updates to the deduction configuration.
#[derive(Clone)]
pub struct AdminService {
    repository: Arc<dyn DeductionConfigRepository>,
}

impl AdminService {
    pub fn new(repository: Arc<dyn DeductionConfigRepository>) -> Self {
        Self { repository }
    }

    /// Sets the personal deduction and returns the stored amount.
    pub async fn update_personal_deduction(
        &self,
        amount: Decimal,
    ) -> Result<Decimal, AdminServiceError> {
        if !(PERSONAL_DEDUCTION_MIN..=PERSONAL_DEDUCTION_MAX).contains(&amount) {
            return Err(AdminServiceError::PersonalDeductionOutOfRange(amount));
        }

        self.repository.update_personal_deduction(amount).await?;
        info!(%amount, "personal deduction updated");
        Ok(amount)
    }

    /// Sets the K-receipt cap and returns the stored amount.
    pub async fn update_k_receipt_deduction_max(
        &self,
        amount: Decimal,
    ) -> Result<Decimal, AdminServiceError> {
        if !(K_RECEIPT_DEDUCTION_MIN..=K_RECEIPT_DEDUCTION_MAX).contains(&amount) {
            return Err(AdminServiceError::KReceiptDeductionOutOfRange(amount));
        }

        self.repository.update_k_receipt_deduction_max(amount).await?;
        info!(%amount, "k-receipt deduction cap updated");
        Ok(amount)
    }
}
