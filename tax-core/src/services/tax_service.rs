//! Tax computation entry points.
//!
//! Each call reads the deduction configuration once and then runs the pure
//! calculation pipeline. The configuration is never cached between calls so
//! admin updates apply to the next request.

use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::calculations::common::non_negative;
use crate::calculations::{
    ProgressiveTaxSchedule, derive_net, resolve_claims, resolve_deduction,
};
use crate::db::{DeductionConfigRepository, RepositoryError};
use crate::models::{
    Allowance, BatchTaxRecord, BatchTaxResult, NetTax, TaxComputation, TaxDeductionConfig,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaxServiceError {
    #[error("deduction configuration unavailable: {0}")]
    ConfigUnavailable(#[from] RepositoryError),
}

#[derive(Clone)]
pub struct TaxService {
    repository: Arc<dyn DeductionConfigRepository>,
    schedule: ProgressiveTaxSchedule<'static>,
}

impl TaxService {
    pub fn new(repository: Arc<dyn DeductionConfigRepository>) -> Self {
        Self {
            repository,
            schedule: ProgressiveTaxSchedule::standard(),
        }
    }

    /// Net tax or refund for one taxpayer.
    pub async fn calculate_tax(
        &self,
        total_income: Decimal,
        wht: Decimal,
        allowances: &[Allowance],
    ) -> Result<NetTax, TaxServiceError> {
        Ok(self
            .calculate_detailed_tax(total_income, wht, allowances)
            .await?
            .net)
    }

    /// Net tax or refund together with the per-bracket breakdown.
    pub async fn calculate_detailed_tax(
        &self,
        total_income: Decimal,
        wht: Decimal,
        allowances: &[Allowance],
    ) -> Result<TaxComputation, TaxServiceError> {
        let config = self.repository.get_config().await?;
        let deduction = resolve_deduction(&config, allowances);

        let computation = self.compute(total_income, wht, deduction);
        debug!(
            %total_income,
            %wht,
            %deduction,
            total_tax = %computation.total_tax,
            "tax calculated"
        );
        Ok(computation)
    }

    /// Computes every record of a bulk upload against one configuration read.
    ///
    /// Records must already be validated; results keep the input order.
    pub async fn calculate_tax_batch(
        &self,
        records: &[BatchTaxRecord],
    ) -> Result<Vec<BatchTaxResult>, TaxServiceError> {
        let config = self.repository.get_config().await?;

        let results: Vec<_> = records
            .iter()
            .map(|record| self.compute_record(&config, record))
            .collect();

        debug!(records = results.len(), "batch calculated");
        Ok(results)
    }

    fn compute_record(
        &self,
        config: &TaxDeductionConfig,
        record: &BatchTaxRecord,
    ) -> BatchTaxResult {
        let deduction = resolve_claims(config, &record.claims());
        let computation = self.compute(record.total_income, record.wht, deduction);
        BatchTaxResult {
            total_income: record.total_income,
            net: computation.net,
        }
    }

    fn compute(
        &self,
        total_income: Decimal,
        wht: Decimal,
        deduction: Decimal,
    ) -> TaxComputation {
        let taxable_income = non_negative(total_income - deduction);
        let result = self.schedule.calculate(taxable_income);
        TaxComputation {
            taxable_income,
            total_tax: result.total_tax,
            net: derive_net(result.total_tax, wht),
            tax_levels: result.tax_levels,
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::db::InMemoryRepository;

    fn service() -> TaxService {
        TaxService::new(Arc::new(InMemoryRepository::default()))
    }

    struct UnreachableRepository;

    #[async_trait]
    impl DeductionConfigRepository for UnreachableRepository {
        async fn get_config(&self) -> Result<TaxDeductionConfig, RepositoryError> {
            Err(RepositoryError::Connection("database is down".to_string()))
        }

        async fn update_personal_deduction(
            &self,
            _amount: Decimal,
        ) -> Result<(), RepositoryError> {
            unimplemented!()
        }

        async fn update_k_receipt_deduction_max(
            &self,
            _amount: Decimal,
        ) -> Result<(), RepositoryError> {
            unimplemented!()
        }
    }

    // =========================================================================
    // single taxpayer
    // =========================================================================

    #[tokio::test]
    async fn personal_deduction_only() {
        let net = service()
            .calculate_tax(dec!(500000), dec!(0), &[])
            .await
            .unwrap();

        // 440,000 taxable: (440,000 - 150,000) * 10%
        assert_eq!(net.tax, dec!(29000));
        assert_eq!(net.refund, dec!(0));
    }

    #[tokio::test]
    async fn capped_allowances_and_withholding() {
        let allowances = [
            Allowance::k_receipt(dec!(200000)),
            Allowance::donation(dec!(100000)),
        ];

        let computation = service()
            .calculate_detailed_tax(dec!(900000), dec!(7000), &allowances)
            .await
            .unwrap();

        assert_eq!(computation.taxable_income, dec!(690000));
        assert_eq!(computation.total_tax, dec!(63500));
        assert_eq!(computation.net.tax, dec!(56500));
        assert_eq!(computation.net.refund, dec!(0));

        let taxes: Vec<_> = computation.tax_levels.iter().map(|l| l.tax).collect();
        assert_eq!(
            taxes,
            vec![dec!(0), dec!(35000), dec!(28500), dec!(0), dec!(0)]
        );
    }

    #[tokio::test]
    async fn deduction_larger_than_income_clamps_to_zero() {
        let computation = service()
            .calculate_detailed_tax(dec!(10000), dec!(500), &[])
            .await
            .unwrap();

        assert_eq!(computation.taxable_income, dec!(0));
        assert_eq!(computation.total_tax, dec!(0));
        assert_eq!(computation.net.refund, dec!(500));
    }

    #[tokio::test]
    async fn aggregate_and_detailed_paths_agree() {
        let service = service();
        let allowances = [Allowance::donation(dec!(42000.37))];

        let net = service
            .calculate_tax(dec!(1234567.89), dec!(100000), &allowances)
            .await
            .unwrap();
        let detailed = service
            .calculate_detailed_tax(dec!(1234567.89), dec!(100000), &allowances)
            .await
            .unwrap();

        assert_eq!(net, detailed.net);
    }

    #[tokio::test]
    async fn configuration_changes_apply_to_next_call() {
        let repository = Arc::new(InMemoryRepository::default());
        let service = TaxService::new(repository.clone());

        repository.update_personal_deduction(dec!(100000)).await.unwrap();

        let net = service
            .calculate_tax(dec!(500000), dec!(0), &[])
            .await
            .unwrap();
        assert_eq!(net.tax, dec!(25000));
    }

    #[tokio::test]
    async fn config_failure_is_reported() {
        let service = TaxService::new(Arc::new(UnreachableRepository));

        let err = service
            .calculate_tax(dec!(500000), dec!(0), &[])
            .await
            .unwrap_err();

        assert_eq!(
            err,
            TaxServiceError::ConfigUnavailable(RepositoryError::Connection(
                "database is down".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn missing_config_row_is_reported() {
        let service = TaxService::new(Arc::new(InMemoryRepository::empty()));

        let err = service
            .calculate_detailed_tax(dec!(1), dec!(0), &[])
            .await
            .unwrap_err();

        assert_eq!(err, TaxServiceError::ConfigUnavailable(RepositoryError::NotFound));
    }

    // =========================================================================
    // batch
    // =========================================================================

    #[tokio::test]
    async fn batch_preserves_order_and_splits_tax_from_refund() {
        let records = [
            BatchTaxRecord {
                total_income: dec!(500000),
                ..Default::default()
            },
            BatchTaxRecord {
                total_income: dec!(600000),
                wht: dec!(40000),
                donation: dec!(20000),
                ..Default::default()
            },
            BatchTaxRecord {
                total_income: dec!(750000),
                wht: dec!(50000),
                donation: dec!(15000),
                ..Default::default()
            },
        ];

        let results = service().calculate_tax_batch(&records).await.unwrap();

        let summary: Vec<_> = results
            .iter()
            .map(|r| (r.total_income, r.net.tax, r.net.refund))
            .collect();
        assert_eq!(
            summary,
            vec![
                (dec!(500000), dec!(29000), dec!(0)),
                (dec!(600000), dec!(0), dec!(2000)),
                (dec!(750000), dec!(11250), dec!(0)),
            ]
        );
    }

    #[tokio::test]
    async fn batch_caps_k_receipt_per_record() {
        let records = [BatchTaxRecord {
            total_income: dec!(900000),
            wht: dec!(7000),
            donation: dec!(100000),
            k_receipt: dec!(200000),
        }];

        let results = service().calculate_tax_batch(&records).await.unwrap();

        assert_eq!(results[0].net.tax, dec!(56500));
    }

    #[tokio::test]
    async fn empty_batch_yields_empty_result() {
        assert!(service().calculate_tax_batch(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn batch_fails_whole_when_config_unavailable() {
        let service = TaxService::new(Arc::new(UnreachableRepository));

        let result = service
            .calculate_tax_batch(&[BatchTaxRecord::default()])
            .await;

        assert!(matches!(result, Err(TaxServiceError::ConfigUnavailable(_))));
    }
}
