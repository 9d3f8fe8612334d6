use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::DeductionClaims;

/// Tax attributed to one bracket of the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxLevel {
    pub level: String,
    pub tax: Decimal,
}

impl TaxLevel {
    pub fn new(
        level: impl Into<String>,
        tax: Decimal,
    ) -> Self {
        Self {
            level: level.into(),
            tax,
        }
    }
}

/// Tax still owed or refund due after withholding.
///
/// At most one of the two fields is positive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetTax {
    pub tax: Decimal,
    pub refund: Decimal,
}

impl NetTax {
    pub fn is_refund(&self) -> bool {
        self.refund > Decimal::ZERO
    }
}

/// Result of a single-taxpayer computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxComputation {
    /// Income after deductions, clamped at zero.
    pub taxable_income: Decimal,
    /// Bracket tax before withholding.
    pub total_tax: Decimal,
    pub net: NetTax,
    /// One entry per bracket, in schedule order.
    pub tax_levels: Vec<TaxLevel>,
}

/// One row of a bulk upload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchTaxRecord {
    pub total_income: Decimal,
    pub wht: Decimal,
    pub donation: Decimal,
    pub k_receipt: Decimal,
}

impl BatchTaxRecord {
    pub fn claims(&self) -> DeductionClaims {
        DeductionClaims::new(self.donation, self.k_receipt)
    }
}

/// Outcome for one row of a bulk upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchTaxResult {
    pub total_income: Decimal,
    pub net: NetTax,
}
