use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::AllowanceKind;

/// Name of the single configuration record every computation reads.
pub const MAIN_CONFIG_NAME: &str = "MainConfig";

pub const DEFAULT_PERSONAL_DEDUCTION: Decimal = dec!(60000);
pub const DEFAULT_K_RECEIPT_DEDUCTION_MAX: Decimal = dec!(50000);
pub const DEFAULT_DONATION_DEDUCTION_MAX: Decimal = dec!(100000);

/// Inclusive bounds accepted by the personal deduction admin update.
pub const PERSONAL_DEDUCTION_MIN: Decimal = dec!(10000);
pub const PERSONAL_DEDUCTION_MAX: Decimal = dec!(100000);

/// Inclusive bounds accepted by the K-receipt cap admin update.
pub const K_RECEIPT_DEDUCTION_MIN: Decimal = dec!(0);
pub const K_RECEIPT_DEDUCTION_MAX: Decimal = dec!(100000);

/// Deduction settings shared by every tax computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxDeductionConfig {
    /// Subtracted from every taxpayer's income.
    pub personal_deduction: Decimal,
    /// Cap applied to a K-receipt allowance.
    pub k_receipt_deduction_max: Decimal,
    /// Cap applied to a donation allowance.
    pub donation_deduction_max: Decimal,
}

impl TaxDeductionConfig {
    /// Returns the cap for the given allowance category.
    pub fn cap_for(
        &self,
        kind: AllowanceKind,
    ) -> Decimal {
        match kind {
            AllowanceKind::Donation => self.donation_deduction_max,
            AllowanceKind::KReceipt => self.k_receipt_deduction_max,
        }
    }
}

impl Default for TaxDeductionConfig {
    fn default() -> Self {
        Self {
            personal_deduction: DEFAULT_PERSONAL_DEDUCTION,
            k_receipt_deduction_max: DEFAULT_K_RECEIPT_DEDUCTION_MAX,
            donation_deduction_max: DEFAULT_DONATION_DEDUCTION_MAX,
        }
    }
}
