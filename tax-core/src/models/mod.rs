mod allowance;
mod deduction_config;
mod tax_bracket;
mod tax_computation;

pub use allowance::{Allowance, AllowanceKind, DeductionClaims};
pub use deduction_config::{
    DEFAULT_DONATION_DEDUCTION_MAX, DEFAULT_K_RECEIPT_DEDUCTION_MAX, DEFAULT_PERSONAL_DEDUCTION,
    K_RECEIPT_DEDUCTION_MAX, K_RECEIPT_DEDUCTION_MIN, MAIN_CONFIG_NAME, PERSONAL_DEDUCTION_MAX,
    PERSONAL_DEDUCTION_MIN, TaxDeductionConfig,
};
pub use tax_bracket::{PROGRESSIVE_TAX_BRACKETS, TaxBracket};
pub use tax_computation::{BatchTaxRecord, BatchTaxResult, NetTax, TaxComputation, TaxLevel};
