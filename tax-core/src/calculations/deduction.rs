//! Deduction resolution.
//!
//! Every taxpayer receives the configured personal deduction. Each claimed
//! allowance is added on top, capped at the configured maximum for its
//! category. Amounts are not validated here: a negative allowance lowers the
//! total, so callers reject negative input before it reaches this module.

use rust_decimal::Decimal;

use crate::models::{Allowance, DeductionClaims, TaxDeductionConfig};

/// Returns the amount an allowance contributes after applying its cap.
pub fn capped_allowance(
    config: &TaxDeductionConfig,
    allowance: &Allowance,
) -> Decimal {
    allowance.amount.min(config.cap_for(allowance.kind))
}

/// Total deduction for a list of allowances.
///
/// Each entry is capped on its own, so two entries of the same category
/// can together exceed the category cap. Duplicate categories are rejected
/// by request validation.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::resolve_deduction;
/// use tax_core::{Allowance, TaxDeductionConfig};
///
/// let config = TaxDeductionConfig::default();
/// let allowances = [
///     Allowance::k_receipt(dec!(200000)),
///     Allowance::donation(dec!(100000)),
/// ];
///
/// assert_eq!(resolve_deduction(&config, &allowances), dec!(210000));
/// ```
pub fn resolve_deduction(
    config: &TaxDeductionConfig,
    allowances: &[Allowance],
) -> Decimal {
    allowances
        .iter()
        .fold(config.personal_deduction, |total, allowance| {
            total + capped_allowance(config, allowance)
        })
}

/// Total deduction for the fixed donation / K-receipt pair used by bulk rows.
pub fn resolve_claims(
    config: &TaxDeductionConfig,
    claims: &DeductionClaims,
) -> Decimal {
    resolve_deduction(config, &claims.allowances())
}
