//! Marginal-bracket tax accumulation.
//!
//! Income is sliced across the brackets in ascending order and each slice is
//! taxed at its own bracket's rate. Every slice is rounded to cents before it
//! is added to the total, so the total is always the sum of the per-bracket
//! figures reported in the breakdown.
//!
//! | Bracket               | Rate |
//! |-----------------------|------|
//! | 0-150,000             | 0%   |
//! | 150,001-500,000       | 10%  |
//! | 500,001-1,000,000     | 15%  |
//! | 1,000,001-2,000,000   | 20%  |
//! | 2,000,001 and above   | 35%  |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::ProgressiveTaxSchedule;
//!
//! let result = ProgressiveTaxSchedule::standard().calculate(dec!(690000));
//!
//! assert_eq!(result.total_tax, dec!(63500));
//! assert_eq!(result.tax_levels[1].tax, dec!(35000));
//! assert_eq!(result.tax_levels[2].tax, dec!(28500));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::round_half_up;
use crate::models::{PROGRESSIVE_TAX_BRACKETS, TaxBracket, TaxLevel};

/// Total tax and its per-bracket breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressiveTaxResult {
    pub total_tax: Decimal,
    /// One entry per bracket, zero for brackets the income never reached.
    pub tax_levels: Vec<TaxLevel>,
}

/// Calculator over an ordered bracket table.
#[derive(Debug, Clone, Copy)]
pub struct ProgressiveTaxSchedule<'a> {
    brackets: &'a [TaxBracket],
}

impl ProgressiveTaxSchedule<'static> {
    /// The fixed personal income tax schedule.
    pub fn standard() -> Self {
        Self::new(&PROGRESSIVE_TAX_BRACKETS)
    }
}

impl<'a> ProgressiveTaxSchedule<'a> {
    /// Brackets must be sorted by ascending `upper_bound`, with only the last
    /// one open-ended.
    pub fn new(brackets: &'a [TaxBracket]) -> Self {
        Self { brackets }
    }

    pub fn brackets(&self) -> &'a [TaxBracket] {
        self.brackets
    }

    /// Computes the tax for `income`, which the caller has already reduced by
    /// deductions and clamped at zero.
    pub fn calculate(
        &self,
        income: Decimal,
    ) -> ProgressiveTaxResult {
        let mut tax_levels: Vec<TaxLevel> = self
            .brackets
            .iter()
            .map(|bracket| TaxLevel::new(bracket.label, Decimal::ZERO))
            .collect();

        let mut total_tax = Decimal::ZERO;
        let mut previous_upper_bound = Decimal::ZERO;

        for (bracket, level) in self.brackets.iter().zip(tax_levels.iter_mut()) {
            match bracket.upper_bound {
                Some(upper_bound) if income > upper_bound => {
                    let portion =
                        round_half_up((upper_bound - previous_upper_bound) * bracket.rate);
                    level.tax = portion;
                    total_tax += portion;
                    previous_upper_bound = upper_bound;
                }
                _ => {
                    let portion = round_half_up((income - previous_upper_bound) * bracket.rate);
                    level.tax = portion;
                    total_tax += portion;
                    break;
                }
            }
        }

        ProgressiveTaxResult {
            total_tax,
            tax_levels,
        }
    }

    /// Aggregate tax only.
    pub fn total_tax(
        &self,
        income: Decimal,
    ) -> Decimal {
        self.calculate(income).total_tax
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn standard_total(income: Decimal) -> Decimal {
        ProgressiveTaxSchedule::standard().total_tax(income)
    }

    // =========================================================================
    // fixed schedule amounts
    // =========================================================================

    #[test]
    fn zero_income_owes_nothing() {
        assert_eq!(standard_total(dec!(0)), dec!(0));
    }

    #[test]
    fn first_bracket_boundary_owes_nothing() {
        assert_eq!(standard_total(dec!(150000)), dec!(0));
    }

    #[test]
    fn middle_of_second_bracket() {
        assert_eq!(standard_total(dec!(300000)), dec!(15000));
    }

    #[test]
    fn boundary_of_second_bracket() {
        assert_eq!(standard_total(dec!(500000)), dec!(35000));
    }

    #[test]
    fn above_all_brackets() {
        assert_eq!(standard_total(dec!(2500000)), dec!(485000));
    }

    #[test]
    fn one_cent_over_first_boundary_rounds_slice() {
        // 0.01 * 10% = 0.001 rounds away to zero cents.
        assert_eq!(standard_total(dec!(150000.01)), dec!(0.00));
        // 0.05 * 10% = 0.005 rounds up to one cent.
        assert_eq!(standard_total(dec!(150000.05)), dec!(0.01));
    }

    #[test]
    fn income_at_or_below_first_bound_is_always_zero() {
        let mut income = dec!(0);
        while income <= dec!(150000) {
            assert_eq!(standard_total(income), dec!(0), "income {income}");
            income += dec!(2500);
        }
    }

    // =========================================================================
    // breakdown
    // =========================================================================

    #[test]
    fn breakdown_labels_follow_schedule_order() {
        let result = ProgressiveTaxSchedule::standard().calculate(dec!(0));

        let labels: Vec<_> = result.tax_levels.iter().map(|l| l.level.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "0-150,000",
                "150,001-500,000",
                "500,001-1,000,000",
                "1,000,001-2,000,000",
                "2,000,001 and above",
            ]
        );
    }

    #[test]
    fn breakdown_fills_consumed_brackets_and_zeroes_the_rest() {
        let result = ProgressiveTaxSchedule::standard().calculate(dec!(690000));

        let taxes: Vec<_> = result.tax_levels.iter().map(|l| l.tax).collect();
        assert_eq!(
            taxes,
            vec![dec!(0), dec!(35000), dec!(28500), dec!(0), dec!(0)]
        );
        assert_eq!(result.total_tax, dec!(63500));
    }

    #[test]
    fn breakdown_for_top_bracket_income() {
        let result = ProgressiveTaxSchedule::standard().calculate(dec!(2500000));

        let taxes: Vec<_> = result.tax_levels.iter().map(|l| l.tax).collect();
        assert_eq!(
            taxes,
            vec![
                dec!(0),
                dec!(35000),
                dec!(75000),
                dec!(200000),
                dec!(175000)
            ]
        );
    }

    #[test]
    fn breakdown_sum_equals_total() {
        for income in [
            dec!(0),
            dec!(150000.05),
            dec!(499999.99),
            dec!(1000000),
            dec!(1234567.89),
            dec!(9999999.99),
        ] {
            let result = ProgressiveTaxSchedule::standard().calculate(income);
            let sum: Decimal = result.tax_levels.iter().map(|l| l.tax).sum();

            assert_eq!(sum, result.total_tax, "income {income}");
            assert_eq!(
                result.total_tax,
                standard_total(income),
                "income {income}"
            );
        }
    }

    // =========================================================================
    // properties
    // =========================================================================

    #[test]
    fn tax_is_non_decreasing_in_income() {
        let mut previous = Decimal::ZERO;
        let mut income = dec!(0);
        while income <= dec!(3000000) {
            let tax = standard_total(income);
            assert!(tax >= previous, "tax fell at income {income}");
            previous = tax;
            income += dec!(12345.67);
        }
    }

    #[test]
    fn calculate_is_repeatable() {
        let schedule = ProgressiveTaxSchedule::standard();

        assert_eq!(
            schedule.calculate(dec!(1750000.25)),
            schedule.calculate(dec!(1750000.25))
        );
    }

    // =========================================================================
    // rounding
    // =========================================================================

    #[test]
    fn each_slice_is_rounded_before_summing() {
        // Two slices of 1.005 each: rounding per slice gives 1.01 + 1.01,
        // rounding only the total would give 2.01.
        let brackets = [
            TaxBracket {
                upper_bound: Some(dec!(10.05)),
                rate: dec!(0.1),
                label: "low",
            },
            TaxBracket {
                upper_bound: None,
                rate: dec!(0.1),
                label: "high",
            },
        ];
        let result = ProgressiveTaxSchedule::new(&brackets).calculate(dec!(20.10));

        assert_eq!(result.tax_levels[0].tax, dec!(1.01));
        assert_eq!(result.tax_levels[1].tax, dec!(1.01));
        assert_eq!(result.total_tax, dec!(2.02));
    }

    #[test]
    fn custom_schedule_stops_at_matching_bracket() {
        let brackets = [
            TaxBracket {
                upper_bound: Some(dec!(100)),
                rate: dec!(0.5),
                label: "a",
            },
            TaxBracket {
                upper_bound: Some(dec!(200)),
                rate: dec!(0.25),
                label: "b",
            },
            TaxBracket {
                upper_bound: None,
                rate: dec!(1),
                label: "c",
            },
        ];
        let result = ProgressiveTaxSchedule::new(&brackets).calculate(dec!(200));

        assert_eq!(result.total_tax, dec!(75));
        assert_eq!(result.tax_levels[2].tax, dec!(0));
    }
}
