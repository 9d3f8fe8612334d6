//! JSON request and response bodies.
//!
//! Amounts travel as JSON numbers.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tax_core::{Allowance, AllowanceKind, BatchTaxResult, TaxComputation, TaxLevel};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxCalculationRequest {
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub total_income: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub wht: Option<Decimal>,
    #[serde(default)]
    pub allowances: Vec<AllowanceRequest>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowanceRequest {
    pub allowance_type: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidTaxRequest {
    pub total_income: Decimal,
    pub wht: Decimal,
    pub allowances: Vec<Allowance>,
}

impl TaxCalculationRequest {
    /// Checks the request and returns every problem found, in field order.
    pub fn validate(self) -> Result<ValidTaxRequest, Vec<String>> {
        let mut errors = Vec::new();

        match self.total_income {
            None => errors.push("TotalIncome is required".to_string()),
            Some(income) if income < Decimal::ZERO => {
                errors.push("TotalIncome must be non-negative".to_string())
            }
            Some(_) => {}
        }

        match (self.wht, self.total_income) {
            (None, _) => errors.push("WHT is required".to_string()),
            (Some(wht), _) if wht < Decimal::ZERO => {
                errors.push("WHT must be non-negative".to_string())
            }
            (Some(wht), Some(income)) if wht > income => {
                errors.push("WHT cannot be greater than TotalIncome".to_string())
            }
            _ => {}
        }

        let mut allowances = Vec::with_capacity(self.allowances.len());
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for allowance in &self.allowances {
            let name = allowance.allowance_type.as_str();
            let kind = AllowanceKind::parse(name);
            if kind.is_none() {
                errors.push(format!(
                    "Invalid allowance type: {}. Allowed types are 'donation' and 'k-receipt'.",
                    name
                ));
            }
            if allowance.amount < Decimal::ZERO {
                errors.push(format!("Amount for {} must be non-negative", name));
            }
            let count = seen.entry(name).or_default();
            *count += 1;
            if *count == 2 {
                errors.push(format!("Only one {} allowance can be included", name));
            }
            if let Some(kind) = kind {
                allowances.push(Allowance::new(kind, allowance.amount));
            }
        }

        match (self.total_income, self.wht) {
            (Some(total_income), Some(wht)) if errors.is_empty() => Ok(ValidTaxRequest {
                total_income,
                wht,
                allowances,
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxLevelResponse {
    pub level: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,
}

impl From<TaxLevel> for TaxLevelResponse {
    fn from(level: TaxLevel) -> Self {
        Self {
            level: level.level,
            tax: level.tax,
        }
    }
}

/// Net tax or refund with the per-bracket breakdown. Exactly one of `tax`
/// and `taxRefund` is present.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxCalculationResponse {
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub tax: Option<Decimal>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub tax_refund: Option<Decimal>,
    pub tax_level: Vec<TaxLevelResponse>,
}

impl From<TaxComputation> for TaxCalculationResponse {
    fn from(computation: TaxComputation) -> Self {
        let (tax, tax_refund) = if computation.net.is_refund() {
            (None, Some(computation.net.refund))
        } else {
            (Some(computation.net.tax), None)
        };
        Self {
            tax,
            tax_refund,
            tax_level: computation
                .tax_levels
                .into_iter()
                .map(TaxLevelResponse::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvTaxResponse {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_income: Decimal,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub tax: Option<Decimal>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub tax_refund: Option<Decimal>,
}

impl From<BatchTaxResult> for CsvTaxResponse {
    fn from(result: BatchTaxResult) -> Self {
        let (tax, tax_refund) = if result.net.is_refund() {
            (None, Some(result.net.refund))
        } else {
            (Some(result.net.tax), None)
        };
        Self {
            total_income: result.total_income,
            tax,
            tax_refund,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CsvResponse {
    pub taxes: Vec<CsvTaxResponse>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AmountRequest {
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalDeductionResponse {
    #[serde(with = "rust_decimal::serde::float")]
    pub personal_deduction: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KReceiptResponse {
    #[serde(with = "rust_decimal::serde::float")]
    pub k_receipt: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
