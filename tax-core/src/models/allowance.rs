use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The two allowance categories a taxpayer can claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AllowanceKind {
    Donation,
    KReceipt,
}

impl AllowanceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Donation => "donation",
            Self::KReceipt => "k-receipt",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "donation" => Some(Self::Donation),
            "k-receipt" => Some(Self::KReceipt),
            _ => None,
        }
    }
}

/// A single claimed allowance. Amounts are capped during deduction resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allowance {
    pub kind: AllowanceKind,
    pub amount: Decimal,
}

impl Allowance {
    pub fn new(
        kind: AllowanceKind,
        amount: Decimal,
    ) -> Self {
        Self { kind, amount }
    }

    pub fn donation(amount: Decimal) -> Self {
        Self::new(AllowanceKind::Donation, amount)
    }

    pub fn k_receipt(amount: Decimal) -> Self {
        Self::new(AllowanceKind::KReceipt, amount)
    }
}

/// Allowances expressed as the two fixed categories, as they arrive from a
/// CSV batch row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionClaims {
    pub donation: Decimal,
    pub k_receipt: Decimal,
}

impl DeductionClaims {
    pub fn new(
        donation: Decimal,
        k_receipt: Decimal,
    ) -> Self {
        Self {
            donation,
            k_receipt,
        }
    }

    /// The claims as an allowance list, donation first.
    pub fn allowances(&self) -> [Allowance; 2] {
        [
            Allowance::donation(self.donation),
            Allowance::k_receipt(self.k_receipt),
        ]
    }
}
