use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// One slice of the progressive schedule.
///
/// `upper_bound` of `None` marks the open-ended top bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaxBracket {
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
    pub label: &'static str,
}

/// The personal income tax schedule, ordered by ascending upper bound.
pub const PROGRESSIVE_TAX_BRACKETS: [TaxBracket; 5] = [
    TaxBracket {
        upper_bound: Some(dec!(150000)),
        rate: dec!(0.00),
        label: "0-150,000",
    },
    TaxBracket {
        upper_bound: Some(dec!(500000)),
        rate: dec!(0.10),
        label: "150,001-500,000",
    },
    TaxBracket {
        upper_bound: Some(dec!(1000000)),
        rate: dec!(0.15),
        label: "500,001-1,000,000",
    },
    TaxBracket {
        upper_bound: Some(dec!(2000000)),
        rate: dec!(0.20),
        label: "1,000,001-2,000,000",
    },
    TaxBracket {
        upper_bound: None,
        rate: dec!(0.35),
        label: "2,000,001 and above",
    },
];
