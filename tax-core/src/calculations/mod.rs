//! Personal income tax calculations.
//!
//! The pipeline is deduction resolution, then the progressive schedule on the
//! income left over, then the withholding offset.

pub mod common;
pub mod deduction;
pub mod net;
pub mod progressive;

pub use deduction::{capped_allowance, resolve_claims, resolve_deduction};
pub use net::derive_net;
pub use progressive::{ProgressiveTaxResult, ProgressiveTaxSchedule};
