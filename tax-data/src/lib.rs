//! CSV input for batch tax computation.

pub mod loader;

pub use loader::{ALLOWED_COLUMNS, BatchCsvError, BatchCsvLoader, validate_records};
