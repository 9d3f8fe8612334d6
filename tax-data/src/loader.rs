use std::io::Read;

use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::BatchTaxRecord;
use thiserror::Error;
use tracing::debug;

/// Column names accepted in a batch upload, after lowercasing.
pub const TOTAL_INCOME_COLUMN: &str = "totalincome";
pub const ALLOWED_COLUMNS: [&str; 4] = [TOTAL_INCOME_COLUMN, "wht", "donation", "k-receipt"];

/// Errors that can occur when reading a batch of tax records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchCsvError {
    #[error("CSV file does not contain 'totalincome' header")]
    MissingTotalIncomeHeader,

    /// The offending header is kept for logging; the message stays generic.
    #[error("Invalid CSV file")]
    UnexpectedHeader(String),

    #[error("Invalid CSV file: Record {record}: {message}")]
    InvalidRecord { record: usize, message: String },

    #[error("Failed to read CSV file: {0}")]
    Read(String),

    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

impl BatchCsvError {
    fn invalid_record(
        record: usize,
        err: csv::Error,
    ) -> Self {
        let message = match err.kind() {
            csv::ErrorKind::Deserialize { err, .. } => err.to_string(),
            _ => err.to_string(),
        };
        BatchCsvError::InvalidRecord { record, message }
    }
}

/// One CSV row, with columns matched against lowercased headers.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "totalincome", deserialize_with = "deserialize_amount")]
    total_income: Decimal,
    #[serde(default, deserialize_with = "deserialize_blank_as_zero")]
    wht: Decimal,
    #[serde(default, deserialize_with = "deserialize_blank_as_zero")]
    donation: Decimal,
    #[serde(
        default,
        rename = "k-receipt",
        deserialize_with = "deserialize_blank_as_zero"
    )]
    k_receipt: Decimal,
}

impl From<CsvRow> for BatchTaxRecord {
    fn from(row: CsvRow) -> Self {
        BatchTaxRecord {
            total_income: row.total_income,
            wht: row.wht,
            donation: row.donation,
            k_receipt: row.k_receipt,
        }
    }
}

fn parse_amount<E: serde::de::Error>(value: &str) -> Result<Decimal, E> {
    value
        .trim()
        .parse::<Decimal>()
        .map_err(|e| E::custom(format!("'{}' is not a number: {}", value, e)))
}

fn deserialize_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_amount(&s)
}

fn deserialize_blank_as_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    if s.trim().is_empty() {
        return Ok(Decimal::ZERO);
    }
    parse_amount(&s)
}

/// Lowercases and trims every header, then checks the column set.
fn normalize_headers(headers: &StringRecord) -> Result<StringRecord, BatchCsvError> {
    let normalized: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();

    if !normalized.iter().any(|h| h == TOTAL_INCOME_COLUMN) {
        return Err(BatchCsvError::MissingTotalIncomeHeader);
    }

    if let Some(unexpected) = normalized
        .iter()
        .find(|h| !ALLOWED_COLUMNS.contains(&h.as_str()))
    {
        return Err(BatchCsvError::UnexpectedHeader(unexpected.clone()));
    }

    Ok(StringRecord::from(normalized))
}

/// Checks every record and reports all violations together.
///
/// Records are numbered from 1 in the messages.
pub fn validate_records(records: &[BatchTaxRecord]) -> Result<(), BatchCsvError> {
    let mut errors = Vec::new();

    for (i, record) in records.iter().enumerate() {
        let n = i + 1;
        if record.total_income < Decimal::ZERO {
            errors.push(format!("Record {}: TotalIncome must be non-negative", n));
        }
        if record.wht < Decimal::ZERO {
            errors.push(format!("Record {}: WHT must be non-negative", n));
        }
        if record.donation < Decimal::ZERO {
            errors.push(format!("Record {}: Donation must be non-negative", n));
        }
        if record.k_receipt < Decimal::ZERO {
            errors.push(format!("Record {}: KReceipt must be non-negative", n));
        }
        if record.wht > record.total_income {
            errors.push(format!(
                "Record {}: WHT cannot be greater than TotalIncome",
                n
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(BatchCsvError::Validation(errors))
    }
}

/// Reader for batch tax CSV uploads.
///
/// Headers are matched case-insensitively. `totalincome` is required;
/// `wht`, `donation` and `k-receipt` are optional and default to zero.
pub struct BatchCsvLoader;

impl BatchCsvLoader {
    /// Parse records from a CSV reader without range validation.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BatchTaxRecord>, BatchCsvError> {
        let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| BatchCsvError::Read(e.to_string()))?
            .clone();
        csv_reader.set_headers(normalize_headers(&headers)?);

        let mut records = Vec::new();
        for (i, result) in csv_reader.deserialize::<CsvRow>().enumerate() {
            let row = result.map_err(|e| BatchCsvError::invalid_record(i + 1, e))?;
            records.push(row.into());
        }

        debug!(records = records.len(), "parsed batch csv");
        Ok(records)
    }

    /// Parse and validate. Any malformed or out-of-range record rejects the
    /// whole batch.
    pub fn load<R: Read>(reader: R) -> Result<Vec<BatchTaxRecord>, BatchCsvError> {
        let records = Self::parse(reader)?;
        validate_records(&records)?;
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn record(
        total_income: Decimal,
        wht: Decimal,
        donation: Decimal,
        k_receipt: Decimal,
    ) -> BatchTaxRecord {
        BatchTaxRecord {
            total_income,
            wht,
            donation,
            k_receipt,
        }
    }

    // ==================== headers ====================

    #[test]
    fn test_parse_mixed_case_headers() {
        let csv = "TotalIncome, WHT ,Donation\n500000,0,0\n600000,40000,20000";

        let records = BatchCsvLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(
            records,
            vec![
                record(dec!(500000), dec!(0), dec!(0), dec!(0)),
                record(dec!(600000), dec!(40000), dec!(20000), dec!(0)),
            ]
        );
    }

    #[test]
    fn test_parse_columns_in_any_order() {
        let csv = "k-receipt,totalIncome\n200000,900000";

        let records = BatchCsvLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records, vec![record(dec!(900000), dec!(0), dec!(0), dec!(200000))]);
    }

    #[test]
    fn test_parse_missing_total_income_header() {
        let csv = "wht,donation\n0,0";

        assert_eq!(
            BatchCsvLoader::parse(csv.as_bytes()),
            Err(BatchCsvError::MissingTotalIncomeHeader)
        );
    }

    #[test]
    fn test_parse_empty_input_has_no_total_income_header() {
        assert_eq!(
            BatchCsvLoader::parse("".as_bytes()),
            Err(BatchCsvError::MissingTotalIncomeHeader)
        );
    }

    #[test]
    fn test_parse_unexpected_header() {
        let csv = "totalIncome,bonus\n500000,1";

        let err = BatchCsvLoader::parse(csv.as_bytes()).unwrap_err();

        assert_eq!(err, BatchCsvError::UnexpectedHeader("bonus".to_string()));
        assert_eq!(err.to_string(), "Invalid CSV file");
    }

    // ==================== values ====================

    #[test]
    fn test_parse_header_only_yields_no_records() {
        let records = BatchCsvLoader::parse("totalIncome,wht\n".as_bytes())
            .expect("Failed to parse CSV");

        assert!(records.is_empty());
    }

    #[test]
    fn test_parse_decimal_cents() {
        let csv = "totalIncome,wht\n750000.55,1234.5";

        let records = BatchCsvLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records[0].total_income, dec!(750000.55));
        assert_eq!(records[0].wht, dec!(1234.5));
    }

    #[test]
    fn test_parse_blank_optional_cell_is_zero() {
        let csv = "totalIncome,wht,donation\n500000,,100";

        let records = BatchCsvLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records[0].wht, dec!(0));
        assert_eq!(records[0].donation, dec!(100));
    }

    #[test]
    fn test_parse_non_numeric_cell_names_record() {
        let csv = "totalIncome,wht\n500000,0\nabc,0";

        match BatchCsvLoader::parse(csv.as_bytes()) {
            Err(BatchCsvError::InvalidRecord { record, message }) => {
                assert_eq!(record, 2);
                assert!(message.contains("abc"), "{message}");
            }
            other => panic!("expected InvalidRecord, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_blank_total_income_is_invalid() {
        let csv = "totalIncome,wht\n,0";

        assert!(matches!(
            BatchCsvLoader::parse(csv.as_bytes()),
            Err(BatchCsvError::InvalidRecord { record: 1, .. })
        ));
    }

    #[test]
    fn test_parse_short_row_is_invalid() {
        let csv = "totalIncome,wht\n500000";

        assert!(matches!(
            BatchCsvLoader::parse(csv.as_bytes()),
            Err(BatchCsvError::InvalidRecord { record: 1, .. })
        ));
    }

    // ==================== validation ====================

    #[test]
    fn test_validate_accepts_wht_equal_to_income() {
        let records = [record(dec!(1000), dec!(1000), dec!(0), dec!(0))];

        assert_eq!(validate_records(&records), Ok(()));
    }

    #[test]
    fn test_validate_collects_every_violation() {
        let records = [
            record(dec!(500000), dec!(0), dec!(0), dec!(0)),
            record(dec!(-1), dec!(0), dec!(-5), dec!(0)),
            record(dec!(100), dec!(200), dec!(0), dec!(-1)),
        ];

        let err = validate_records(&records).unwrap_err();

        assert_eq!(
            err,
            BatchCsvError::Validation(vec![
                "Record 2: TotalIncome must be non-negative".to_string(),
                "Record 2: Donation must be non-negative".to_string(),
                "Record 2: WHT cannot be greater than TotalIncome".to_string(),
                "Record 3: KReceipt must be non-negative".to_string(),
                "Record 3: WHT cannot be greater than TotalIncome".to_string(),
            ])
        );
        assert!(
            err.to_string().starts_with(
                "validation errors: Record 2: TotalIncome must be non-negative; Record 2:"
            )
        );
    }

    #[test]
    fn test_load_rejects_whole_batch_on_one_bad_record() {
        let csv = "totalIncome,wht\n500000,0\n1000,2000";

        assert_eq!(
            BatchCsvLoader::load(csv.as_bytes()),
            Err(BatchCsvError::Validation(vec![
                "Record 2: WHT cannot be greater than TotalIncome".to_string()
            ]))
        );
    }
}
