use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tax_core::TaxService;
use tax_data::BatchCsvLoader;
use tax_db_sqlite::SqliteRepository;

/// Compute tax for every record in a CSV file.
///
/// The CSV file must have a `totalIncome` column and may also have `wht`,
/// `donation` and `k-receipt` columns. Header case is ignored.
#[derive(Parser, Debug)]
#[command(name = "tax-batch")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing tax records
    #[arg(short, long)]
    file: PathBuf,

    /// SQLite database URL holding the deduction configuration
    #[arg(
        short,
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:tax.db?mode=rwc"
    )]
    database: String,

    /// Run database migrations before computing
    #[arg(short, long, default_value_t = false)]
    migrate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let repo = SqliteRepository::new(&args.database)
        .await
        .with_context(|| format!("Failed to connect to database: {}", args.database))?;

    if args.migrate {
        println!("Running migrations...");
        repo.run_migrations()
            .await
            .context("Failed to run migrations")?;
        println!("Migrations complete.");
    }

    repo.ensure_default_config()
        .await
        .context("Failed to prepare deduction config")?;

    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open: {}", args.file.display()))?;

    let records = BatchCsvLoader::load(file)
        .with_context(|| format!("Failed to read CSV: {}", args.file.display()))?;

    println!("Parsed {} records from CSV", records.len());

    let service = TaxService::new(Arc::new(repo));
    let results = service
        .calculate_tax_batch(&records)
        .await
        .context("Failed to calculate taxes")?;

    for (i, result) in results.iter().enumerate() {
        if result.net.is_refund() {
            println!(
                "{:>4}  totalIncome={}  taxRefund={}",
                i + 1,
                result.total_income,
                result.net.refund
            );
        } else {
            println!(
                "{:>4}  totalIncome={}  tax={}",
                i + 1,
                result.total_income,
                result.net.tax
            );
        }
    }

    Ok(())
}
