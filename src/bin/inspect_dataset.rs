use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

#[path = "../config/mod.rs"]
mod config;

#[path = "../error.rs"]
mod error;

#[path = "../models/mod.rs"]
mod models;

#[path = "../storage/mod.rs"]
mod storage;

#[path = "../processor/column_validator.rs"]
mod column_validator;

use column_validator::ColumnValidator;
use models::REQUIRED_COLUMNS;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("Usage: inspect_dataset <file.csv>")?;

    storage::check_input_file(&path)?;
    let df = storage::load_csv(&path)?;

    println!("=== DATASET INFO ===\n");
    println!("File: {}", path.display());
    println!("{} rows x {} columns\n", df.height(), df.width());

    println!("{:<24} {:>10} {:>10}", "Column", "Non-null", "Distinct");
    for column in df.get_columns() {
        let non_null = column.len() - column.null_count();
        let distinct = column.n_unique()?;
        println!("{:<24} {:>10} {:>10}", column.name().as_str(), non_null, distinct);
    }

    println!("\n=== REQUIRED COLUMNS ===\n");
    let missing = ColumnValidator::new(REQUIRED_COLUMNS).missing_columns(&df);
    if missing.is_empty() {
        println!("✅ All {} required columns present", REQUIRED_COLUMNS.len());
    } else {
        println!("❌ Missing required column(s): {}", missing.join(", "));
    }

    println!("\n=== FIRST 5 ROWS ===\n");
    println!("{}", df.head(Some(5)));

    Ok(())
}
