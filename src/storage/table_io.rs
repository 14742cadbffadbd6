use anyhow::{Context, Result, anyhow};
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::PipelineError;
use crate::storage::OutputPaths;

/// Fails with `InputNotFound` unless `path` is an existing file.
pub fn check_input_file(path: &Path) -> Result<(), PipelineError> {
    info!("'check csv file' started.");
    if !path.is_file() {
        return Err(PipelineError::InputNotFound {
            path: path.to_path_buf(),
        });
    }
    info!("'check csv file' completed.");
    Ok(())
}

/// Reads the CSV with every column kept as text; empty cells become nulls.
pub fn load_csv(path: &Path) -> Result<DataFrame> {
    info!("'start process csv file' {} started.", path.display());

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))
        .with_context(|| format!("Failed to open csv file: {}", path.display()))?
        .finish()
        .map_err(|e| anyhow!("Failed to read csv file {}: {}", path.display(), e))?;

    info!(
        "'start process csv file' completed: {} rows, {} columns.",
        df.height(),
        df.width()
    );
    Ok(df)
}

/// Writes the cleaned table as CSV with a header row.
pub fn export_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    info!("'export csv' started.");
    OutputPaths::ensure_parent(path)?;

    let mut file = File::create(path)
        .with_context(|| format!("Failed to create csv export: {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .map_err(|e| anyhow!("Polars CSV write error: {}", e))?;

    info!("'export csv' completed: {}", path.display());
    Ok(())
}

/// Writes the cleaned table as newline-delimited JSON, one object per row.
pub fn export_json_lines(df: &mut DataFrame, path: &Path) -> Result<()> {
    info!("'export json' started.");
    OutputPaths::ensure_parent(path)?;

    let mut file = File::create(path)
        .with_context(|| format!("Failed to create json export: {}", path.display()))?;
    JsonWriter::new(&mut file)
        .with_json_format(JsonFormat::JsonLines)
        .finish(df)
        .map_err(|e| anyhow!("Polars JSON write error: {}", e))?;

    info!("'export json' completed: {}", path.display());
    Ok(())
}
