use polars::prelude::*;
use tracing::{info, warn};

use crate::error::PipelineError;

pub struct ColumnValidator {
    required_columns: Vec<String>,
}

impl ColumnValidator {
    pub fn new<I, S>(required_columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required_columns: required_columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Required columns absent from `df`, in declaration order.
    pub fn missing_columns(&self, df: &DataFrame) -> Vec<String> {
        self.required_columns
            .iter()
            .filter(|column| df.column(column.as_str()).is_err())
            .cloned()
            .collect()
    }

    pub fn validate(&self, df: &DataFrame) -> Result<(), PipelineError> {
        info!("'columns validation' started.");

        let missing = self.missing_columns(df);
        if !missing.is_empty() {
            warn!("Missing required column(s): {}", missing.join(", "));
            return Err(PipelineError::MissingColumns { missing });
        }

        info!("'columns validation' completed.");
        Ok(())
    }
}
