use std::path::PathBuf;

/// Failures that end a pipeline run. Row-level problems never show up here,
/// they become missing values and are dropped by the cleaner.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("csv file '{}' not found", path.display())]
    InputNotFound { path: PathBuf },
    #[error("Missing required column(s): {}", missing.join(", "))]
    MissingColumns { missing: Vec<String> },
    #[error(transparent)]
    Unhandled(#[from] anyhow::Error),
}

impl PipelineError {
    /// Short name logged alongside the message.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::InputNotFound { .. } => "InputNotFound",
            PipelineError::MissingColumns { .. } => "MissingColumns",
            PipelineError::Unhandled(_) => "Unhandled",
        }
    }

    pub fn exit_code(&self) -> u8 {
        1
    }
}
