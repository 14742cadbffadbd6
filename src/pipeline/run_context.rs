use anyhow::{Context, Result};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::Registry;
use uuid::Uuid;

use crate::config::PipelineConfig;
use crate::report::ReportWriter;
use crate::storage::OutputPaths;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Pending,
    Loaded,
    Validated,
    Cleaned,
    Exported,
    Reported,
    Failed,
}

/// Per-run state handed to every stage: configuration, artifact paths, the
/// report buffer and the log sink. Nothing here is process-global.
pub struct RunContext {
    pub run_id: Uuid,
    pub input: PathBuf,
    pub config: PipelineConfig,
    pub paths: OutputPaths,
    pub report: ReportWriter,
    pub stage: PipelineStage,
    log_file: Arc<File>,
}

impl RunContext {
    /// Resolves the artifact paths and opens (truncating) the run log.
    pub fn open(config: PipelineConfig, input: &Path) -> Result<Self> {
        let paths = OutputPaths::for_input(&config, input);

        OutputPaths::ensure_parent(&paths.log)?;
        let log_file = File::create(&paths.log)
            .with_context(|| format!("Failed to create log file: {}", paths.log.display()))?;

        Ok(Self {
            run_id: Uuid::new_v4(),
            input: input.to_path_buf(),
            config,
            paths,
            report: ReportWriter::new(),
            stage: PipelineStage::Pending,
            log_file: Arc::new(log_file),
        })
    }

    /// Subscriber writing plain-text events to the run log and to stderr.
    /// Install it with `tracing::subscriber::with_default` for the run.
    pub fn subscriber(&self) -> Result<impl tracing::Subscriber + Send + Sync + 'static> {
        let level = self.config.level_filter()?;

        let file_layer = fmt::layer()
            .with_writer(self.log_file.clone())
            .with_ansi(false)
            .with_target(false);
        let console_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

        Ok(Registry::default()
            .with(file_layer)
            .with(console_layer)
            .with(level))
    }

    pub fn advance(&mut self, stage: PipelineStage) {
        info!("Pipeline stage {:?} -> {:?}", self.stage, stage);
        self.stage = stage;
    }

    /// Persists the report text and flushes the log. Runs on success and
    /// failure alike.
    pub fn finish(&self) -> Result<()> {
        info!("'end process csv file' started.");
        self.report.persist(&self.paths.report)?;
        info!("'end process csv file' completed.");

        self.log_file
            .sync_all()
            .with_context(|| format!("Failed to flush log file: {}", self.paths.log.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_config() -> (PipelineConfig, PathBuf) {
        let dir = std::env::temp_dir().join(Uuid::new_v4().to_string());
        let mut config = PipelineConfig::default();
        config.output_root = dir.clone();
        (config, dir)
    }

    #[test]
    fn test_open_creates_log() {
        let (config, dir) = scratch_config();
        let ctx = RunContext::open(config, Path::new("games.csv")).unwrap();

        assert!(dir.join("log").join("games.log").is_file());
        assert_eq!(ctx.stage, PipelineStage::Pending);

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_scoped_subscriber_writes_log_and_report() {
        let (config, dir) = scratch_config();
        let mut ctx = RunContext::open(config, Path::new("games.csv")).unwrap();
        let subscriber = ctx.subscriber().unwrap();

        tracing::subscriber::with_default(subscriber, || {
            info!("'unit' started.");
            ctx.advance(PipelineStage::Loaded);
            ctx.report.line("The total games made is: 0");
            ctx.finish().unwrap();
        });

        let log = fs::read_to_string(dir.join("log").join("games.log")).unwrap();
        assert!(log.contains("'unit' started."));
        assert!(log.contains("Pending -> Loaded"));

        let report = fs::read_to_string(dir.join("txt").join("games.txt")).unwrap();
        assert_eq!(report, "The total games made is: 0\n");

        fs::remove_dir_all(dir).ok();
    }
}
