use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;

pub const DEFAULT_CONFIG_FILE: &str = "video_games.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfigFile {
    pub pipeline: Option<PipelineSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineSection {
    pub output_root: Option<PathBuf>,
    pub charts: Option<bool>,
    pub top_n: Option<usize>,
    pub log_level: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory under which the per-kind artifact folders are created.
    pub output_root: PathBuf,
    pub charts: bool,
    /// Bars per panel on the top/bottom charts.
    pub top_n: usize,
    pub log_level: String,
}

impl PipelineConfig {
    /// Loads `path` when it exists, falls back to defaults otherwise, then
    /// applies `VG_*` environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read pipeline config file: {}", path.display()))?;

        let config_file: PipelineConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse pipeline config file: {}", path.display()))?;

        Ok(Self::from_section(config_file.pipeline.unwrap_or_default()))
    }

    fn from_section(section: PipelineSection) -> Self {
        let defaults = Self::default();
        Self {
            output_root: section.output_root.unwrap_or(defaults.output_root),
            charts: section.charts.unwrap_or(defaults.charts),
            top_n: section.top_n.unwrap_or(defaults.top_n),
            log_level: section.log_level.unwrap_or(defaults.log_level),
        }
    }

    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(root) = env::var("VG_OUTPUT_ROOT") {
            self.output_root = PathBuf::from(root);
        }

        if let Ok(charts) = env::var("VG_CHARTS") {
            self.charts = charts
                .trim()
                .parse()
                .with_context(|| format!("Invalid VG_CHARTS value: {}", charts))?;
        }

        if let Ok(top_n) = env::var("VG_TOP_N") {
            self.top_n = top_n
                .trim()
                .parse()
                .with_context(|| format!("Invalid VG_TOP_N value: {}", top_n))?;
        }

        if let Ok(level) = env::var("VG_LOG_LEVEL") {
            self.log_level = level;
        }

        Ok(())
    }

    pub fn level_filter(&self) -> Result<LevelFilter> {
        self.log_level
            .trim()
            .parse::<LevelFilter>()
            .map_err(|_| anyhow::anyhow!("Invalid log level: {}", self.log_level))
    }

    pub fn validate(&self) -> Result<()> {
        if self.output_root.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("Output root cannot be empty"));
        }

        if self.top_n == 0 {
            return Err(anyhow::anyhow!("top_n must be at least 1"));
        }

        self.level_filter()?;

        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("."),
            charts: true,
            top_n: 10,
            log_level: "info".to_string(),
        }
    }
}
