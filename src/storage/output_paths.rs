use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::PipelineConfig;

/// Artifact locations for one input file, sorted into per-kind folders
/// under the configured output root.
#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub stem: String,
    pub log: PathBuf,
    pub report: PathBuf,
    pub cleaned_csv: PathBuf,
    pub cleaned_json: PathBuf,
    png_dir: PathBuf,
}

impl OutputPaths {
    pub fn for_input(config: &PipelineConfig, input: &Path) -> Self {
        let stem = input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "dataset".to_string());
        let root = &config.output_root;

        Self {
            log: root.join("log").join(format!("{}.log", stem)),
            report: root.join("txt").join(format!("{}.txt", stem)),
            cleaned_csv: root.join("csv").join(format!("{}_cleaned.csv", stem)),
            cleaned_json: root.join("json").join(format!("{}_cleaned.json", stem)),
            png_dir: root.join("png"),
            stem,
        }
    }

    /// `png/<stem>_<suffix>.png`
    pub fn chart(&self, suffix: &str) -> PathBuf {
        self.png_dir.join(format!("{}_{}.png", self.stem, suffix))
    }

    pub fn ensure_parent(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
        }
        Ok(())
    }
}
