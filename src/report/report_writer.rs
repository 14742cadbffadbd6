use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::models::FrequencyReport;

/// Collects the human-readable analysis text of a run and persists it once
/// at the end, whatever the outcome of the run.
#[derive(Debug, Default)]
pub struct ReportWriter {
    lines: Vec<String>,
}

impl ReportWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Writes `label` followed by one aligned `value    count` line per entry.
    pub fn table<'a, I>(&mut self, label: &str, rows: I)
    where
        I: IntoIterator<Item = (&'a str, usize)>,
    {
        let rows: Vec<(&str, usize)> = rows.into_iter().collect();
        let width = rows.iter().map(|(value, _)| value.chars().count()).max().unwrap_or(0);

        self.line(label);
        for (value, count) in rows {
            self.line(format!("{:<width$}    {}", value, count, width = width));
        }
    }

    /// Count table plus most/least common sentences for one dimension.
    pub fn frequency(&mut self, label: &str, report: &FrequencyReport) {
        self.table(&format!("Games by {}:", label), report.counts());
        self.line(format!(
            "The most common {} is: {}",
            label,
            report.mode().unwrap_or("none")
        ));
        self.line(format!(
            "The least common {} is: {}",
            label,
            report.anti_mode().unwrap_or("none")
        ));
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn contents(&self) -> String {
        let mut text = self.lines.join("\n");
        if !text.is_empty() {
            text.push('\n');
        }
        text
    }

    pub fn persist(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create report directory: {}", parent.display()))?;
        }
        fs::write(path, self.contents())
            .with_context(|| format!("Failed to write report: {}", path.display()))
    }
}
