use anyhow::Result;
use polars::prelude::*;
use tracing::info;

use crate::models::{Dimension, FrequencyReport, TITLE};
use crate::processor::ReleaseCalendar;
use crate::report::ReportWriter;

/// Everything the chart renderer needs from the cleaned table.
#[derive(Debug, Clone)]
pub struct AnalysisSummary {
    pub total_games: usize,
    pub dimensions: Vec<(Dimension, FrequencyReport)>,
    pub calendar: ReleaseCalendar,
}

impl AnalysisSummary {
    pub fn report_for(&self, dimension: Dimension) -> Option<&FrequencyReport> {
        self.dimensions
            .iter()
            .find(|(candidate, _)| *candidate == dimension)
            .map(|(_, report)| report)
    }
}

pub struct FrequencyAggregator;

impl FrequencyAggregator {
    pub fn total_games(&self, df: &DataFrame) -> Result<usize> {
        info!("'total games' started.");
        let column = df.column(TITLE)?;
        let total = column.len() - column.null_count();
        info!("'total games' completed.");
        Ok(total)
    }

    /// Counts each distinct non-null value of `column` in row order.
    pub fn count_by(&self, df: &DataFrame, column: &str) -> Result<FrequencyReport> {
        let values = df.column(column)?.str()?;
        Ok(FrequencyReport::from_values(column, values.into_iter().flatten()))
    }

    /// Runs every report over the cleaned table, writing the text sections
    /// as it goes.
    pub fn summarize(&self, df: &DataFrame, report: &mut ReportWriter) -> Result<AnalysisSummary> {
        let total_games = self.total_games(df)?;
        report.line(format!("The total games made is: {}", total_games));

        let mut dimensions = Vec::with_capacity(Dimension::ALL.len());
        for dimension in Dimension::ALL {
            let label = dimension.label();

            info!("'count {}' started.", label);
            let frequencies = self.count_by(df, dimension.column())?;
            report.frequency(label, &frequencies);
            info!(
                "'count {}' completed: {} value(s), {} distinct, most common {:?}, least common {:?}.",
                label,
                frequencies.total(),
                frequencies.distinct(),
                frequencies.mode(),
                frequencies.anti_mode()
            );

            dimensions.push((dimension, frequencies));
        }

        let calendar = ReleaseCalendar::from_frame(df)?;

        Ok(AnalysisSummary {
            total_games,
            dimensions,
            calendar,
        })
    }
}
