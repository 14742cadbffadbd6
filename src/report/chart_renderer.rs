use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use tracing::{info, warn};

use crate::models::{Dimension, FrequencyReport};
use crate::processor::{AnalysisSummary, MONTH_NAMES, ReleaseCalendar};
use crate::storage::OutputPaths;

const GRID: RGBColor = RGBColor(128, 128, 128);
const MAX_LABEL_CHARS: usize = 18;

/// Anchor colors of the viridis map, dark purple to yellow.
const VIRIDIS: [(u8, u8, u8); 5] = [
    (68, 1, 84),
    (59, 82, 139),
    (33, 145, 140),
    (94, 201, 98),
    (253, 231, 37),
];

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// `n` colors spread evenly along the viridis map.
pub fn viridis(n: usize) -> Vec<RGBColor> {
    let last = VIRIDIS.len() - 1;
    (0..n)
        .map(|i| {
            let t = if n <= 1 { 0.0 } else { i as f64 / (n - 1) as f64 };
            let scaled = t * last as f64;
            let lower = (scaled.floor() as usize).min(last);
            let upper = (lower + 1).min(last);
            let frac = scaled - lower as f64;
            let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;

            let (r0, g0, b0) = VIRIDIS[lower];
            let (r1, g1, b1) = VIRIDIS[upper];
            RGBColor(mix(r0, r1), mix(g0, g1), mix(b0, b1))
        })
        .collect()
}

/// Bar entries with labels shortened to fit under the axis.
pub fn bar_entries(rows: &[(&str, usize)]) -> Vec<(String, usize)> {
    rows.iter()
        .map(|(label, count)| {
            let label = if label.chars().count() > MAX_LABEL_CHARS {
                let mut short: String = label.chars().take(MAX_LABEL_CHARS - 1).collect();
                short.push('…');
                short
            } else {
                label.to_string()
            };
            (label, *count)
        })
        .collect()
}

/// Renders the dark-themed PNG charts for a finished analysis.
pub struct ChartRenderer {
    top_n: usize,
}

impl ChartRenderer {
    pub fn new(top_n: usize) -> Self {
        Self { top_n }
    }

    pub fn render_all(&self, summary: &AnalysisSummary, paths: &OutputPaths) -> Result<()> {
        self.release_year_chart(&summary.calendar, &paths.chart("release_date_year"))?;
        self.release_month_chart(&summary.calendar, &paths.chart("release_date_month"))?;

        for (dimension, report) in &summary.dimensions {
            let Some(suffix) = dimension.chart_suffix() else {
                continue;
            };
            let path = paths.chart(suffix);

            match dimension {
                Dimension::Developer => {
                    self.top_bottom_chart(report, "Developers", "Developer", &path)?
                }
                Dimension::Publisher => {
                    self.top_bottom_chart(report, "Publishers", "Publisher", &path)?
                }
                Dimension::Genre => self.top_bottom_chart(report, "Genre", "Genre", &path)?,
                Dimension::AgeRating => {
                    self.bar_chart(report, "Games by Age Rating", "Age Rating", &path)?
                }
                Dimension::Platform => {
                    self.bar_chart(report, "Games by Platform", "Platform", &path)?
                }
                Dimension::ReleaseDate => {}
            }
        }

        Ok(())
    }

    pub fn release_year_chart(&self, calendar: &ReleaseCalendar, path: &Path) -> Result<()> {
        info!("'release date year bar chart' started.");

        let years: Vec<(String, usize)> = calendar
            .by_year
            .iter()
            .map(|(year, count)| (year.to_string(), *count))
            .collect();

        if years.is_empty() {
            warn!("No parsable release dates, skipping {}", path.display());
            return Ok(());
        }

        OutputPaths::ensure_parent(path)?;
        let root = BitMapBackend::new(path, (1200, 600)).into_drawing_area();
        root.fill(&BLACK)?;
        draw_bars(&root, "Games Released by Year", "Year", &years)?;
        root.present()?;

        info!("'release date year bar chart' completed.");
        Ok(())
    }

    pub fn release_month_chart(&self, calendar: &ReleaseCalendar, path: &Path) -> Result<()> {
        info!("'release date month line chart' started.");

        if calendar.is_empty() {
            warn!("No parsable release dates, skipping {}", path.display());
            return Ok(());
        }

        let y_max = calendar
            .by_month
            .values()
            .flat_map(|months| months.values())
            .copied()
            .max()
            .unwrap_or(0) as u32;

        OutputPaths::ensure_parent(path)?;
        let root = BitMapBackend::new(path, (1200, 600)).into_drawing_area();
        root.fill(&BLACK)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                "Games Released by Month",
                ("sans-serif", 28).into_font().color(&WHITE),
            )
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(60)
            .build_cartesian_2d(1u32..12u32, 0u32..(y_max + y_max / 10 + 1))?;

        chart
            .configure_mesh()
            .light_line_style(GRID.mix(0.1))
            .bold_line_style(GRID.mix(0.3))
            .axis_style(WHITE)
            .label_style(("sans-serif", 14).into_font().color(&WHITE))
            .axis_desc_style(("sans-serif", 18).into_font().color(&WHITE))
            .x_desc("Month")
            .y_desc("Games")
            .x_labels(12)
            .x_label_formatter(&|month: &u32| {
                MONTH_NAMES
                    .get((*month as usize).saturating_sub(1))
                    .map(|name| name.to_string())
                    .unwrap_or_default()
            })
            .draw()?;

        let colors = viridis(calendar.by_month.len());
        for ((year, months), color) in calendar.by_month.iter().zip(colors) {
            let points: Vec<(u32, u32)> = months
                .iter()
                .map(|(month, count)| (*month, *count as u32))
                .collect();

            chart
                .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))?
                .label(year.to_string())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
            chart.draw_series(
                points
                    .into_iter()
                    .map(|point| Circle::new(point, 4, color.filled())),
            )?;
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&BLACK)
            .border_style(&WHITE)
            .label_font(("sans-serif", 14).into_font().color(&WHITE))
            .draw()?;
        root.present()?;

        info!("'release date month line chart' completed.");
        Ok(())
    }

    /// Two stacked panels: the `top_n` most and least frequent values.
    pub fn top_bottom_chart(
        &self,
        report: &FrequencyReport,
        noun: &str,
        x_label: &str,
        path: &Path,
    ) -> Result<()> {
        info!("'{} bar chart' started.", x_label.to_lowercase());

        if report.is_empty() {
            warn!("No {} values, skipping {}", x_label.to_lowercase(), path.display());
            return Ok(());
        }

        OutputPaths::ensure_parent(path)?;
        let root = BitMapBackend::new(path, (1200, 1200)).into_drawing_area();
        root.fill(&BLACK)?;

        let panels = root.split_evenly((2, 1));
        draw_bars(
            &panels[0],
            &format!("Top {} {}", self.top_n, noun),
            x_label,
            &bar_entries(&report.top(self.top_n)),
        )?;
        draw_bars(
            &panels[1],
            &format!("Bottom {} {}", self.top_n, noun),
            x_label,
            &bar_entries(&report.bottom(self.top_n)),
        )?;
        root.present()?;

        info!("'{} bar chart' completed.", x_label.to_lowercase());
        Ok(())
    }

    /// One bar per distinct value.
    pub fn bar_chart(
        &self,
        report: &FrequencyReport,
        title: &str,
        x_label: &str,
        path: &Path,
    ) -> Result<()> {
        info!("'{} bar chart' started.", x_label.to_lowercase());

        if report.is_empty() {
            warn!("No {} values, skipping {}", x_label.to_lowercase(), path.display());
            return Ok(());
        }

        OutputPaths::ensure_parent(path)?;
        let root = BitMapBackend::new(path, (1200, 600)).into_drawing_area();
        root.fill(&BLACK)?;
        draw_bars(&root, title, x_label, &bar_entries(&report.counts()))?;
        root.present()?;

        info!("'{} bar chart' completed.", x_label.to_lowercase());
        Ok(())
    }
}

fn draw_bars(area: &Area<'_>, title: &str, x_label: &str, bars: &[(String, usize)]) -> Result<()> {
    let y_max = bars.iter().map(|(_, count)| *count).max().unwrap_or(0) as u32;
    let slots = bars.len().max(1) as u32;

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 28).into_font().color(&WHITE))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d((0u32..slots).into_segmented(), 0u32..(y_max + y_max / 10 + 1))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .light_line_style(GRID.mix(0.1))
        .bold_line_style(GRID.mix(0.3))
        .axis_style(WHITE)
        .label_style(("sans-serif", 12).into_font().color(&WHITE))
        .axis_desc_style(("sans-serif", 18).into_font().color(&WHITE))
        .x_desc(x_label)
        .y_desc("Games")
        .x_labels(bars.len())
        .x_label_formatter(&|value: &SegmentValue<u32>| match value {
            SegmentValue::CenterOf(index) => bars
                .get(*index as usize)
                .map(|(label, _)| label.clone())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .draw()?;

    let colors = viridis(bars.len());
    chart.draw_series(bars.iter().zip(colors).enumerate().map(|(index, ((_, count), color))| {
        let x = index as u32;
        let mut bar = Rectangle::new(
            [
                (SegmentValue::Exact(x), 0),
                (SegmentValue::Exact(x + 1), *count as u32),
            ],
            color.filled(),
        );
        bar.set_margin(0, 0, 8, 8);
        bar
    }))?;

    chart.draw_series(bars.iter().enumerate().map(|(index, (_, count))| {
        Text::new(
            count.to_string(),
            (SegmentValue::CenterOf(index as u32), *count as u32),
            ("sans-serif", 12).into_font().color(&WHITE),
        )
    }))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::models::Dimension;
    use crate::processor::FrequencyAggregator;
    use crate::report::ReportWriter;
    use polars::prelude::*;
    use std::fs;

    const CHART_SUFFIXES: [&str; 7] = [
        "release_date_year",
        "release_date_month",
        "developer",
        "publisher",
        "genre",
        "age_rating",
        "platform",
    ];

    fn scratch_paths() -> (OutputPaths, std::path::PathBuf) {
        let dir = std::env::temp_dir().join(uuid::Uuid::new_v4().to_string());
        let mut config = PipelineConfig::default();
        config.output_root = dir.clone();
        (OutputPaths::for_input(&config, Path::new("games.csv")), dir)
    }

    #[test]
    fn test_render_all_writes_every_chart() {
        let df = df!(
            "Title" => ["Halo", "Zelda", "Doom"],
            "Release Date" => ["2001-11-15", "2017-03-03", "2016-05-13"],
            "Developer" => ["Bungie", "Nintendo", "id Software"],
            "Publisher" => ["Microsoft", "Nintendo", "Bethesda"],
            "Genre" => ["Shooter", "Adventure", "Shooter"],
            "Age Rating" => ["Mature", "Everyone +10", "Mature"],
            "Platform" => ["Xbox", "Nintendo Switch", "PC"]
        )
        .unwrap();
        let summary = FrequencyAggregator
            .summarize(&df, &mut ReportWriter::new())
            .unwrap();
        let (paths, dir) = scratch_paths();

        ChartRenderer::new(2).render_all(&summary, &paths).unwrap();

        for suffix in CHART_SUFFIXES {
            let chart = paths.chart(suffix);
            assert!(chart.is_file(), "missing {}", chart.display());
            assert!(fs::metadata(&chart).unwrap().len() > 0);
        }
        assert!(dir.join("png").join("games_platform.png").is_file());

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_empty_summary_skips_charts() {
        let summary = AnalysisSummary {
            total_games: 0,
            dimensions: Dimension::ALL
                .into_iter()
                .map(|dimension| {
                    let empty: [&str; 0] = [];
                    (dimension, FrequencyReport::from_values(dimension.column(), empty))
                })
                .collect(),
            calendar: ReleaseCalendar::default(),
        };
        let (paths, dir) = scratch_paths();

        ChartRenderer::new(10).render_all(&summary, &paths).unwrap();

        for suffix in CHART_SUFFIXES {
            assert!(!paths.chart(suffix).exists());
        }
        assert!(!dir.join("png").exists());

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_viridis_endpoints() {
        assert!(viridis(0).is_empty());
        assert_eq!(viridis(1), vec![RGBColor(68, 1, 84)]);

        let five = viridis(5);
        assert_eq!(five[0], RGBColor(68, 1, 84));
        assert_eq!(five[2], RGBColor(33, 145, 140));
        assert_eq!(five[4], RGBColor(253, 231, 37));
    }

    #[test]
    fn test_bar_entries_shorten_long_labels() {
        let entries = bar_entries(&[("Square Enix Business Division 5", 4), ("Capcom", 2)]);

        assert_eq!(entries[0].0.chars().count(), MAX_LABEL_CHARS);
        assert!(entries[0].0.ends_with('…'));
        assert_eq!(entries[0].1, 4);
        assert_eq!(entries[1], ("Capcom".to_string(), 2));
    }
}
