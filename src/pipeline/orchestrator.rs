use anyhow::anyhow;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tracing::{error, info, info_span};

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::models::REQUIRED_COLUMNS;
use crate::pipeline::{PipelineStage, RunContext};
use crate::processor::{ColumnValidator, FrequencyAggregator, GameCleaner};
use crate::report::ChartRenderer;
use crate::storage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub cleaned_rows: usize,
    pub total_games: usize,
}

/// Validator, cleaner, exports and reports run strictly in sequence.
pub struct Pipeline {
    validator: ColumnValidator,
    cleaner: GameCleaner,
    aggregator: FrequencyAggregator,
    charts: Option<ChartRenderer>,
}

impl Pipeline {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            validator: ColumnValidator::new(REQUIRED_COLUMNS),
            cleaner: GameCleaner::new(),
            aggregator: FrequencyAggregator,
            charts: config.charts.then(|| ChartRenderer::new(config.top_n)),
        }
    }

    pub fn run(&self, ctx: &mut RunContext) -> Result<RunSummary, PipelineError> {
        let result = self.run_stages(ctx);
        if result.is_err() {
            ctx.advance(PipelineStage::Failed);
        }
        result
    }

    fn run_stages(&self, ctx: &mut RunContext) -> Result<RunSummary, PipelineError> {
        storage::check_input_file(&ctx.input)?;
        let df = storage::load_csv(&ctx.input)?;
        ctx.advance(PipelineStage::Loaded);

        self.validator.validate(&df)?;
        ctx.advance(PipelineStage::Validated);

        let mut df = self.cleaner.clean(df, &mut ctx.report)?;
        ctx.advance(PipelineStage::Cleaned);

        storage::export_csv(&mut df, &ctx.paths.cleaned_csv)?;
        storage::export_json_lines(&mut df, &ctx.paths.cleaned_json)?;
        ctx.advance(PipelineStage::Exported);

        let summary = self.aggregator.summarize(&df, &mut ctx.report)?;
        match &self.charts {
            Some(renderer) => renderer.render_all(&summary, &ctx.paths)?,
            None => info!("Chart rendering disabled"),
        }
        ctx.advance(PipelineStage::Reported);

        Ok(RunSummary {
            cleaned_rows: df.height(),
            total_games: summary.total_games,
        })
    }
}

/// Runs the whole pipeline for `input` under a run-scoped log subscriber.
/// The report and log are flushed whether or not the run succeeds.
pub fn execute(config: PipelineConfig, input: &Path) -> Result<RunSummary, PipelineError> {
    let mut ctx = RunContext::open(config, input)?;
    let subscriber = ctx.subscriber()?;

    tracing::subscriber::with_default(subscriber, || {
        let span = info_span!("run", run_id = %ctx.run_id);
        let _entered = span.enter();
        info!("'video games pipeline' started for {}.", input.display());

        let pipeline = Pipeline::from_config(&ctx.config);
        let result = contain_panic(|| pipeline.run(&mut ctx));
        if result.is_err() && ctx.stage != PipelineStage::Failed {
            ctx.advance(PipelineStage::Failed);
        }

        match &result {
            Ok(summary) => info!(
                "Cleaned {} row(s), {} game(s) reported",
                summary.cleaned_rows, summary.total_games
            ),
            Err(err @ PipelineError::Unhandled(_)) => {
                error!("An unexpected {} error occurred: {:#}", err.kind(), err)
            }
            Err(err) => error!("Error: {}", err),
        }

        info!("'video games pipeline' completed.");
        if let Err(err) = ctx.finish() {
            error!("Failed to flush run artifacts: {:#}", err);
        }

        result
    })
}

/// Turns a panic raised inside a stage into an unhandled error so the run
/// still flushes its artifacts and exits with the failure code.
fn contain_panic<F>(stage: F) -> Result<RunSummary, PipelineError>
where
    F: FnOnce() -> Result<RunSummary, PipelineError>,
{
    panic::catch_unwind(AssertUnwindSafe(stage)).unwrap_or_else(|payload| {
        Err(PipelineError::Unhandled(anyhow!(
            "panic during run: {}",
            panic_message(payload.as_ref())
        )))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    const HEADER: &str = "Title,Release Date,Developer,Publisher,Genres,Product Rating,User Score,User Ratings Count,Platforms Info";

    fn scratch() -> (PipelineConfig, PathBuf) {
        let dir = std::env::temp_dir().join(uuid::Uuid::new_v4().to_string());
        fs::create_dir_all(&dir).unwrap();
        let mut config = PipelineConfig::default();
        config.output_root = dir.join("out");
        config.charts = false;
        (config, dir)
    }

    fn write_input(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("games.csv");
        fs::write(&path, format!("{}\n{}", HEADER, body)).unwrap();
        path
    }

    #[test]
    fn test_successful_run_writes_artifacts() {
        let (config, dir) = scratch();
        let input = write_input(
            &dir,
            "Halo,2001-11-15,Bungie,Microsoft,Shooter,Rated M For Mature,8.9,1200,\"[{'Platform': 'Xbox'}]\"\n\
             Halo,2001-11-15,Bungie,Microsoft,Shooter,Rated M For Mature,8.9,1200,\"[{'Platform': 'Xbox'}]\"\n\
             Zelda,2017-03-03,Nintendo,Nintendo,Adventure,Rated E +10 For Everyone +10,9.5,5000,\"[{'Platform': 'Nintendo Switch'}, {'Platform': 'Wii U'}]\"\n\
             Doom,2016-05-13,id Software,Bethesda,Shooter,Rated M For Mature,8.1,900,\"[{'Platform': 'PC'\"\n\
             Tetris,1984-06-06,Pajitnov,Elorg,Puzzle,Rated Q For Questionable,9.0,300,\"[{'Platform': 'Game Boy'}]\"\n",
        );
        let out = config.output_root.clone();

        let summary = execute(config, &input).unwrap();
        assert_eq!(
            summary,
            RunSummary {
                cleaned_rows: 2,
                total_games: 2
            }
        );

        let csv = fs::read_to_string(out.join("csv").join("games_cleaned.csv")).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("Title,Release Date,Developer,Publisher,Genre,Age Rating,Platform")
        );
        assert_eq!(
            lines.next(),
            Some("Halo,2001-11-15,Bungie,Microsoft,Shooter,Mature,Xbox")
        );
        assert_eq!(
            lines.next(),
            Some("Zelda,2017-03-03,Nintendo,Nintendo,Adventure,Everyone +10,Nintendo Switch")
        );
        assert_eq!(lines.next(), None);

        let json = fs::read_to_string(out.join("json").join("games_cleaned.json")).unwrap();
        assert_eq!(json.lines().count(), 2);

        let report = fs::read_to_string(out.join("txt").join("games.txt")).unwrap();
        assert!(report.contains("The total games made is: 2"));
        assert!(report.contains("The most common platform is: Xbox"));

        let log = fs::read_to_string(out.join("log").join("games.log")).unwrap();
        assert!(log.contains("'clean age rating' started."));
        assert!(log.contains("'video games pipeline' completed."));

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_missing_columns_stop_before_cleaning() {
        let (config, dir) = scratch();
        let input = dir.join("games.csv");
        fs::write(&input, "Title,Release Date,Developer\nHalo,2001-11-15,Bungie\n").unwrap();
        let out = config.output_root.clone();

        match execute(config, &input) {
            Err(PipelineError::MissingColumns { missing }) => assert_eq!(
                missing,
                vec![
                    "Publisher",
                    "Genres",
                    "Product Rating",
                    "User Score",
                    "User Ratings Count",
                    "Platforms Info"
                ]
            ),
            other => panic!("expected missing columns, got {:?}", other),
        }

        let log = fs::read_to_string(out.join("log").join("games.log")).unwrap();
        assert!(!log.contains("'rename column' started."));
        assert!(log.contains("Failed"));
        assert!(!out.join("csv").exists());
        // The report is still persisted on failure.
        assert!(out.join("txt").join("games.txt").is_file());

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_missing_input_file() {
        let (config, dir) = scratch();
        let input = dir.join("nope.csv");

        let err = execute(config, &input).unwrap_err();
        assert!(matches!(err, PipelineError::InputNotFound { .. }));
        assert_eq!(err.exit_code(), 1);

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_panic_becomes_unhandled_error() {
        let err = contain_panic(|| panic!("chart backend exploded")).unwrap_err();

        assert!(matches!(err, PipelineError::Unhandled(_)));
        assert_eq!(err.to_string(), "panic during run: chart backend exploded");
        assert_eq!(err.exit_code(), 1);

        let formatted = contain_panic(|| panic!("bad row {}", 7)).unwrap_err();
        assert_eq!(formatted.to_string(), "panic during run: bad row 7");
    }

    #[test]
    fn test_contain_panic_passes_results_through() {
        let summary = RunSummary {
            cleaned_rows: 3,
            total_games: 3,
        };
        assert_eq!(contain_panic(|| Ok(summary.clone())).unwrap(), summary);

        let err = contain_panic(|| {
            Err(PipelineError::MissingColumns {
                missing: vec!["Genres".to_string()],
            })
        })
        .unwrap_err();
        assert!(matches!(err, PipelineError::MissingColumns { .. }));
    }

    #[test]
    fn test_stage_reaches_reported() {
        let (config, dir) = scratch();
        let input = write_input(
            &dir,
            "Halo,2001-11-15,Bungie,Microsoft,Shooter,Rated M For Mature,8.9,1200,\"[{'Platform': 'Xbox'}]\"\n",
        );

        let mut ctx = RunContext::open(config, &input).unwrap();
        let pipeline = Pipeline::from_config(&ctx.config);
        pipeline.run(&mut ctx).unwrap();
        assert_eq!(ctx.stage, PipelineStage::Reported);

        fs::remove_dir_all(dir).ok();
    }
}
