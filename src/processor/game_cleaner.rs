use anyhow::Result;
use polars::prelude::*;
use std::collections::HashSet;
use tracing::{info, warn};

use crate::models::{
    AGE_RATING, AgeRating, CLEANED_COLUMNS, DERIVED_ONLY_COLUMNS, GENRE, GENRES, PLATFORM,
    PLATFORMS_INFO, PRODUCT_RATING,
};
use crate::processor::PlatformParser;
use crate::report::ReportWriter;

/// Null count per column, taken right before incomplete rows are dropped.
pub type MissingValues = Vec<(String, usize)>;

/// Turns the raw video game table into the cleaned table.
///
/// Steps run in a fixed order because later ones depend on the column names
/// and values produced by earlier ones. Every step tolerates input that has
/// already been cleaned, so running `clean` on its own output is a no-op.
pub struct GameCleaner {
    platform_parser: PlatformParser,
}

impl GameCleaner {
    pub fn new() -> Self {
        Self {
            platform_parser: PlatformParser::new(),
        }
    }

    pub fn clean(&self, df: DataFrame, report: &mut ReportWriter) -> Result<DataFrame> {
        let df = self.rename_columns(df)?;
        let df = self.normalize_age_rating(df)?;
        let df = self.extract_platform(df)?;

        let (df, missing) = self.drop_missing(df)?;
        report.table(
            "Missing values:",
            missing.iter().map(|(column, count)| (column.as_str(), *count)),
        );

        let df = self.remove_duplicates(df)?;
        let df = self.remove_columns(df)?;
        self.reset_index(df)
    }

    pub fn rename_columns(&self, mut df: DataFrame) -> Result<DataFrame> {
        info!("'rename column' started.");

        for (from, to) in [(PRODUCT_RATING, AGE_RATING), (GENRES, GENRE)] {
            if df.column(from).is_ok() {
                df.rename(from, to.into())?;
            }
        }

        info!("'rename column' completed.");
        Ok(df)
    }

    /// Maps rating-board labels onto the short labels. Unknown labels become null.
    pub fn normalize_age_rating(&self, mut df: DataFrame) -> Result<DataFrame> {
        info!("'clean age rating' started.");

        if df.column(AGE_RATING).is_ok() {
            let column = df.column(AGE_RATING)?.str()?;

            let mut unmapped = 0usize;
            let ratings: Vec<Option<&'static str>> = column
                .into_iter()
                .map(|value| {
                    let rating = value.and_then(AgeRating::from_label);
                    if value.is_some() && rating.is_none() {
                        unmapped += 1;
                    }
                    rating.map(|rating| rating.label())
                })
                .collect();

            if unmapped > 0 {
                warn!("{} age rating value(s) not in the rating table", unmapped);
            }

            df.with_column(Series::new(AGE_RATING.into(), ratings))?;
        }

        info!("'clean age rating' completed.");
        Ok(df)
    }

    /// Derives `Platform` from the first entry of `Platforms Info`.
    pub fn extract_platform(&self, mut df: DataFrame) -> Result<DataFrame> {
        info!("'extract platform info' started.");

        if df.column(PLATFORMS_INFO).is_ok() {
            let column = df.column(PLATFORMS_INFO)?.str()?;

            let mut unusable = 0usize;
            let platforms: Vec<Option<String>> = column
                .into_iter()
                .map(|cell| {
                    let platform = self.platform_parser.first_platform(cell);
                    if platform.is_none() {
                        unusable += 1;
                    }
                    platform
                })
                .collect();

            if unusable > 0 {
                warn!("{} row(s) without a usable platform", unusable);
            }

            df.with_column(Series::new(PLATFORM.into(), platforms))?;
        }

        info!("'extract platform info' completed.");
        Ok(df)
    }

    /// Drops every row holding a null in any column and returns the null
    /// counts observed before dropping.
    pub fn drop_missing(&self, df: DataFrame) -> Result<(DataFrame, MissingValues)> {
        info!("'check missing values' started.");

        let mut missing = Vec::with_capacity(df.width());
        let mut keep = vec![true; df.height()];

        for column in df.get_columns() {
            let nulls = column.null_count();
            missing.push((column.name().to_string(), nulls));

            if nulls > 0 {
                for (row, is_null) in column.is_null().into_iter().enumerate() {
                    if is_null == Some(true) {
                        keep[row] = false;
                    }
                }
            }
        }

        let dropped = keep.iter().filter(|kept| !**kept).count();
        let df = if dropped > 0 {
            info!("Dropping {} row(s) with missing values", dropped);
            df.filter(&BooleanChunked::from_slice("keep".into(), &keep))?
        } else {
            df
        };

        info!("'check missing values' completed.");
        Ok((df, missing))
    }

    /// Keeps the first of each group of rows that are equal on the cleaned
    /// columns, preserving the order of the survivors.
    pub fn remove_duplicates(&self, df: DataFrame) -> Result<DataFrame> {
        info!("'remove duplicates' started.");

        let mut key_names: Vec<&str> = CLEANED_COLUMNS
            .iter()
            .copied()
            .filter(|name| df.column(name).is_ok())
            .collect();
        if key_names.is_empty() {
            key_names = df.get_columns().iter().map(|c| c.name().as_str()).collect();
        }

        let key_columns = key_names
            .iter()
            .map(|name| df.column(name)?.cast(&DataType::String))
            .collect::<PolarsResult<Vec<Column>>>()?;
        let key_values = key_columns
            .iter()
            .map(|column| column.str())
            .collect::<PolarsResult<Vec<&StringChunked>>>()?;

        let mut seen: HashSet<Vec<Option<&str>>> = HashSet::with_capacity(df.height());
        let keep: Vec<bool> = (0..df.height())
            .map(|row| {
                let key: Vec<Option<&str>> = key_values.iter().map(|ca| ca.get(row)).collect();
                seen.insert(key)
            })
            .collect();

        let duplicates = keep.iter().filter(|kept| !**kept).count();
        let df = if duplicates > 0 {
            info!("Removing {} duplicate row(s)", duplicates);
            df.filter(&BooleanChunked::from_slice("keep".into(), &keep))?
        } else {
            df
        };

        info!("'remove duplicates' completed.");
        Ok(df)
    }

    pub fn remove_columns(&self, mut df: DataFrame) -> Result<DataFrame> {
        info!("'remove columns' started.");

        for column in DERIVED_ONLY_COLUMNS {
            if df.column(column).is_ok() {
                df.drop_in_place(column)?;
            }
        }

        info!("'remove columns' completed.");
        Ok(df)
    }

    /// Rows are positional, so after filtering they already run 0..n-1;
    /// this compacts the filtered chunks into one contiguous buffer per column.
    /// Rows are positional, so after filtering they already run 0..n-1.
    /// What is left to do is compact the chunks left behind by the filters.
    pub fn reset_index(&self, mut df: DataFrame) -> Result<DataFrame> {
        info!("'reset index' started.");
        df.as_single_chunk();
        info!("'reset index' completed.");
        Ok(df)
    }
}

impl Default for GameCleaner {
    fn default() -> Self {
        Self::new()
    }
}
