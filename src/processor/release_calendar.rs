use anyhow::Result;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::models::RELEASE_DATE;

const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d",
    "%b %d, %Y",
    "%B %d, %Y",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%d %b %Y",
];

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub fn parse_release_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|timestamp| timestamp.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|timestamp| timestamp.date_naive())
        })
}

/// Release counts bucketed by year and by (year, month).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReleaseCalendar {
    pub by_year: BTreeMap<i32, usize>,
    /// Month numbers run 1..=12.
    pub by_month: BTreeMap<i32, BTreeMap<u32, usize>>,
    pub unparsed: usize,
}

impl ReleaseCalendar {
    pub fn from_frame(df: &DataFrame) -> Result<Self> {
        info!("'release calendar' started.");

        let mut calendar = Self::default();
        for value in df.column(RELEASE_DATE)?.str()?.into_iter().flatten() {
            match parse_release_date(value) {
                Some(date) => calendar.add(date),
                None => calendar.unparsed += 1,
            }
        }

        if calendar.unparsed > 0 {
            warn!(
                "{} release date(s) could not be parsed and are left out of the calendar",
                calendar.unparsed
            );
        }

        info!("'release calendar' completed.");
        Ok(calendar)
    }

    pub fn add(&mut self, date: NaiveDate) {
        *self.by_year.entry(date.year()).or_insert(0) += 1;
        *self
            .by_month
            .entry(date.year())
            .or_default()
            .entry(date.month())
            .or_insert(0) += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.by_year.is_empty()
    }
}
