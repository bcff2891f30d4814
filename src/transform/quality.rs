//! Data-quality gate run between normalization and persistence.
//!
//! Check order is fixed: empty → unique `album_id` → no nulls → date repair.
//! Both hard checks see the raw upstream strings, so repair cannot hide a
//! missing or duplicated value.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::domain::{Dataset, ReleaseDate};
use crate::error::EtlError;

/// Suffix that turns a year-only date into the first of January.
const YEAR_ONLY_SUFFIX: &str = "-01-01";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QualityReport {
    pub rows: usize,
    /// Year-only dates completed with `-01-01`.
    pub completed_dates: usize,
    /// Dates the parser rejected, now `ReleaseDate::Invalid`.
    pub coerced_dates: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityOutcome {
    /// Zero rows; nothing downstream should run.
    NothingToLoad,
    Ready(QualityReport),
}

/// Validate `dataset` and repair its release dates in place.
pub fn validate_and_repair(dataset: &mut Dataset) -> Result<QualityOutcome, EtlError> {
    if dataset.is_empty() {
        info!("no albums extracted");
        return Ok(QualityOutcome::NothingToLoad);
    }

    check_unique_ids(dataset)?;
    check_no_nulls(dataset)?;

    let mut report = QualityReport {
        rows: dataset.len(),
        ..QualityReport::default()
    };

    for row in dataset.rows_mut() {
        let Some(date) = row.release_date.as_mut() else {
            continue;
        };
        let ReleaseDate::Raw(raw) = &mut *date else {
            continue;
        };

        if raw.chars().count() == 4 {
            raw.push_str(YEAR_ONLY_SUFFIX);
            report.completed_dates += 1;
        }

        *date = match parse_release_date(raw) {
            Some(d) => ReleaseDate::Date(d),
            None => {
                // Lossy on purpose: the row is kept with a null date.
                warn!(
                    album_id = row.album_id.as_deref().unwrap_or_default(),
                    release_date = %raw,
                    "unparseable release date coerced to null"
                );
                report.coerced_dates += 1;
                ReleaseDate::Invalid
            }
        };
    }

    info!(
        rows = report.rows,
        completed = report.completed_dates,
        coerced = report.coerced_dates,
        "data quality checks passed"
    );
    Ok(QualityOutcome::Ready(report))
}

fn check_unique_ids(dataset: &Dataset) -> Result<(), EtlError> {
    // A repeated null id counts as a duplicate too.
    let mut seen = HashSet::with_capacity(dataset.len());
    for id in dataset.rows().iter().map(|r| r.album_id.as_deref()) {
        if !seen.insert(id) {
            return Err(EtlError::DuplicateKey(id.unwrap_or("<null>").to_string()));
        }
    }
    Ok(())
}

fn check_no_nulls(dataset: &Dataset) -> Result<(), EtlError> {
    for (row, values) in dataset.rows().iter().enumerate() {
        if let Some(column) = values.first_null_column() {
            return Err(EtlError::NullValue { row, column });
        }
    }
    Ok(())
}

/// `YYYY-MM-DD` as is; `YYYY-MM` as the first of the month.
pub fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d);
    }
    if raw.len() == 7 {
        return NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d").ok();
    }
    None
}
