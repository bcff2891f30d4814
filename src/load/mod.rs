//! Load stage: the `spotify_albums` table and the sinks that write it.
//!
//! - table schema and the row shape written to it
//! - `AlbumSink`, the seam between the pipeline and storage
//! - Postgres (`postgres`) and in-process (`memory`) sinks

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::domain::{Dataset, NormalizedRow};
use crate::error::EtlError;

pub mod memory;
pub mod postgres;

pub use memory::MemorySink;
pub use postgres::PgSink;

pub const TABLE_NAME: &str = "spotify_albums";

pub const CREATE_TABLE_SQL: &str = "
CREATE TABLE IF NOT EXISTS spotify_albums (
  album_id VARCHAR(100) PRIMARY KEY,
  album_name VARCHAR(200) NOT NULL,
  artist_name VARCHAR(100) NOT NULL,
  album_type VARCHAR(100),
  total_tracks INT,
  release_date DATE
);
";

/// A dataset row in table form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumRow {
    pub album_id: String,
    pub album_name: String,
    pub artist_name: String,
    pub album_type: Option<String>,
    pub total_tracks: Option<i32>,
    /// `None` for dates the quality gate coerced to the null sentinel.
    pub release_date: Option<NaiveDate>,
}

impl AlbumRow {
    /// Fails on values the table's `NOT NULL` columns would reject.
    pub fn from_normalized(index: usize, row: &NormalizedRow) -> Result<Self, EtlError> {
        let required = |value: &Option<String>, column: &str| {
            value.clone().ok_or_else(|| {
                EtlError::Persistence(format!("row {index}: {column} violates NOT NULL"))
            })
        };
        Ok(Self {
            album_id: required(&row.album_id, "album_id")?,
            album_name: required(&row.album_name, "album_name")?,
            artist_name: required(&row.artist_name, "artist_name")?,
            album_type: row.album_type.clone(),
            total_tracks: row.total_tracks,
            release_date: row.release_date.as_ref().and_then(|d| d.as_date()),
        })
    }
}

/// Result of writing one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadOutcome {
    pub inserted: usize,
    /// Rows skipped because their `album_id` was already stored.
    pub conflicts: usize,
}

pub trait AlbumSink {
    /// Create the table if it does not exist yet.
    fn ensure_table(&mut self) -> Result<(), EtlError>;

    /// Write all rows as one batch. Primary-key conflicts are counted, not raised.
    fn insert_batch(&mut self, rows: &[AlbumRow]) -> Result<LoadOutcome, EtlError>;
}

/// Persist a validated dataset.
pub fn load<S: AlbumSink + ?Sized>(sink: &mut S, dataset: &Dataset) -> Result<LoadOutcome, EtlError> {
    sink.ensure_table()?;

    let rows = dataset
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| AlbumRow::from_normalized(i, row))
        .collect::<Result<Vec<_>, _>>()?;

    let outcome = sink.insert_batch(&rows)?;
    if outcome.conflicts > 0 {
        warn!(
            conflicts = outcome.conflicts,
            inserted = outcome.inserted,
            "data already exists in the database"
        );
    }
    info!(inserted = outcome.inserted, table = TABLE_NAME, "load finished");
    Ok(outcome)
}
