//! Shared domain types.
//!
//! The raw records mirror the Spotify payloads with every scalar optional, so
//! a `null` or missing field survives extraction and is reported by the
//! quality gate instead of failing deep inside serde.

use chrono::NaiveDate;
use serde::Deserialize;

/// Column order of a [`Dataset`] and of the `spotify_albums` table.
pub const COLUMNS: [&str; 6] = [
    "album_id",
    "album_name",
    "artist_name",
    "album_type",
    "total_tracks",
    "release_date",
];

/// Search hit for an artist.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArtistRef {
    pub id: String,
    pub name: String,
}

/// Artist entry nested inside an album.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArtistCredit {
    #[serde(default)]
    pub name: Option<String>,
}

/// Album as returned by `GET /artists/{id}/albums`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AlbumRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub artists: Vec<ArtistCredit>,
    /// `album`, `single`, `compilation` (or `appears_on` for some listings).
    #[serde(default)]
    pub album_type: Option<String>,
    #[serde(default)]
    pub total_tracks: Option<u32>,
    /// `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
    #[serde(default)]
    pub release_date: Option<String>,
}

/// Release date as it moves through the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseDate {
    /// Upstream string, not yet parsed.
    Raw(String),
    Date(NaiveDate),
    /// Null-date sentinel for values the parser rejected.
    Invalid,
}

impl ReleaseDate {
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            Self::Raw(_) | Self::Invalid => None,
        }
    }
}

/// One row of the tabular dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRow {
    pub album_id: Option<String>,
    pub album_name: Option<String>,
    pub artist_name: Option<String>,
    pub album_type: Option<String>,
    pub total_tracks: Option<i32>,
    pub release_date: Option<ReleaseDate>,
}

impl NormalizedRow {
    /// First column (in [`COLUMNS`] order) that holds no value.
    pub fn first_null_column(&self) -> Option<&'static str> {
        let present = [
            self.album_id.is_some(),
            self.album_name.is_some(),
            self.artist_name.is_some(),
            self.album_type.is_some(),
            self.total_tracks.is_some(),
            self.release_date.is_some(),
        ];
        present
            .iter()
            .zip(COLUMNS)
            .find(|(present, _)| !**present)
            .map(|(_, column)| column)
    }
}

/// Ordered rows produced by the normalizer for a single run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    rows: Vec<NormalizedRow>,
}

impl Dataset {
    pub fn new(rows: Vec<NormalizedRow>) -> Self {
        Self { rows }
    }

    pub fn columns(&self) -> &'static [&'static str] {
        &COLUMNS
    }

    pub fn rows(&self) -> &[NormalizedRow] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [NormalizedRow] {
        &mut self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_row() -> NormalizedRow {
        NormalizedRow {
            album_id: Some("a1".into()),
            album_name: Some("Africa Brasil".into()),
            artist_name: Some("Jorge Ben".into()),
            album_type: Some("album".into()),
            total_tracks: Some(11),
            release_date: Some(ReleaseDate::Raw("1976".into())),
        }
    }

    #[test]
    fn first_null_column_follows_column_order() {
        assert_eq!(full_row().first_null_column(), None);

        let mut row = full_row();
        row.total_tracks = None;
        row.artist_name = None;
        assert_eq!(row.first_null_column(), Some("artist_name"));
    }

    #[test]
    fn album_record_tolerates_nulls_and_missing_fields() {
        let json = r#"{"id": "x", "name": null, "release_date": "1969"}"#;
        let record: AlbumRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id.as_deref(), Some("x"));
        assert_eq!(record.name, None);
        assert!(record.artists.is_empty());
        assert_eq!(record.release_date.as_deref(), Some("1969"));
    }
}
