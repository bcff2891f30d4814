//! Raw album records to the flat dataset.
//!
//! Pure projection: order is preserved and nothing is deduplicated, sorted or
//! filtered. Uniqueness and nulls are the quality gate's job.

use crate::domain::{AlbumRecord, Dataset, NormalizedRow, ReleaseDate};
use crate::error::EtlError;

pub fn normalize(records: &[AlbumRecord]) -> Result<Dataset, EtlError> {
    let rows = records
        .iter()
        .enumerate()
        .map(|(idx, record)| normalize_record(idx, record))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Dataset::new(rows))
}

fn normalize_record(idx: usize, record: &AlbumRecord) -> Result<NormalizedRow, EtlError> {
    let first_artist = record.artists.first().ok_or_else(|| {
        EtlError::malformed(
            format!("items[{idx}].artists"),
            format!(
                "album '{}' has no artists",
                record.id.as_deref().unwrap_or("<no id>")
            ),
        )
    })?;

    let total_tracks = record
        .total_tracks
        .map(i32::try_from)
        .transpose()
        .map_err(|_| EtlError::malformed(format!("items[{idx}].total_tracks"), "track count out of range"))?;

    Ok(NormalizedRow {
        album_id: record.id.clone(),
        album_name: record.name.clone(),
        artist_name: first_artist.name.clone(),
        album_type: record.album_type.clone(),
        total_tracks,
        release_date: record.release_date.clone().map(ReleaseDate::Raw),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ArtistCredit, COLUMNS};

    fn record(id: &str, artists: &[&str], release_date: &str) -> AlbumRecord {
        AlbumRecord {
            id: Some(id.to_string()),
            name: Some(format!("Album {id}")),
            artists: artists
                .iter()
                .map(|name| ArtistCredit {
                    name: Some(name.to_string()),
                })
                .collect(),
            album_type: Some("album".to_string()),
            total_tracks: Some(10),
            release_date: Some(release_date.to_string()),
        }
    }

    #[test]
    fn one_row_per_record_in_input_order() {
        let records = vec![
            record("b", &["Jorge Ben"], "1969"),
            record("a", &["Jorge Ben", "Gilberto Gil"], "1975-05"),
            record("c", &["Jorge Ben"], "1976-03-01"),
        ];
        let dataset = normalize(&records).unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.columns(), &COLUMNS);
        let ids: Vec<_> = dataset.rows().iter().map(|r| r.album_id.as_deref().unwrap()).collect();
        assert_eq!(ids, ["b", "a", "c"]);
        assert_eq!(dataset.rows()[1].artist_name.as_deref(), Some("Jorge Ben"));
        assert_eq!(
            dataset.rows()[0].release_date,
            Some(ReleaseDate::Raw("1969".to_string()))
        );
    }

    #[test]
    fn duplicates_pass_through() {
        let records = vec![record("a", &["X"], "2000"), record("a", &["X"], "2000")];
        assert_eq!(normalize(&records).unwrap().len(), 2);
    }

    #[test]
    fn empty_artist_list_is_malformed() {
        let records = vec![record("a", &["X"], "2000"), record("b", &[], "2000")];
        let err = normalize(&records).unwrap_err();
        match err {
            EtlError::MalformedRecord { path, reason } => {
                assert_eq!(path, "items[1].artists");
                assert!(reason.contains("'b'"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn null_fields_are_carried_not_rejected() {
        let mut rec = record("a", &["X"], "2000");
        rec.name = None;
        rec.artists[0].name = None;
        let dataset = normalize(&[rec]).unwrap();
        assert_eq!(dataset.rows()[0].album_name, None);
        assert_eq!(dataset.rows()[0].artist_name, None);
    }
}
