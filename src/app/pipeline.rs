//! The ETL pipeline shared by the real run and the dry run.
//!
//! token -> artist search -> album listing -> normalize -> quality gate -> load
//!
//! Extraction and transformation are split from loading so the caller can
//! open the database only once there is something to write.

use tracing::info;

use crate::data::CatalogSource;
use crate::domain::{ArtistRef, Dataset};
use crate::error::EtlError;
use crate::load::{AlbumSink, LoadOutcome};
use crate::transform::{QualityOutcome, QualityReport, normalize, validate_and_repair};

/// What one invocation asks for.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub artist_name: String,
    pub country_code: String,
}

/// Output of extract + transform.
#[derive(Debug, Clone)]
pub enum Prepared {
    ArtistNotFound,
    NothingToLoad { artist: ArtistRef },
    Ready {
        artist: ArtistRef,
        dataset: Dataset,
        quality: QualityReport,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub artist: ArtistRef,
    pub quality: QualityReport,
    pub load: LoadOutcome,
}

/// How a run ended when nothing failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    ArtistNotFound,
    NothingToLoad { artist: ArtistRef },
    Loaded(RunSummary),
}

/// Extract the artist's albums and run them through the transform stage.
pub fn prepare<C: CatalogSource + ?Sized>(source: &C, request: &RunRequest) -> Result<Prepared, EtlError> {
    let token = source.get_token()?;

    let Some(artist) = source.search_artist(&token, &request.artist_name)? else {
        return Ok(Prepared::ArtistNotFound);
    };

    let records = source.list_albums(&token, &artist.id, &request.country_code)?;
    let mut dataset = normalize(&records)?;
    info!(rows = dataset.len(), artist = %artist.name, "albums normalized");

    match validate_and_repair(&mut dataset)? {
        QualityOutcome::NothingToLoad => Ok(Prepared::NothingToLoad { artist }),
        QualityOutcome::Ready(quality) => Ok(Prepared::Ready {
            artist,
            dataset,
            quality,
        }),
    }
}

/// Full run against an already-open sink.
pub fn run_etl<C, S>(source: &C, sink: &mut S, request: &RunRequest) -> Result<RunOutcome, EtlError>
where
    C: CatalogSource + ?Sized,
    S: AlbumSink + ?Sized,
{
    match prepare(source, request)? {
        Prepared::ArtistNotFound => Ok(RunOutcome::ArtistNotFound),
        Prepared::NothingToLoad { artist } => Ok(RunOutcome::NothingToLoad { artist }),
        Prepared::Ready {
            artist,
            dataset,
            quality,
        } => {
            let load = crate::load::load(sink, &dataset)?;
            Ok(RunOutcome::Loaded(RunSummary {
                artist,
                quality,
                load,
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{AlbumRecord, ArtistCredit};
    use crate::load::MemorySink;

    /// Canned catalog that records the calls it receives.
    struct FakeCatalog {
        artist: Option<ArtistRef>,
        albums: Vec<AlbumRecord>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeCatalog {
        fn new(artist: Option<ArtistRef>, albums: Vec<AlbumRecord>) -> Self {
            Self {
                artist,
                albums,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl CatalogSource for FakeCatalog {
        fn get_token(&self) -> Result<String, EtlError> {
            self.calls.borrow_mut().push("token".to_string());
            Ok("test-token".to_string())
        }

        fn search_artist(&self, token: &str, name: &str) -> Result<Option<ArtistRef>, EtlError> {
            assert_eq!(token, "test-token");
            self.calls.borrow_mut().push(format!("search:{name}"));
            Ok(self.artist.clone())
        }

        fn list_albums(
            &self,
            token: &str,
            artist_id: &str,
            country_code: &str,
        ) -> Result<Vec<AlbumRecord>, EtlError> {
            assert_eq!(token, "test-token");
            self.calls
                .borrow_mut()
                .push(format!("albums:{artist_id}:{country_code}"));
            Ok(self.albums.clone())
        }
    }

    fn jorge_ben() -> ArtistRef {
        ArtistRef {
            id: "5JYtpnUKxAzXfHEYpOeeit".to_string(),
            name: "Jorge Ben Jor".to_string(),
        }
    }

    fn album(id: &str, release_date: &str) -> AlbumRecord {
        AlbumRecord {
            id: Some(id.to_string()),
            name: Some(format!("Album {id}")),
            artists: vec![ArtistCredit {
                name: Some("Jorge Ben".to_string()),
            }],
            album_type: Some("album".to_string()),
            total_tracks: Some(11),
            release_date: Some(release_date.to_string()),
        }
    }

    fn request() -> RunRequest {
        RunRequest {
            artist_name: "Jorge Ben".to_string(),
            country_code: "BR".to_string(),
        }
    }

    #[test]
    fn end_to_end_issues_one_batch_of_three_rows() {
        let catalog = FakeCatalog::new(
            Some(jorge_ben()),
            vec![
                album("a1", "1976"),
                album("a2", "1969-01-01"),
                album("a3", "1974-05-20"),
            ],
        );
        let mut sink = MemorySink::new();

        let outcome = run_etl(&catalog, &mut sink, &request()).unwrap();

        let RunOutcome::Loaded(summary) = outcome else {
            panic!("expected a loaded run, got {outcome:?}");
        };
        assert_eq!(summary.quality.rows, 3);
        assert_eq!(summary.quality.completed_dates, 1);
        assert_eq!(summary.load, LoadOutcome { inserted: 3, conflicts: 0 });
        assert_eq!(sink.batches(), &[3]);
        assert_eq!(
            sink.get("a1").unwrap().release_date,
            NaiveDate::from_ymd_opt(1976, 1, 1)
        );
        assert_eq!(
            *catalog.calls.borrow(),
            [
                "token",
                "search:Jorge Ben",
                "albums:5JYtpnUKxAzXfHEYpOeeit:BR"
            ]
        );
    }

    #[test]
    fn rerun_reports_conflicts_and_succeeds() {
        let catalog = FakeCatalog::new(Some(jorge_ben()), vec![album("a1", "1976"), album("a2", "1977")]);
        let mut sink = MemorySink::new();

        run_etl(&catalog, &mut sink, &request()).unwrap();
        let RunOutcome::Loaded(summary) = run_etl(&catalog, &mut sink, &request()).unwrap() else {
            panic!("expected a loaded run");
        };
        assert_eq!(summary.load, LoadOutcome { inserted: 0, conflicts: 2 });
    }

    #[test]
    fn unknown_artist_stops_before_listing_albums() {
        let catalog = FakeCatalog::new(None, vec![album("a1", "1976")]);
        let mut sink = MemorySink::new();

        let outcome = run_etl(&catalog, &mut sink, &request()).unwrap();
        assert_eq!(outcome, RunOutcome::ArtistNotFound);
        assert_eq!(catalog.calls.borrow().len(), 2);
        assert!(sink.batches().is_empty());
    }

    #[test]
    fn empty_catalog_loads_nothing() {
        let catalog = FakeCatalog::new(Some(jorge_ben()), Vec::new());
        let mut sink = MemorySink::new();

        let outcome = run_etl(&catalog, &mut sink, &request()).unwrap();
        assert_eq!(outcome, RunOutcome::NothingToLoad { artist: jorge_ben() });
        assert!(sink.batches().is_empty());
    }

    #[test]
    fn duplicate_ids_never_reach_the_sink() {
        let catalog = FakeCatalog::new(Some(jorge_ben()), vec![album("a1", "1976"), album("a1", "1976")]);
        let mut sink = MemorySink::new();

        let err = run_etl(&catalog, &mut sink, &request()).unwrap_err();
        assert!(matches!(err, EtlError::DuplicateKey(_)));
        assert!(sink.batches().is_empty());
    }
}
