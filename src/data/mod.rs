//! Upstream catalog access.

pub mod spotify;

pub use spotify::*;

use crate::domain::{AlbumRecord, ArtistRef};
use crate::error::EtlError;

/// The extract stage as the pipeline sees it.
///
/// `SpotifyClient` is the real implementation; tests swap in canned catalogs.
pub trait CatalogSource {
    /// Fresh bearer token for this run.
    fn get_token(&self) -> Result<String, EtlError>;

    /// First artist matching `name`, or `None` when the search is empty.
    fn search_artist(&self, token: &str, name: &str) -> Result<Option<ArtistRef>, EtlError>;

    /// First page of the artist's albums available in `country_code`.
    fn list_albums(
        &self,
        token: &str,
        artist_id: &str,
        country_code: &str,
    ) -> Result<Vec<AlbumRecord>, EtlError>;
}
