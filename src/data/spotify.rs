//! Spotify Web API integration (client-credentials token, artist search, album listing).

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, HeaderName};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::SpotifyConfig;
use crate::data::CatalogSource;
use crate::domain::{AlbumRecord, ArtistRef};
use crate::error::EtlError;

pub struct SpotifyClient<'a> {
    client: Client,
    config: &'a SpotifyConfig,
}

impl<'a> SpotifyClient<'a> {
    pub fn new(config: &'a SpotifyConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn get_json(&self, url: &str, token: &str, query: &[(&str, &str)]) -> Result<Value, EtlError> {
        let (name, value) = auth_header(token);
        let resp = self
            .client
            .get(url)
            .header(name, value)
            .query(query)
            .send()
            .map_err(|e| EtlError::upstream(None, format!("GET {url} failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(EtlError::upstream(
                Some(status.as_u16()),
                format!("GET {url} returned status {status}."),
            ));
        }

        resp.json()
            .map_err(|e| EtlError::malformed(url, format!("response body is not JSON: {e}")))
    }
}

impl CatalogSource for SpotifyClient<'_> {
    fn get_token(&self) -> Result<String, EtlError> {
        let credential = basic_credential(&self.config.client_id, &self.config.client_secret);
        let resp = self
            .client
            .post(&self.config.token_url)
            .header(AUTHORIZATION, format!("Basic {credential}"))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .map_err(|e| EtlError::Auth(format!("token request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(EtlError::Auth(format!("token endpoint returned status {status}.")));
        }

        let body: TokenResponse = resp
            .json()
            .map_err(|e| EtlError::Auth(format!("failed to parse token response: {e}")))?;
        let token = body
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| EtlError::Auth("token response has no access_token.".to_string()))?;

        debug!(token_type = ?body.token_type, expires_in = ?body.expires_in, "obtained access token");
        Ok(token)
    }

    fn search_artist(&self, token: &str, name: &str) -> Result<Option<ArtistRef>, EtlError> {
        let url = format!("{}/search", self.config.api_base);
        let body = self.get_json(&url, token, &[("q", name), ("type", "artist"), ("limit", "1")])?;
        let artist = decode_search(body)?;
        match &artist {
            Some(a) => info!(artist = %a.name, id = %a.id, "artist found"),
            None => info!(query = name, "no artist with this name"),
        }
        Ok(artist)
    }

    fn list_albums(
        &self,
        token: &str,
        artist_id: &str,
        country_code: &str,
    ) -> Result<Vec<AlbumRecord>, EtlError> {
        let url = format!("{}/artists/{artist_id}/albums", self.config.api_base);
        let body = self.get_json(&url, token, &[("country", country_code)])?;
        let page = decode_album_page(body)?;

        if page.next.is_some() {
            // Only the first page is fetched.
            warn!(
                fetched = page.records.len(),
                total = ?page.total,
                "album listing has more pages that were not fetched"
            );
        }
        info!(albums = page.records.len(), country = country_code, "albums extracted");
        Ok(page.records)
    }
}

/// `Authorization` header for bearer-authenticated API calls.
pub fn auth_header(token: &str) -> (HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {token}"))
}

/// Base64 of `id:secret`, as sent in the `Basic` token request header.
pub fn basic_credential(client_id: &str, client_secret: &str) -> String {
    STANDARD.encode(format!("{client_id}:{client_secret}"))
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    artists: Page,
}

#[derive(Debug, Deserialize)]
struct Page {
    items: Vec<Value>,
    #[serde(default)]
    next: Option<String>,
    #[serde(default)]
    total: Option<u64>,
}

/// One page of `/artists/{id}/albums`.
#[derive(Debug, Clone)]
pub struct AlbumPage {
    pub records: Vec<AlbumRecord>,
    pub next: Option<String>,
    pub total: Option<u64>,
}

/// Decode a `/search?type=artist` body into its first hit.
pub fn decode_search(body: Value) -> Result<Option<ArtistRef>, EtlError> {
    let resp: SearchResponse = decode_at(body, "$")?;
    resp.artists
        .items
        .into_iter()
        .next()
        .map(|item| decode_at(item, "artists.items[0]"))
        .transpose()
}

/// Decode an album listing body, item by item so errors name the offending index.
pub fn decode_album_page(body: Value) -> Result<AlbumPage, EtlError> {
    let page: Page = decode_at(body, "$")?;
    let records = page
        .items
        .into_iter()
        .enumerate()
        .map(|(i, item)| decode_at(item, &format!("items[{i}]")))
        .collect::<Result<Vec<AlbumRecord>, _>>()?;
    Ok(AlbumPage {
        records,
        next: page.next,
        total: page.total,
    })
}

fn decode_at<T: DeserializeOwned>(value: Value, path: &str) -> Result<T, EtlError> {
    serde_json::from_value(value).map_err(|e| EtlError::malformed(path, e.to_string()))
}
