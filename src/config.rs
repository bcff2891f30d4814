//! Run configuration, read once from the environment at startup.
//!
//! Components never look at the environment themselves; `app::run` builds a
//! [`Config`] and hands references down.

use crate::error::EtlError;

pub const DEFAULT_API_BASE: &str = "https://api.spotify.com/v1";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Spotify client credentials plus the endpoints they are used against.
#[derive(Clone)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    pub api_base: String,
    pub token_url: String,
}

impl std::fmt::Debug for SpotifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotifyConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("token_url", &self.token_url)
            .finish()
    }
}

impl SpotifyConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, EtlError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Lowercase names are what older `.env` files for this pipeline used.
        let client_id = first_present(&lookup, &["SPOTIFY_CLIENT_ID", "client_id"])?;
        let client_secret = first_present(&lookup, &["SPOTIFY_CLIENT_SECRET", "client_secret"])?;
        Ok(Self {
            client_id,
            client_secret,
            api_base: lookup("SPOTIFY_API_BASE")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            token_url: lookup("SPOTIFY_TOKEN_URL").unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
        })
    }
}

/// Postgres connection parameters.
#[derive(Clone)]
pub struct DbConfig {
    pub name: String,
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
}

impl std::fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbConfig")
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

impl DbConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, EtlError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port_raw = first_present(&lookup, &["DB_PORT"])?;
        let port = port_raw
            .trim()
            .parse::<u16>()
            .map_err(|_| EtlError::Config(format!("DB_PORT must be a port number, got '{port_raw}'.")))?;
        Ok(Self {
            name: first_present(&lookup, &["DB_NAME"])?,
            user: first_present(&lookup, &["DB_USER"])?,
            password: first_present(&lookup, &["DB_PASSWORD"])?,
            host: first_present(&lookup, &["DB_HOST"])?,
            port,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub spotify: SpotifyConfig,
    /// `None` for dry runs, which never touch the database.
    pub db: Option<DbConfig>,
}

impl Config {
    /// Read configuration from the process environment (and `.env`).
    pub fn from_env(require_db: bool) -> Result<Self, EtlError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok(), require_db)
    }

    pub fn from_lookup<F>(lookup: F, require_db: bool) -> Result<Self, EtlError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let spotify = SpotifyConfig::from_lookup(&lookup)?;
        let db = if require_db {
            Some(DbConfig::from_lookup(&lookup)?)
        } else {
            None
        };
        Ok(Self { spotify, db })
    }
}

fn first_present<F>(lookup: &F, keys: &[&str]) -> Result<String, EtlError>
where
    F: Fn(&str) -> Option<String>,
{
    keys.iter()
        .find_map(|key| lookup(key).filter(|v| !v.trim().is_empty()))
        .ok_or_else(|| EtlError::Config(format!("Missing {} in environment (.env).", keys[0])))
}
