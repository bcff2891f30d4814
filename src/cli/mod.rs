//! Command-line parsing for the album ETL.
//!
//! Parsing only; credentials and database settings come from the environment
//! (see `config`).

use clap::Parser;

/// Top-level CLI.
#[derive(Debug, Parser, Clone)]
#[command(
    name = "album-etl",
    version,
    about = "Extract an artist's albums from Spotify and load them into Postgres"
)]
pub struct Cli {
    /// Artist to search for (first match is used).
    #[arg(short = 'a', long, default_value = "Jorge Ben")]
    pub artist: String,

    /// Market the album listing is filtered to (2-letter country code).
    #[arg(short = 'c', long, default_value = "BR", value_parser = parse_country_code)]
    pub country: String,

    /// Run extract + transform and load into an in-memory table instead of Postgres.
    ///
    /// Database variables are not required in this mode.
    #[arg(long)]
    pub dry_run: bool,
}

fn parse_country_code(raw: &str) -> Result<String, String> {
    if raw.len() == 2 && raw.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(raw.to_ascii_uppercase())
    } else {
        Err(format!("expected a 2-letter country code, got '{raw}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_original_run() {
        let cli = Cli::try_parse_from(["album-etl"]).unwrap();
        assert_eq!(cli.artist, "Jorge Ben");
        assert_eq!(cli.country, "BR");
        assert!(!cli.dry_run);
    }

    #[test]
    fn country_is_uppercased() {
        let cli = Cli::try_parse_from(["album-etl", "--country", "us", "--dry-run"]).unwrap();
        assert_eq!(cli.country, "US");
        assert!(cli.dry_run);
    }

    #[test]
    fn country_must_be_two_letters() {
        assert!(Cli::try_parse_from(["album-etl", "--country", "BRA"]).is_err());
        assert!(Cli::try_parse_from(["album-etl", "-c", "4X"]).is_err());
    }
}
