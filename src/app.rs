//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - installs logging
//! - parses CLI arguments and reads the environment once
//! - runs extract + transform
//! - opens the sink only when there is something to load
//! - prints the run summary

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::pipeline::{Prepared, RunOutcome, RunRequest, RunSummary};
use crate::cli::Cli;
use crate::config::Config;
use crate::data::SpotifyClient;
use crate::error::EtlError;
use crate::load::{MemorySink, PgSink};

pub mod pipeline;

/// Entry point for the `album-etl` binary.
pub fn run() -> Result<(), EtlError> {
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env(!cli.dry_run)?;
    let request = RunRequest {
        artist_name: cli.artist.clone(),
        country_code: cli.country.clone(),
    };

    let client = SpotifyClient::new(&config.spotify);
    let outcome = match pipeline::prepare(&client, &request)? {
        Prepared::ArtistNotFound => RunOutcome::ArtistNotFound,
        Prepared::NothingToLoad { artist } => RunOutcome::NothingToLoad { artist },
        Prepared::Ready {
            artist,
            dataset,
            quality,
        } => {
            let load = match &config.db {
                Some(db) => {
                    let mut sink = PgSink::connect(db)?;
                    let load = crate::load::load(&mut sink, &dataset);
                    // Close on every path; a load error wins over a close error.
                    let closed = sink.close();
                    let load = load?;
                    closed?;
                    load
                }
                None => crate::load::load(&mut MemorySink::new(), &dataset)?,
            };
            RunOutcome::Loaded(RunSummary {
                artist,
                quality,
                load,
            })
        }
    };

    println!("{}", crate::report::format_run_outcome(&outcome, &request.artist_name));
    println!("End of ETL.");
    Ok(())
}

fn init_tracing() {
    // Logs go to stderr so stdout carries only the run summary.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .try_init();
}
