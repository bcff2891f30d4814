//! Human-readable end-of-run summary.

use std::fmt::Write as _;

use crate::app::pipeline::RunOutcome;
use crate::load::TABLE_NAME;

pub fn format_run_outcome(outcome: &RunOutcome, request_artist: &str) -> String {
    match outcome {
        RunOutcome::ArtistNotFound => format!("No artist with this name: '{request_artist}'."),
        RunOutcome::NothingToLoad { artist } => {
            format!("No albums extracted for {}; nothing to load.", artist.name)
        }
        RunOutcome::Loaded(summary) => {
            let mut out = format!(
                "{}: {} albums validated, {} inserted into {TABLE_NAME}",
                summary.artist.name, summary.quality.rows, summary.load.inserted
            );
            if summary.load.conflicts > 0 {
                let _ = write!(out, ", {} already present", summary.load.conflicts);
            }
            out.push('.');
            if summary.quality.coerced_dates > 0 {
                let _ = write!(
                    out,
                    "\n{} release dates could not be parsed and were stored as NULL.",
                    summary.quality.coerced_dates
                );
            }
            out
        }
    }
}
