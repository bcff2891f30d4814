//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw upstream records (`ArtistRef`, `AlbumRecord`)
//! - the normalized tabular form (`NormalizedRow`, `Dataset`, `COLUMNS`)
//! - release dates before and after repair (`ReleaseDate`)

pub mod types;

pub use types::*;
