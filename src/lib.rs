//! `album-etl` library crate.
//!
//! The binary (`album-etl`) is a thin wrapper around this library so that:
//!
//! - every stage is testable without network or database access
//! - extract and load sit behind traits (`CatalogSource`, `AlbumSink`)

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod load;
pub mod report;
pub mod transform;
