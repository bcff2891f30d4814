//! Transform stage: normalization and the data-quality gate.

pub mod normalize;
pub mod quality;

pub use normalize::normalize;
pub use quality::{QualityOutcome, QualityReport, parse_release_date, validate_and_repair};
