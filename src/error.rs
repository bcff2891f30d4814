use thiserror::Error;

/// Every way a run can abort.
///
/// Primary-key conflicts on insert are not in here: they are recovered by the
/// sink and counted in [`crate::load::LoadOutcome`].
#[derive(Debug, Error)]
pub enum EtlError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Spotify authentication failed: {0}")]
    Auth(String),

    #[error("Spotify request failed: {message}")]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    #[error("Malformed record at {path}: {reason}")]
    MalformedRecord { path: String, reason: String },

    #[error("Primary key exception: album_id '{0}' appears more than once, data might contain duplicates.")]
    DuplicateKey(String),

    #[error("Null value found in column '{column}' (row {row}).")]
    NullValue { row: usize, column: &'static str },

    #[error("Database error: {0}")]
    Persistence(String),
}

impl EtlError {
    pub fn upstream(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Process exit code for this failure category.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Auth(_) => 3,
            Self::Upstream { .. } => 4,
            Self::MalformedRecord { .. } => 5,
            Self::DuplicateKey(_) | Self::NullValue { .. } => 6,
            Self::Persistence(_) => 7,
        }
    }
}

impl From<sqlx::Error> for EtlError {
    fn from(err: sqlx::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_quality_failures_share_an_exit_code() {
        assert_eq!(EtlError::DuplicateKey("x".into()).exit_code(), 6);
        assert_eq!(
            EtlError::NullValue {
                row: 0,
                column: "artist_name"
            }
            .exit_code(),
            6
        );
        assert_eq!(EtlError::upstream(Some(500), "boom").exit_code(), 4);
    }
}
