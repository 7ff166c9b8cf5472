use thiserror::Error;

/// Failures of a [`crate::RecordStore`]
#[derive(Error, Debug)]
pub enum StoreError {
    /// The persisted set exists but could not be parsed. No recovery is attempted.
    #[error("Malformed record set at {location}: {reason:#}")]
    Parse {
        location: String,
        reason: anyhow::Error,
    },

    #[error("Failed to read record set at {location}: {reason:#}")]
    Read {
        location: String,
        reason: anyhow::Error,
    },

    #[error("Failed to write record set at {location}: {reason:#}")]
    Write {
        location: String,
        reason: anyhow::Error,
    },
}

impl StoreError {
    pub fn parse(location: impl std::fmt::Display, reason: impl Into<anyhow::Error>) -> Self {
        StoreError::Parse {
            location: location.to_string(),
            reason: reason.into(),
        }
    }

    pub fn read(location: impl std::fmt::Display, reason: impl Into<anyhow::Error>) -> Self {
        StoreError::Read {
            location: location.to_string(),
            reason: reason.into(),
        }
    }

    pub fn write(location: impl std::fmt::Display, reason: impl Into<anyhow::Error>) -> Self {
        StoreError::Write {
            location: location.to_string(),
            reason: reason.into(),
        }
    }

    /// True if the persisted set itself is malformed
    pub fn is_parse_error(&self) -> bool {
        matches!(self, StoreError::Parse { .. })
    }
}

/// Any failure while asking a language model for a completion
///
/// Network, authentication, quota and decoding failures are not distinguished;
/// callers only ever report them.
#[derive(Error, Debug)]
#[error("{0:#}")]
pub struct RequestError(anyhow::Error);

impl RequestError {
    pub fn new(err: impl Into<anyhow::Error>) -> Self {
        RequestError(err.into())
    }

    pub fn msg(message: impl Into<String>) -> Self {
        RequestError(anyhow::Error::msg(message.into()))
    }
}

impl From<anyhow::Error> for RequestError {
    fn from(err: anyhow::Error) -> Self {
        RequestError(err)
    }
}
