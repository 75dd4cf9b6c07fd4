//! Error types for the logging facade

use std::io;

use thiserror::Error;

/// Result type alias using LogError
pub type Result<T> = std::result::Result<T, LogError>;

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code usable for programmatic handling
/// and in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogErrorKind {
    /// The sink failed to flush buffered records
    Flush,
    /// A severity name could not be parsed
    InvalidLevel,
    /// A profile name could not be parsed
    InvalidProfile,
}

impl LogErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            LogErrorKind::Flush => "ERR_FLUSH",
            LogErrorKind::InvalidLevel => "ERR_INVALID_LEVEL",
            LogErrorKind::InvalidProfile => "ERR_INVALID_PROFILE",
        }
    }
}

/// Errors surfaced by the logging facade
///
/// Everything else in the facade (caller resolution, field extraction,
/// redundant initialization) degrades instead of failing.
#[derive(Error, Debug)]
pub enum LogError {
    /// Flushing the sink failed; the underlying error is passed through as-is
    #[error("failed to flush log sink: {0}")]
    Flush(#[source] io::Error),

    /// Unrecognized severity name
    #[error("unrecognized log level: {0:?}")]
    InvalidLevel(String),

    /// Unrecognized logging profile name
    #[error("unrecognized logging profile: {0:?}")]
    InvalidProfile(String),
}

impl LogError {
    /// Get the error kind
    pub fn kind(&self) -> LogErrorKind {
        match self {
            LogError::Flush(_) => LogErrorKind::Flush,
            LogError::InvalidLevel(_) => LogErrorKind::InvalidLevel,
            LogError::InvalidProfile(_) => LogErrorKind::InvalidProfile,
        }
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    /// The underlying I/O error of a flush failure
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            LogError::Flush(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for LogError {
    fn from(err: io::Error) -> Self {
        LogError::Flush(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_codes() {
        assert_eq!(LogErrorKind::Flush.code(), "ERR_FLUSH");
        assert_eq!(LogErrorKind::InvalidLevel.code(), "ERR_INVALID_LEVEL");
        assert_eq!(LogErrorKind::InvalidProfile.code(), "ERR_INVALID_PROFILE");
    }

    #[test]
    fn test_flush_error_preserves_io_error() {
        let err: LogError = io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed").into();

        assert_eq!(err.kind(), LogErrorKind::Flush);
        let io = err.io_error().expect("flush error carries io error");
        assert_eq!(io.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(io.to_string(), "pipe closed");
    }

    #[test]
    fn test_display() {
        let err = LogError::InvalidLevel("loud".to_string());
        assert_eq!(err.to_string(), "unrecognized log level: \"loud\"");
        assert_eq!(err.code(), "ERR_INVALID_LEVEL");
    }
}
