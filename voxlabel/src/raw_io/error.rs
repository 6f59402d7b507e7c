//! Error types for raw volume I/O.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification of a [`RawIoError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawIoErrorKind {
    FileOpen,
    FileRead,
    FileWrite,
    Unknown,
}

/// Errors that can occur while reading or writing raw volumes.
#[derive(Debug, Error)]
pub enum RawIoError {
    #[error("Failed to open raw file '{path}': {source}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read raw file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write raw file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid raw volume request for '{path}': {reason}")]
    Unknown { path: PathBuf, reason: String },
}

impl RawIoError {
    pub fn kind(&self) -> RawIoErrorKind {
        match self {
            Self::FileOpen { .. } => RawIoErrorKind::FileOpen,
            Self::FileRead { .. } => RawIoErrorKind::FileRead,
            Self::FileWrite { .. } => RawIoErrorKind::FileWrite,
            Self::Unknown { .. } => RawIoErrorKind::Unknown,
        }
    }
}

/// Returned when parsing an unrecognized element type name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown element type '{0}'")]
pub struct UnknownElementType(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_open_message() {
        let err = RawIoError::FileOpen {
            path: PathBuf::from("/data/ct.raw"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.kind(), RawIoErrorKind::FileOpen);
        let msg = err.to_string();
        assert!(msg.contains("/data/ct.raw"));
        assert!(msg.contains("missing"));
    }

    #[test]
    fn test_unknown_message() {
        let err = RawIoError::Unknown {
            path: PathBuf::from("ct.raw"),
            reason: "zero-sized dimensions".into(),
        };
        assert_eq!(err.kind(), RawIoErrorKind::Unknown);
        assert_eq!(
            err.to_string(),
            "Invalid raw volume request for 'ct.raw': zero-sized dimensions"
        );
    }

    #[test]
    fn test_unknown_element_type_message() {
        let err = UnknownElementType("double".into());
        assert_eq!(err.to_string(), "Unknown element type 'double'");
    }
}
