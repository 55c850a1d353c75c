//! Error types and handling for lnkshare.

use std::fmt;

/// Structure of the link file a decode error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// ShellLinkHeader
    Header,
    /// LinkTargetIDList
    TargetIdList,
    /// LinkInfo and its VolumeID / CommonNetworkRelativeLink children
    LinkInfo,
    /// StringData entries
    StringData,
    /// Extra data chain. Reserved: block bodies are not decoded.
    ExtraData,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Header => "ShellLinkHeader",
            ErrorKind::TargetIdList => "LinkTargetIDList",
            ErrorKind::LinkInfo => "LinkInfo",
            ErrorKind::StringData => "StringData",
            ErrorKind::ExtraData => "ExtraData",
        };
        f.write_str(name)
    }
}

/// Custom error type for lnkshare operations
#[derive(Debug)]
pub enum Error {
    /// I/O related errors
    Io(std::io::Error),
    /// JSON serialization errors
    Json(serde_json::Error),
    /// Structural violation in a link file, tagged with the offending field
    Decode {
        kind: ErrorKind,
        field: &'static str,
        message: String,
    },
    /// A read would have crossed the end of the available bytes
    OutOfBounds {
        offset: u64,
        size: u64,
        available: u64,
    },
    /// Invalid input or configuration
    InvalidInput(String),
    /// Generic error with message
    Generic(String),
}

impl Error {
    pub(crate) fn decode(kind: ErrorKind, field: &'static str, message: impl Into<String>) -> Self {
        Error::Decode {
            kind,
            field,
            message: message.into(),
        }
    }

    /// Structure the error was raised for, if it is a decode error
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Error::Decode { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Name of the offending field, if it is a decode error
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Error::Decode { field, .. } => Some(field),
            _ => None,
        }
    }

    /// True for any structural decode failure, including truncation
    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Decode { .. } | Error::OutOfBounds { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::Json(err) => write!(f, "JSON error: {}", err),
            Error::Decode { kind, field, message } => {
                write!(f, "{} error in field {}: {}", kind, field, message)
            }
            Error::OutOfBounds { offset, size, available } => write!(
                f,
                "read of {} bytes at offset 0x{:X} exceeds {} available bytes",
                size, offset, available
            ),
            Error::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Error::Generic(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Json(err) => Some(err),
            _ => None,
        }
    }
}

// Convenient conversion traits
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Generic(err.to_string())
    }
}

/// Attach structure and field context to low-level read failures.
///
/// Bounds and end-of-stream failures become [`Error::Decode`] for the given
/// field; decode errors that already carry a field pass through untouched.
pub(crate) trait DecodeContext<T> {
    fn context(self, kind: ErrorKind, field: &'static str) -> Result<T>;
}

impl<T> DecodeContext<T> for Result<T> {
    fn context(self, kind: ErrorKind, field: &'static str) -> Result<T> {
        self.map_err(|err| match err {
            Error::OutOfBounds { .. } => Error::decode(kind, field, format!("truncated: {}", err)),
            Error::Io(io) if io.kind() == std::io::ErrorKind::UnexpectedEof => {
                Error::decode(kind, field, format!("truncated: {}", io))
            }
            other => other,
        })
    }
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, Error>;
