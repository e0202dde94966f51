use std::fmt;

/// Why a single field could not be extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MarkerNotFound,
    MarkerOrderInvalid,
    DecimalParseMalformed,
    DateMarkerNotFound,
    DateWindowMalformed,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::MarkerNotFound => write!(f, "marker not found"),
            ErrorKind::MarkerOrderInvalid => write!(f, "marker order invalid"),
            ErrorKind::DecimalParseMalformed => write!(f, "malformed decimal"),
            ErrorKind::DateMarkerNotFound => write!(f, "date marker not found"),
            ErrorKind::DateWindowMalformed => write!(f, "malformed date window"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ExtractError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ExtractError {
    pub(crate) fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}
