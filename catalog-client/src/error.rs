use strum_macros::Display;

/// Coarse classification of a failed catalog call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ErrorKind {
    /// The catalog answered 404. Listings never surface this; they turn it
    /// into an empty page.
    NotFound,
    /// Any other failure: non-success status, network trouble, bad payload.
    RequestFailed,
}

/// Errors returned by [`crate::CatalogClient`].
///
/// Cloneable because every caller sharing a coalesced request receives its
/// own copy of the outcome.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("request to {url} failed with status {status}")]
    Status { url: String, status: u16 },
    #[error("request to {url} could not be completed: {message}")]
    Transport { url: String, message: String },
    #[error("unexpected response body from {url}: {message}")]
    Decode { url: String, message: String },
    #[error("invalid url {url}: {message}")]
    InvalidUrl { url: String, message: String },
    #[error("request for {key} was abandoned: {message}")]
    Abandoned { key: String, message: String },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Status { status: 404, .. } => ErrorKind::NotFound,
            _ => ErrorKind::RequestFailed,
        }
    }

    /// HTTP status carried by the error, if the catalog answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
