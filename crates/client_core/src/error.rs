use shared::domain::FilterKind;
use thiserror::Error;

/// Failure of a single catalog API call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request was superseded or aborted before a response arrived.
    #[error("request cancelled")]
    Cancelled,
    #[error("server returned status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("malformed response payload: {0}")]
    Decode(String),
    #[error("catalog api is unavailable")]
    Unavailable,
}

impl FetchError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }
}

impl From<RouteError> for FetchError {
    fn from(value: RouteError) -> Self {
        FetchError::Transport(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("'{id}' is not an option of the {kind} filter")]
    UnknownOption { kind: FilterKind, id: String },
}

/// Why a bulk job was not created.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BulkJobError {
    #[error("no course instances are selected")]
    NothingSelected,
    #[error("a {0} must be selected before creating a bulk job")]
    MissingFilter(FilterKind),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("invalid base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("path parameter '{0}' must not be empty")]
    EmptySegment(&'static str),
}
