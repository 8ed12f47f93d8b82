//! Result normalization for the invoicing API.
//!
//! # Design
//! Every transport outcome funnels into exactly one `ApiProblem` variant;
//! callers never see a raw status code or transport error. The set is
//! closed on purpose — stores match on kinds, and `Display` doubles as the
//! human-readable message they surface.

use thiserror::Error;

use crate::http::TransportError;

/// Outcome of an API call: the extracted payload, or one classified problem.
pub type ApiResult<T> = Result<T, ApiProblem>;

/// The ways an API call can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiProblem {
    /// The call did not complete within the transport timeout.
    #[error("request timed out")]
    Timeout,

    /// The server could not be reached.
    #[error("cannot connect to server")]
    CannotConnect,

    /// The server returned a 5xx status.
    #[error("server error (status {status})")]
    ServerError { status: u16 },

    /// The server returned 401.
    #[error("unauthorized")]
    Unauthorized,

    /// The server returned 403.
    #[error("forbidden")]
    Forbidden,

    /// The server returned 404.
    #[error("not found")]
    NotFound,

    /// The server returned a 4xx status other than 401/403/404.
    #[error("request rejected (status {status})")]
    Rejected { status: u16 },

    /// A non-2xx status outside the 4xx/5xx ranges.
    #[error("unexpected response (status {status})")]
    Unknown { status: u16 },

    /// The response arrived but the expected payload could not be read.
    #[error("malformed response payload")]
    BadData,
}

impl ApiProblem {
    /// Classify a non-success HTTP status code.
    pub(crate) fn from_status(status: u16) -> Self {
        match status {
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            400..=499 => Self::Rejected { status },
            500..=599 => Self::ServerError { status },
            _ => Self::Unknown { status },
        }
    }
}

impl From<TransportError> for ApiProblem {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::TimedOut => Self::Timeout,
            TransportError::ConnectionFailed(_) => Self::CannotConnect,
        }
    }
}
