use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The envelope came back with a `msg` other than `Success`.
    #[error("API error: {0}")]
    ApiError(String),
    #[error("rate limit exceeded: {0}")]
    RateExceeded(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("transport error: {0}")]
    TransportError(String),
    /// Parse error and the offending body.
    #[error("invalid response ({0}): {1}")]
    InvalidResponse(String, String),
    /// `Success` envelope without any `data`.
    #[error("empty data returned from {0}")]
    EmptyData(String),
    #[error("internal error: {0}")]
    InternalError(String),
}

impl Error {
    pub fn is_rate_exceeded(&self) -> bool {
        matches!(self, Error::RateExceeded(_))
    }
}

/// Map transport-level failures (including non-2xx statuses) to `Error`
pub fn map_api_err(error: reqwest::Error) -> Error {
    match error.status() {
        Some(http::StatusCode::TOO_MANY_REQUESTS) => Error::RateExceeded(error.to_string()),
        Some(http::StatusCode::UNAUTHORIZED) => Error::Unauthorized(error.to_string()),
        _ => Error::TransportError(error.to_string()),
    }
}
