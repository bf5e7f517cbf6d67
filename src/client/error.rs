use reqwest::StatusCode;
use thiserror::Error;

use super::Operation;
use crate::models::ErrorBody;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-2xx status. Displays as the label the
    /// operation documents for that status.
    #[error("{label}")]
    Status {
        operation: Operation,
        status: StatusCode,
        label: &'static str,
        body: String,
    },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{operation} returned an unexpected body: {source}")]
    Decode {
        operation: Operation,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not build request url: {0}")]
    Url(#[from] url::ParseError),
    #[error("auth token is not a valid header value")]
    InvalidToken,
    #[error("{0} needs an auth token")]
    MissingToken(Operation),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            _ => None,
        }
    }

    pub fn label(&self) -> Option<&'static str> {
        match self {
            ApiError::Status { label, .. } => Some(*label),
            _ => None,
        }
    }

    /// The backend's own `{"status", "error"}` body, when it sent one.
    pub fn error_body(&self) -> Option<ErrorBody> {
        match self {
            ApiError::Status { body, .. } => serde_json::from_str(body).ok(),
            _ => None,
        }
    }
}
