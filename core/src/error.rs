//! Error types for the ClickMeeting client.
//!
//! # Design
//! Callers need to tell four situations apart: the request never completed
//! (`Transport`), the vendor rejected it (`Api`), the vendor answered with
//! something we could not read (`Decode`), and the operation exists in the
//! public surface but is not wired up (`NotImplemented`). Each gets its own
//! variant and none of them is retried or swallowed.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by [`Api`](crate::Api) and the `parse_*` methods of
/// [`ClickMeetingClient`](crate::ClickMeetingClient).
#[derive(Debug, Error)]
pub enum Error {
    /// The request could not be sent or the response could not be read.
    #[error("failed to send request: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),

    /// The vendor answered with a non-success status and an error body.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A response body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The operation has no implementation yet.
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),

    /// Client configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn transport(err: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
        Error::Transport(err.into())
    }

    /// True for any vendor-reported error, whatever its code or name.
    pub fn is_api_error(&self) -> bool {
        matches!(self, Error::Api(_))
    }

    pub fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Error::NotImplemented(_))
    }
}

/// Error body returned by the vendor on non-success statuses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiError {
    pub code: i64,
    pub name: String,
    pub errors: Vec<FieldError>,
}

/// One entry of [`ApiError::errors`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldError {
    /// Offending field. The vendor does not always send a string here.
    pub name: serde_json::Value,
    pub message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
        write!(f, "{}-{}: {}", self.code, self.name, messages.join(","))
    }
}

impl std::error::Error for ApiError {}
