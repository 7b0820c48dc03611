// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for blob fetch operations

use std::{error::Error as StdError, fmt};

use reqwest::StatusCode;
use thiserror::Error;

/// Failures of a single blob fetch
///
/// The `Display` output is the line written to the failure log, prefixed by kind.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BlobError {
    /// The request could not be completed or the blob endpoint returned a non-success status
    #[error("HTTP error: {message}")]
    Transport {
        /// Status code returned by the blob endpoint, if a response was received
        status: Option<u16>,
        /// Error message
        message: String,
    },

    /// The body was not a JSON array of objects, or decoded to `null`
    #[error("JSON error: {message}")]
    Deserialization {
        /// Error message
        message: String,
    },

    /// Any other failure while fetching the blob
    #[error("General error: {message}")]
    Unexpected {
        /// Error message
        message: String,
    },
}

/// Coarse classification of a [`BlobError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlobErrorKind {
    /// See [`BlobError::Transport`]
    Transport,
    /// See [`BlobError::Deserialization`]
    Deserialization,
    /// See [`BlobError::Unexpected`]
    Unexpected,
}

impl BlobErrorKind {
    /// Lowercase label, suitable for metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Deserialization => "deserialization",
            Self::Unexpected => "unexpected",
        }
    }
}

impl fmt::Display for BlobErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl BlobError {
    /// Error for a response whose status is outside the 2xx range
    pub fn unsuccessful_status(status: StatusCode) -> Self {
        Self::Transport {
            status: Some(status.as_u16()),
            message: format!(
                "Response status code does not indicate success: {} ({}).",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            ),
        }
    }

    /// Error for a body that decoded to JSON `null`
    pub fn null_payload() -> Self {
        Self::Deserialization {
            message: "Deserialized object is null.".to_string(),
        }
    }

    /// Classification of this error
    pub fn kind(&self) -> BlobErrorKind {
        match self {
            Self::Transport { .. } => BlobErrorKind::Transport,
            Self::Deserialization { .. } => BlobErrorKind::Deserialization,
            Self::Unexpected { .. } => BlobErrorKind::Unexpected,
        }
    }

    /// Upstream status code, for transport errors that received a response
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for BlobError {
    fn from(error: reqwest::Error) -> Self {
        // The request URL carries the SAS token and must never reach a log line.
        let error = error.without_url();
        let message = error_chain(&error);

        if error.is_builder() {
            Self::Unexpected { message }
        } else {
            Self::Transport {
                status: error.status().map(|status| status.as_u16()),
                message,
            }
        }
    }
}

impl From<serde_json::Error> for BlobError {
    fn from(error: serde_json::Error) -> Self {
        Self::Deserialization {
            message: error.to_string(),
        }
    }
}

/// Render an error and its sources as `outer: inner: root`
fn error_chain(error: &dyn StdError) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Errors raised while building a [`BlobClient`](crate::BlobClient)
#[derive(Debug, Error)]
pub enum BlobConfigError {
    /// The blob base URL is missing or blank
    #[error("blob url is required: {0}")]
    MissingBlobUrl(String),

    /// The underlying HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
