// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Blob client configuration

use std::{fmt, path::PathBuf, time::Duration};

use crate::{error::BlobConfigError, non_empty_string::NonEmptyString};

/// Failure log location used when none is configured
pub const DEFAULT_LOG_FILE_PATH: &str = "blob-error-log.txt";

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Configuration for the blob client
#[derive(Clone)]
pub struct BlobConfig {
    /// Base URL of the blob, without the SAS token
    pub blob_url: NonEmptyString,
    /// SAS query-string fragment appended verbatim to `blob_url`
    pub sas_token: String,
    /// Timeout applied by the HTTP client to the whole request
    pub timeout: Duration,
    /// Path of the append-only failure log
    pub log_file_path: PathBuf,
}

impl BlobConfig {
    /// Create a configuration with the default timeout and log path
    ///
    /// # Errors
    ///
    /// Returns `BlobConfigError::MissingBlobUrl` if `blob_url` is blank
    pub fn new(
        blob_url: impl Into<String>,
        sas_token: impl Into<String>,
    ) -> Result<Self, BlobConfigError> {
        let blob_url = NonEmptyString::new(blob_url).map_err(BlobConfigError::MissingBlobUrl)?;

        Ok(Self {
            blob_url,
            sas_token: sas_token.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            log_file_path: PathBuf::from(DEFAULT_LOG_FILE_PATH),
        })
    }

    /// Override the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the failure log path
    #[must_use]
    pub fn with_log_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file_path = path.into();
        self
    }

    /// The URL that is actually requested: base URL followed by the SAS token
    ///
    /// No encoding or delimiter handling is done, so the token must already be a valid
    /// URL suffix, normally a query string starting with `?`.
    pub fn request_url(&self) -> String {
        format!("{}{}", self.blob_url, self.sas_token)
    }

    /// Whether the token is empty or starts like a query string fragment
    pub fn token_looks_like_query(&self) -> bool {
        self.sas_token.is_empty() || self.sas_token.starts_with(['?', '&'])
    }
}

impl fmt::Debug for BlobConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sas_token = if self.sas_token.is_empty() {
            ""
        } else {
            "<redacted>"
        };

        f.debug_struct("BlobConfig")
            .field("blob_url", &self.blob_url.as_str())
            .field("sas_token", &sas_token)
            .field("timeout", &self.timeout)
            .field("log_file_path", &self.log_file_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOB_URL: &str = "https://listings.blob.core.windows.net/data/properties.json";

    #[test]
    fn request_url_is_plain_concatenation() {
        let config = BlobConfig::new(BLOB_URL, "?sv=2022-11-02&sig=a%2Bb").unwrap();
        assert_eq!(
            config.request_url(),
            format!("{BLOB_URL}?sv=2022-11-02&sig=a%2Bb")
        );

        let config = BlobConfig::new(BLOB_URL, "sv=1").unwrap();
        assert_eq!(config.request_url(), format!("{BLOB_URL}sv=1"));
        assert!(!config.token_looks_like_query());
    }

    #[test]
    fn blank_blob_url_is_rejected() {
        let result = BlobConfig::new("   ", "?sig=abc");
        assert!(matches!(result, Err(BlobConfigError::MissingBlobUrl(_))));
    }

    #[test]
    fn defaults_apply() {
        let config = BlobConfig::new(BLOB_URL, "").unwrap();
        assert_eq!(config.log_file_path, PathBuf::from(DEFAULT_LOG_FILE_PATH));
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECONDS));
        assert!(config.token_looks_like_query());
    }

    #[test]
    fn debug_output_redacts_token() {
        let config = BlobConfig::new(BLOB_URL, "?sig=super-secret").unwrap();
        let debug = format!("{config:?}");

        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
        assert!(debug.contains(BLOB_URL));
    }
}
