// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Property blob client
//!
//! [`BlobClient`] issues one GET against `blob_url + sas_token`, checks the status, and
//! parses the body into [`PropertyRecord`]s. Failures are appended to the [`ErrorLog`],
//! reported through `tracing`, and returned unchanged.

use reqwest::Client;
use shared_types::PropertyRecord;
use tracing::{debug, error, warn};

use crate::{
    config::BlobConfig,
    error::{BlobConfigError, BlobError, BlobErrorKind},
    error_log::ErrorLog,
};

const USER_AGENT: &str = concat!("blob-properties-api/", env!("CARGO_PKG_VERSION"));

/// Client for the property blob
#[derive(Debug)]
pub struct BlobClient {
    client: Client,
    config: BlobConfig,
    error_log: ErrorLog,
}

impl BlobClient {
    /// Create a client with its own HTTP connection pool
    ///
    /// # Errors
    ///
    /// Returns `BlobConfigError::HttpClient` if the HTTP client cannot be built
    pub fn new(config: BlobConfig) -> Result<Self, BlobConfigError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self::with_client(config, client))
    }

    /// Create a client that shares an existing HTTP client
    ///
    /// The caller owns the client's timeouts and pooling; `config.timeout` is not applied.
    pub fn with_client(config: BlobConfig, client: Client) -> Self {
        let error_log = ErrorLog::new(config.log_file_path.clone());
        Self {
            client,
            config,
            error_log,
        }
    }

    /// Client configuration
    pub fn config(&self) -> &BlobConfig {
        &self.config
    }

    /// Failure log this client writes to
    pub fn error_log(&self) -> &ErrorLog {
        &self.error_log
    }

    /// Fetch the blob and parse it into property records
    ///
    /// The records are returned exactly as they appear in the blob's JSON array.
    ///
    /// # Errors
    ///
    /// - `BlobError::Transport` if the request fails or the status is not 2xx
    /// - `BlobError::Deserialization` if the body is not a JSON array of objects or is `null`
    /// - `BlobError::Unexpected` for anything else, such as an unusable request URL
    pub async fn fetch_records(&self) -> Result<Vec<PropertyRecord>, BlobError> {
        match self.request_records().await {
            Ok(records) => {
                debug!(count = records.len(), "fetched property records from blob");
                Ok(records)
            }
            Err(error) => {
                self.record_failure(&error).await;
                Err(error)
            }
        }
    }

    async fn request_records(&self) -> Result<Vec<PropertyRecord>, BlobError> {
        debug!(blob_url = %self.config.blob_url, "fetching property blob");

        let response = self.client.get(self.config.request_url()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BlobError::unsuccessful_status(status));
        }

        let body = response.text().await?;
        parse_records(&body)
    }

    async fn record_failure(&self, failure: &BlobError) {
        if let Err(log_error) = self.error_log.append(&failure.to_string()).await {
            warn!(
                path = %self.error_log.path().display(),
                error = %log_error,
                "failed to append to blob error log"
            );
        }

        match failure.kind() {
            BlobErrorKind::Transport => error!(
                error = %failure,
                status = ?failure.status(),
                "transport failure while accessing blob"
            ),
            BlobErrorKind::Deserialization => {
                error!(error = %failure, "failed to parse blob data");
            }
            BlobErrorKind::Unexpected => {
                error!(error = %failure, "unexpected error while fetching blob");
            }
        }
    }
}

/// Parse a blob body into property records
///
/// A JSON `null` body is an error rather than an empty list.
///
/// # Errors
///
/// Returns `BlobError::Deserialization` for invalid JSON, non-array documents,
/// non-object elements, or `null`
pub fn parse_records(body: &str) -> Result<Vec<PropertyRecord>, BlobError> {
    let records: Option<Vec<PropertyRecord>> = serde_json::from_str(body)?;
    records.ok_or_else(BlobError::null_payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_records_keeps_array_order() {
        let records =
            parse_records(r#"[{"Name":"A","Price":100},{"Name":"B"},{"name":"C"}]"#).unwrap();

        let names: Vec<_> = records.iter().filter_map(|r| r.get_str("NAME")).collect();
        assert_eq!(names, ["A", "B", "C"]);
    }

    #[test]
    fn parse_records_distinguishes_null_from_empty() {
        assert_eq!(parse_records("[]").unwrap(), Vec::new());
        assert_eq!(parse_records(" null ").unwrap_err(), BlobError::null_payload());
    }

    #[test]
    fn parse_records_rejects_other_shapes() {
        for body in ["", "not json", "{\"Name\":\"A\"}", "[1, 2]", "[{\"Name\":\"A\"}"] {
            let error = parse_records(body).unwrap_err();
            assert_eq!(error.kind(), BlobErrorKind::Deserialization, "body: {body}");
        }
    }

    #[test]
    fn new_client_uses_configured_log_path() {
        let config = BlobConfig::new("http://127.0.0.1:9/properties.json", "?sig=abc")
            .unwrap()
            .with_log_file_path("logs/failures.txt");
        let client = BlobClient::new(config).unwrap();

        assert_eq!(
            client.error_log().path(),
            std::path::Path::new("logs/failures.txt")
        );
        assert_eq!(client.config().sas_token, "?sig=abc");
    }
}
