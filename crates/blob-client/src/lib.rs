// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Blob storage client for property listing documents
//!
//! This crate fetches a JSON document from blob storage through a SAS-signed URL and
//! parses it into [`PropertyRecord`]s.
//!
//! # Architecture
//!
//! - **Client**: [`client::BlobClient`] - performs the single GET and parses the body
//! - **Configuration**: [`config::BlobConfig`] - base URL, SAS token, timeout and log path
//! - **Errors**: [`error::BlobError`] - transport, deserialization and unexpected failures
//! - **Failure log**: [`error_log::ErrorLog`] - append-only text file with one line per failure
//! - **Validation Utilities**: [`non_empty_string::NonEmptyString`] - ensures non-empty string constraints
//!
//! Every failed fetch is written to the failure log and to `tracing` before the original
//! error is handed back to the caller. Nothing is retried.

pub mod client;
pub mod config;
pub mod error;
pub mod error_log;
pub mod non_empty_string;

pub use client::{BlobClient, parse_records};
pub use config::{BlobConfig, DEFAULT_LOG_FILE_PATH};
pub use error::{BlobConfigError, BlobError, BlobErrorKind};
pub use error_log::ErrorLog;
pub use non_empty_string::NonEmptyString;
pub use shared_types::PropertyRecord;
