// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Blob Properties API Server Implementation
//!
//! This crate provides the HTTP server that serves property listings read from a
//! SAS-signed blob document. It is built with Axum and shares its configuration,
//! middleware, and graceful shutdown machinery with the rest of the workspace.
//!
//! # Module Structure
//!
//! - [`config`]: Server and blob storage configuration with hierarchical loading
//! - [`error`]: Error types and HTTP response handling
//! - [`state`]: Shared application state and health reporting
//! - [`server`]: Main server implementation, lifecycle, and coordinated shutdown
//! - [`routes`]: Route configuration and HTTP request handlers
//! - [`metrics`]: Prometheus counters for property requests and blob fetches
//! - [`docs`] and [`openapi`]: `OpenAPI` specification and Swagger UI endpoints
//!
//! # Key Features
//!
//! - **Property Listing**: `GET /api/properties/GetAll` returns the blob's records unchanged
//! - **Failure Log**: every failed fetch appends a timestamped line to a local file
//! - **Uniform Errors**: all blob failures surface as the same 500 response
//! - **Graceful Shutdown**: coordinated termination using `CancellationToken` with a drain timeout

pub mod config;
pub mod docs;
pub mod error;
pub mod metrics;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{Environment, ServerConfig};
pub use error::{BLOB_RETRIEVAL_MESSAGE, ServerError, ServerResult};
pub use server::{Server, ShutdownConfig};
pub use shared_types::PropertyRecord;
pub use state::{HealthCheck, HealthStatus, ServerState};
