// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Server state management module
//!
//! This module provides shared application state for the blob properties server,
//! including configuration, the blob client, and coordinated cancellation.

use std::sync::Arc;

use blob_client::BlobClient;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use utoipa::ToSchema;

use crate::{
    config::{Environment, ServerConfig},
    error::ServerResult,
};

/// Shared application state with cancellation token support
#[derive(Debug, Clone)]
pub struct ServerState {
    /// Server configuration
    config: ServerConfig,
    /// Client for the property blob
    blob_client: Arc<BlobClient>,
    /// Cancellation token for coordinated shutdown
    pub cancellation_token: CancellationToken,
}

impl ServerState {
    /// Create new server state
    ///
    /// # Arguments
    ///
    /// * `config` - Server configuration
    /// * `blob_client` - Client for the property blob
    /// * `cancellation_token` - Token for coordinated cancellation
    pub fn new(
        config: ServerConfig,
        blob_client: Arc<BlobClient>,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self {
            config,
            blob_client,
            cancellation_token,
        }
    }

    /// Server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Client for the property blob
    pub fn blob_client(&self) -> &Arc<BlobClient> {
        &self.blob_client
    }

    /// Report service health from local configuration only
    ///
    /// The blob itself is not contacted, so a health probe never writes to the failure log.
    pub fn health_check(&self) -> ServerResult<HealthCheck> {
        let blob_config = self.blob_client.config();

        let status = if blob_config.token_looks_like_query() {
            HealthStatus::Up
        } else {
            HealthStatus::Degraded {
                reason: Box::from("sas token does not start with '?' or '&'"),
            }
        };

        let blob_host = url::Url::parse(blob_config.blob_url.as_str())
            .ok()
            .and_then(|url| url.host_str().map(ToString::to_string));

        Ok(HealthCheck {
            status,
            version: Box::from(env!("CARGO_PKG_VERSION")),
            environment: self.config.environment,
            timestamp: chrono::Utc::now().to_rfc3339(),
            blob_host,
        })
    }
}

/// Health status of the service
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub enum HealthStatus {
    /// Service is fully operational
    Up,

    /// Service is running but its configuration is likely to make blob requests fail
    Degraded {
        /// Human-readable explanation of the degradation condition
        reason: Box<str>,
    },
}

/// Health check status
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthCheck {
    /// Service status
    pub status: HealthStatus,
    /// Service version
    pub version: Box<str>,
    /// Environment
    pub environment: Environment,
    /// Timestamp
    pub timestamp: String,
    /// Host serving the property blob
    pub blob_host: Option<String>,
}
