// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP request handlers module
//!
//! This module provides HTTP request handlers for the blob properties server:
//! the health check and the property list endpoint.

use std::{sync::Arc, time::Instant};

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use shared_types::PropertyRecord;

use crate::{
    error::ServerError,
    metrics,
    state::{HealthCheck, ServerState},
};

/// Health check endpoint handler
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    summary = "Health check endpoint",
    description = "Returns the current health status of the API service including version, environment information, and the host serving the property blob. The blob itself is not contacted.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthCheck),
        (status = 500, description = "Health check failed", body = String)
    )
)]
pub async fn health_handler(
    State(state): State<ServerState>,
) -> Result<impl IntoResponse, ServerError> {
    let health = state.health_check()?;
    Ok(Json(health))
}

/// Property list
///
/// Fetches the property blob and returns its records unchanged, in blob order.
///
/// # Errors
///
/// Returns `ServerError::BlobRetrieval` if the blob cannot be fetched or parsed. Every
/// failure kind maps to the same 500 response; details go to the blob failure log.
/// Returns `ServerError::TaskJoin` if the fetch task panics.
#[utoipa::path(
    get,
    path = "/api/properties/GetAll",
    tag = "properties",
    summary = "List all properties",
    description = "Fetches the property document from blob storage and returns its records as a JSON array. Field names are passed through exactly as stored.",
    responses(
        (status = 200, description = "Property records from the blob", body = [PropertyRecord]),
        (status = 500, description = "The blob could not be fetched or parsed", body = String)
    )
)]
pub async fn get_all_properties_handler(
    State(state): State<ServerState>,
) -> Result<Json<Vec<PropertyRecord>>, ServerError> {
    let started = Instant::now();
    // Runs on its own task so the failure is still logged if this request is dropped
    let blob_client = Arc::clone(state.blob_client());
    let result = tokio::spawn(async move { blob_client.fetch_records().await }).await?;
    let elapsed = started.elapsed().as_secs_f64();

    match result {
        Ok(records) => {
            metrics::observe_blob_fetch_duration("success", elapsed);
            metrics::set_last_record_count(records.len());
            metrics::inc_requests_by_status(StatusCode::OK);
            Ok(Json(records))
        }
        Err(failure) => {
            metrics::observe_blob_fetch_duration(failure.kind().as_str(), elapsed);
            let error = ServerError::from(failure);
            metrics::inc_requests_by_status(error.status_code());
            Err(error)
        }
    }
}
