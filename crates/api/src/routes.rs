// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Routes module
//!
//! This module provides route configuration and handlers for the blob properties server.

pub mod handlers;

use axum::{Router, routing::get};
use handlers::{get_all_properties_handler, health_handler};

use crate::{
    metrics::metrics_handler,
    openapi::{OPENAPI_JSON_PATH, SWAGGER_UI_PATH, openapi_spec, swagger_ui},
    state::ServerState,
};

/// Path of the property list endpoint
pub const GET_ALL_PROPERTIES_PATH: &str = "/api/properties/GetAll";

/// Create application routes
pub fn create_routes() -> Router<ServerState> {
    let health_routes = Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler));

    let docs_routes = Router::new()
        .route(OPENAPI_JSON_PATH, get(openapi_spec))
        .route(SWAGGER_UI_PATH, get(swagger_ui));

    let api_routes = Router::new().route(GET_ALL_PROPERTIES_PATH, get(get_all_properties_handler));

    Router::new()
        .merge(health_routes)
        .merge(docs_routes)
        .merge(api_routes)
}
