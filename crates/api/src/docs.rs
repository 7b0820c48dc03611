// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! `OpenAPI` document definition

use shared_types::PropertyRecord;
use utoipa::OpenApi;

use crate::{
    config::Environment,
    routes::handlers,
    state::{HealthCheck, HealthStatus},
};

/// `OpenAPI` document for the blob properties API
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "Blob Properties API",
        description = "Serves the property listing document stored in blob storage."
    ),
    paths(handlers::health_handler, handlers::get_all_properties_handler),
    components(schemas(HealthCheck, HealthStatus, Environment, PropertyRecord)),
    tags(
        (name = "health", description = "Service health"),
        (name = "properties", description = "Property listings")
    )
)]
pub struct ApiDoc;
