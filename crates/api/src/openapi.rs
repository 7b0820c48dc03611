// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! `OpenAPI` documentation endpoints
//!
//! Serves the [`ApiDoc`] document as JSON and a Swagger UI page that renders it.
//! The page takes its title and description from the document itself.

use std::sync::LazyLock;

use axum::{Json, response::Html};
use utoipa::OpenApi;

use crate::docs::ApiDoc;

/// Path the `OpenAPI` JSON document is served from
pub const OPENAPI_JSON_PATH: &str = "/api-doc/openapi.json";

/// Path of the Swagger UI page
pub const SWAGGER_UI_PATH: &str = "/swagger-ui";

const SWAGGER_UI_VERSION: &str = "5.17.14";

static SWAGGER_UI_PAGE: LazyLock<String> = LazyLock::new(|| {
    let info = ApiDoc::openapi().info;
    swagger_page(&info.title, info.description.as_deref().unwrap_or_default())
});

/// `OpenAPI` specification endpoint
pub async fn openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Swagger UI endpoint
pub async fn swagger_ui() -> Html<&'static str> {
    Html(SWAGGER_UI_PAGE.as_str())
}

fn swagger_page(title: &str, description: &str) -> String {
    let cdn = format!("https://unpkg.com/swagger-ui-dist@{SWAGGER_UI_VERSION}");
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="description" content="{description}">
    <title>{title}</title>
    <link rel="stylesheet" type="text/css" href="{cdn}/swagger-ui.css" />
    <style>
        html {{ box-sizing: border-box; overflow-y: scroll; }}
        body {{ margin: 0; background: #fafafa; }}
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="{cdn}/swagger-ui-bundle.js"></script>
    <script>
        window.onload = function() {{
            SwaggerUIBundle({{
                url: '{OPENAPI_JSON_PATH}',
                dom_id: '#swagger-ui',
                deepLinking: true,
                defaultModelsExpandDepth: -1,
                tryItOutEnabled: true
            }});
        }}
    </script>
</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn swagger_page_points_at_document() {
        let Html(page) = swagger_ui().await;

        assert!(page.contains("<title>Blob Properties API</title>"));
        assert!(page.contains("property listing document"));
        assert!(page.contains("url: '/api-doc/openapi.json'"));
    }
}
