pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;
pub mod utils;

use std::time::Duration;

use axum::http::HeaderValue;
use common::StorageBackend;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable as ScalarServable};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::CorsConfig;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "TubeHub API",
        version = "1.0.0",
        description = "Backend for a video-sharing platform: videos, comments, likes, tweets, subscriptions, playlists and channel dashboards"
    ),
    tags(
        (name = "Healthcheck", description = "Service liveness"),
        (name = "Videos", description = "Video upload, listing and management"),
        (name = "Comments", description = "Comments on videos"),
        (name = "Likes", description = "Likes on videos, comments and tweets"),
        (name = "Tweets", description = "Short text posts"),
        (name = "Subscriptions", description = "Channel subscriptions"),
        (name = "Playlists", description = "Ordered video collections"),
        (name = "Dashboard", description = "Channel statistics"),
    ),
    modifiers(&SecurityAddon),
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// No configured origins means any origin is allowed.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allow_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(config.max_age))
}

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api", routes::api_routes(&state.config))
        .split_for_parts();

    let storage = &state.config.storage;
    let mount = storage.public_base_url.trim_end_matches('/');
    let media_dir = (storage.backend == StorageBackend::Filesystem
        && mount.starts_with('/'))
    .then(|| (mount.to_string(), storage.root_dir.clone()));
    let cors = cors_layer(&state.config.server.cors);

    let mut app = router
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api.clone()))
        .merge(Scalar::with_url("/scalar", api));

    // The filesystem store's public URLs point back at this process.
    if let Some((mount, root)) = media_dir {
        app = app.nest_service(&mount, ServeDir::new(root));
    }

    app.layer(cors).layer(TraceLayer::new_for_http())
}
