use crate::{
    controller::{health_check_controller, kv_controller, publish_controller, request_controller},
    sse, AppState,
};
use axum::{
    routing::{get, post},
    Router,
};

use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "NATS SSE Gateway API"
        ),
        paths(
            health_check_controller::health_check,
            sse::handler::subscribe,
            publish_controller::publish,
            request_controller::request,
            kv_controller::read,
            kv_controller::update,
            kv_controller::delete,
        ),
        components(
            schemas(
                health_check_controller::HealthStatus,
            )
        ),
        modifiers(&SecurityAddon),
        tags(
            (name = "natssse_gateway", description = "HTTP and Server-Sent Events bridge to a NATS backbone")
        )
    )]
struct ApiDoc;

struct SecurityAddon;

// The Authorization header is handed verbatim to the configured authorization gate.
impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "authorization",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    "Authorization",
                    "Opaque credential checked against the subject of each request",
                ))),
            )
        }
    }
}

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes(app_state.clone()))
        .merge(subscribe_routes(app_state.clone()))
        .merge(publish_routes(app_state.clone()))
        .merge(request_routes(app_state.clone()))
        .merge(kv_routes(app_state))
        // **** FIXME: protect the OpenAPI web UI
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn health_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check_controller::health_check))
        .with_state(app_state)
}

// Query form takes the subject literally, path form maps `/` to `.`
// (see params::subject).
fn subscribe_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/subscribe", get(sse::handler::subscribe))
        .route("/subscribe/*subject", get(sse::handler::subscribe))
        .with_state(app_state)
}

fn publish_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/publish", post(publish_controller::publish))
        .route("/publish/*subject", post(publish_controller::publish))
        .with_state(app_state)
}

fn request_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/request", post(request_controller::request))
        .route("/request/*subject", post(request_controller::request))
        .with_state(app_state)
}

fn kv_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/kv",
            get(kv_controller::read)
                .put(kv_controller::update)
                .delete(kv_controller::delete)
                .fallback(kv_controller::unsupported),
        )
        .with_state(app_state)
}
