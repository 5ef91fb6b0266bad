use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, Method},
    middleware,
    routing::{get, patch, post},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::errors::{ApiError, UNKNOWN_ROUTE};
use crate::openapi::ApiDoc;
use crate::state::AppState;

pub mod auth;
pub mod places;
pub mod users;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn unknown_route() -> ApiError {
    ApiError::NotFound(UNKNOWN_ROUTE.into())
}

/// Room for the text fields and multipart framing around the image.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Any origin; the methods and headers the browser client sends.
pub fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([
            header::ORIGIN,
            HeaderName::from_static("x-requested-with"),
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ])
}

/// Build the full application router: public reads and auth endpoints,
/// bearer-protected place mutations, and the uploaded image files.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let images = ServeDir::new(state.images.dir());
    let body_limit = DefaultBodyLimit::max(state.images.max_bytes().saturating_add(FORM_OVERHEAD_BYTES));

    let public = Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/api/places/:pid", get(places::get_place))
        .route("/api/places/user/:uid", get(places::list_user_places))
        .route("/api/users", get(users::list_users))
        .route("/api/users/signup", post(users::signup))
        .route("/api/users/login", post(users::login));

    let protected = Router::new()
        .route("/api/places", post(places::create_place))
        .route("/api/places/:pid", patch(places::update_place).delete(places::delete_place))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer_token_state,
        ));

    public
        .merge(protected)
        .nest_service("/uploads/images", images)
        .fallback(unknown_route)
        .layer(body_limit)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // status code and latency
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx and transport failures
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
