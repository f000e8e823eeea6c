use std::any::Any;
use std::future::ready;
use std::path::Path;
use std::sync::Arc;

use axum::{
    handler::HandlerWithoutStateExt,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{self, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::api::ApiError;
use crate::handlers::timestamp::{current_timestamp, parse_timestamp};
use crate::metrics_middleware::track_metrics;
use crate::time::TimeSource;

#[derive(Clone)]
pub struct AppState {
    pub timesource: Arc<dyn TimeSource + Send + Sync>,
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic message"
    };
    tracing::error!("handler panicked: {}", details);

    ApiError::Internal.into_response()
}

pub fn router<TZ>(timesource: TZ, static_dir: &Path, metrics: Option<PrometheusHandle>) -> Router
where
    TZ: TimeSource + Send + Sync + 'static,
{
    let state = AppState {
        timesource: Arc::new(timesource),
    };

    // Browsers call the API straight from other sites, so anyone may ask.
    let cors = CorsLayer::new()
        .allow_origin(cors::Any)
        .allow_methods(cors::Any)
        .allow_headers(cors::Any);

    // Anything that isn't an API route is looked up on disk, "/" gives index.html
    let static_files = ServeDir::new(static_dir)
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(not_found.into_service());

    let status_router = Router::new()
        .route("/_readiness", get(|| ready(StatusCode::OK)))
        .route("/_liveness", get(|| ready(StatusCode::OK)));

    // The trailing slash is optional, and other methods are a 404 rather than a 405
    let api_router = Router::new()
        .route("/api", get(current_timestamp).fallback(not_found))
        .route("/api/", get(current_timestamp).fallback(not_found))
        .route("/api/:date", get(parse_timestamp).fallback(not_found))
        .route("/api/:date/", get(parse_timestamp).fallback(not_found));

    let router = Router::new().merge(status_router).merge(api_router);

    // Don't install metrics unless asked to
    // Installing a global recorder when used as a library (during tests etc)
    // does not work well.
    let router = match metrics {
        Some(recorder_handle) => {
            router.route("/metrics", get(move || ready(recorder_handle.render())))
        }
        None => router,
    };

    router
        .fallback_service(static_files)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(track_metrics))
        .layer(cors)
        .with_state(state)
}
