//! Route definitions

use std::any::Any;

use axum::{
    Router,
    http::{
        HeaderName, Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::ApiError, handlers, state::AppState};

/// Create the router with CORS, tracing and panic recovery applied.
pub fn create_router(state: AppState) -> Router {
    let weather = get(handlers::get_weather).options(handlers::options);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/", weather.clone())
        .route("/weather", weather.clone())
        // Path the browser client calls when deployed behind a functions gateway.
        .route("/functions/v1/weather", weather)
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

/// All origins; the header list the browser client sends.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            CONTENT_TYPE,
        ])
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let cause = err
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| err.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "handler panicked".to_string());

    ApiError::Internal(cause).into_response()
}
