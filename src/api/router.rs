use std::any::Any;

use axum::{
    Router,
    http::Method,
    middleware,
    response::{IntoResponse, Response},
    routing::{MethodFilter, MethodRouter, get, on},
};
use tower_http::catch_panic::CatchPanicLayer;

use super::handlers;
use super::health;
use super::middleware::{logging_middleware, observe_request};
use super::routes::Route;
use super::state::AppState;
use super::types::ApiError;
use crate::infrastructure::observability::{MetricsConfig, create_metrics_router};

/// Create the full router for the state's flavour.
///
/// Observed routes run through, outermost first: the observation middleware
/// (metrics and root span), request logging, panic catching, then the
/// handler. Probes and `/metrics` are served outside that chain.
pub fn create_router(state: AppState, metrics_config: &MetricsConfig) -> Router {
    let observed = Route::for_flavour(state.profile.flavour)
        .into_iter()
        .fold(Router::new(), |router, route| {
            router.route(route.path(), method_router(route))
        })
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn_with_state(state.clone(), observe_request));

    let mut router = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .merge(observed)
        .with_state(state.clone());

    if metrics_config.enabled {
        router = router.merge(create_metrics_router(state.metrics, &metrics_config.path));
    }

    router
}

fn method_router(route: Route) -> MethodRouter<AppState> {
    let filter = if route.method() == Method::POST {
        MethodFilter::POST
    } else {
        MethodFilter::GET
    };

    match route {
        Route::Home => on(filter, handlers::homepage),
        Route::Api => on(filter, handlers::my_api),
        Route::Star => on(filter, handlers::add_star),
        Route::Trace => on(filter, handlers::trace_jobs),
        Route::SuccessResponse => on(filter, handlers::client_success_page),
        Route::ClientError => on(filter, handlers::client_error_page),
        Route::ServerError => on(filter, handlers::server_error_page),
    }
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    tracing::error!(panic = %detail, "Handler panicked");
    ApiError::internal("Internal server error").into_response()
}
