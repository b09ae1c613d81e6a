//! Route configuration.

use crate::auth::trace_middleware;
use crate::handlers;
use crate::metrics::metrics_handler;
use crate::state::AppState;
use axum::Router;
use axum::middleware;
use axum::routing::get;
use tower_http::trace::TraceLayer;

/// Create the application router.
///
/// Static segments take precedence over parameters, so `/register/...`,
/// `/v1/health` and `/{username}/overrides` are never read as a day lookup.
pub fn create_router(state: AppState) -> Router {
    let service_routes = Router::new()
        .route("/", get(handlers::index))
        // Health check (unauthenticated for load balancers/k8s probes)
        .route("/v1/health", get(handlers::health_check));

    let user_routes = Router::new()
        .route(
            "/register/{username}",
            get(handlers::register_user).post(handlers::register_user),
        )
        .route("/{username}/overrides", get(handlers::list_overrides))
        .route(
            "/{username}/{date}",
            get(handlers::lookup_day).put(handlers::put_override),
        );

    let mut router = Router::new().merge(service_routes).merge(user_routes);

    // The metrics endpoint is unauthenticated; restrict it at the network level.
    if state.config.server.metrics_enabled {
        let metrics_routes = Router::new().route("/metrics", get(metrics_handler));
        router = router.merge(metrics_routes);
    }

    // Order of execution: TraceLayer -> trace span -> Handler
    router
        .layer(middleware::from_fn(trace_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
