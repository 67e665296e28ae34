//! Acado API
//!
//! HTTP surface over the Acado domain services.
//! Handles:
//! - Request routing for universities, courses, forms and publish checks
//! - Rate limiting and backpressure
//! - Observability (logging, metrics, request ids)

pub mod handlers;
pub mod middleware;

use acado_common::{config::AppConfig, db::HealthCheck, Repositories, Services};
use axum::{
    extract::Request,
    middleware::Next,
    routing::{delete, get, patch, post, put},
    Router,
};
use std::sync::Arc;
use tower::{limit::ConcurrencyLimitLayer, ServiceBuilder};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Services,
    pub health: Arc<dyn HealthCheck>,
}

impl AppState {
    pub fn new(config: AppConfig, repos: Repositories) -> Self {
        Self {
            config: Arc::new(config),
            services: Services::new(&repos),
            health: repos.health,
        }
    }
}

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    let config = state.config.clone();

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Universities
        .route(
            "/universities",
            get(handlers::universities::list_universities)
                .post(handlers::universities::create_university),
        )
        .route("/universities/stats", get(handlers::universities::university_stats))
        .route(
            "/universities/{id}",
            get(handlers::universities::get_university)
                .put(handlers::universities::update_university)
                .patch(handlers::universities::update_university)
                .delete(handlers::universities::delete_university),
        )
        .route(
            "/universities/{id}/courses",
            get(handlers::universities::university_courses),
        )

        // Courses
        .route(
            "/courses",
            get(handlers::courses::list_courses).post(handlers::courses::create_course),
        )
        .route(
            "/courses/{id}",
            get(handlers::courses::get_course)
                .put(handlers::courses::update_course)
                .patch(handlers::courses::update_course)
                .delete(handlers::courses::delete_course),
        )

        // Application forms
        .route(
            "/forms",
            get(handlers::forms::list_forms).post(handlers::forms::create_form),
        )
        .route(
            "/forms/{id}",
            get(handlers::forms::get_form)
                .patch(handlers::forms::update_form)
                .delete(handlers::forms::delete_form),
        )
        .route("/forms/{id}/publish", post(handlers::forms::publish_form))
        .route("/forms/{id}/archive", post(handlers::forms::archive_form))
        .route("/forms/{id}/fields", post(handlers::forms::add_field))
        .route("/forms/{id}/fields/order", put(handlers::forms::reorder_fields))
        .route(
            "/forms/{id}/fields/{field_id}",
            patch(handlers::forms::update_field).delete(handlers::forms::remove_field),
        )

        // Form categories
        .route(
            "/form-categories",
            get(handlers::forms::list_categories).post(handlers::forms::create_category),
        )
        .route("/form-categories/{id}", delete(handlers::forms::delete_category))

        // Publish checklists
        .route("/events/publish-check", post(handlers::publish::event_publish_check))
        .route(
            "/scholarships/publish-check",
            post(handlers::publish::scholarship_publish_check),
        );

    let mut router = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))
        .nest("/api", api_routes)
        // Matched route templates are only known once routing has happened
        .route_layer(axum::middleware::from_fn(middleware::metrics::track_metrics));

    if config.rate_limit.enabled {
        let limiter = middleware::rate_limit::create_rate_limiter(
            config.rate_limit.requests_per_second,
            config.rate_limit.burst,
        );
        let requests_per_second = config.rate_limit.requests_per_second;

        router = router.layer(axum::middleware::from_fn(move |request: Request, next: Next| {
            middleware::rate_limit::rate_limit_middleware(
                request,
                next,
                limiter.clone(),
                requests_per_second,
            )
        }));
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(cors)
                // Request timeout
                .layer(TimeoutLayer::new(config.request_timeout()))
                // Concurrency limit for backpressure
                .layer(ConcurrencyLimitLayer::new(config.server.max_concurrent_requests)),
        )
        .with_state(state)
}
