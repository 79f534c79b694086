pub mod app_state;
pub mod config;
pub mod customer;
pub mod customer_handlers;
pub mod extract;
pub mod memory_repository;
pub mod metrics;
pub mod pg_repository;
pub mod repository;

use axum::{
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::get,
    Router,
};
use common_http_errors::http_error_metrics_layer;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

pub use app_state::AppState;
pub use common_http_errors::ApiError;
pub use customer::{Customer, CustomerFields, NewCustomer};
pub use memory_repository::InMemoryCustomerRepository;
pub use pg_repository::PgCustomerRepository;
pub use repository::{CustomerRepository, RepositoryError, RepositoryResult};

use customer_handlers::{create_customer, delete_customer, get_customer, list_customers, update_customer};
use metrics::render_metrics;

pub const SERVICE_NAME: &str = "customer-service";

/// Resourceful `/customers` routes plus health and metrics endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/customers", get(list_customers).post(create_customer))
        .route(
            "/customers/:id",
            get(get_customer)
                .put(update_customer)
                .patch(update_customer)
                .delete(delete_customer),
        )
        .route("/healthz", get(|| async { "ok" }))
        .route("/internal/metrics", get(render_metrics))
        .route("/metrics", get(render_metrics))
        .with_state(state)
        .layer(middleware::from_fn(http_error_metrics_layer(SERVICE_NAME)))
        .layer(TraceLayer::new_for_http())
}

pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(
            allowed_origins
                .iter()
                .filter_map(|origin| origin.parse::<HeaderValue>().ok())
                .collect::<Vec<_>>(),
        ))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers([ACCEPT, CONTENT_TYPE])
}
