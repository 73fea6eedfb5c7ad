use axum::{
    Router,
    http::{HeaderName, Method, header},
    routing::get,
};
use fairshare::api::handlers::api_routes;
use fairshare::api::models::USER_ID_HEADER;
use fairshare::api::openapi::ApiDoc;
use fairshare::config::CONFIG;
use fairshare::core::services::FairshareService;
use fairshare::infrastructure::{logging::in_memory::InMemoryLogging, storage::in_memory::InMemoryStorage};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&CONFIG.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    info!("Effective config: {:?}", *CONFIG);

    // Initialize storage and logging
    let storage = InMemoryStorage::new();
    let logging = InMemoryLogging::with_capacity(CONFIG.app_log_capacity);
    let service = Arc::new(
        FairshareService::new(storage, logging)
            .with_insight_settings(CONFIG.signal_policy, CONFIG.category_budgets.clone())
            .with_monthly_budget(CONFIG.monthly_budget_limit),
    );

    let app = Router::new()
        .route("/", get(|| async { "OK" }))
        .nest("/api", api_routes(service))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(CONFIG.request_timeout_secs)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(USER_ID_HEADER)]),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([127, 0, 0, 1], CONFIG.port));
    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
