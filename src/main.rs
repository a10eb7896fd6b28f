use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use dotenv::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use gymdesk_backend::api::payments::CheckoutState;
use gymdesk_backend::api::webhooks::WebhookState;
use gymdesk_backend::auth::JwtSecret;
use gymdesk_backend::config::AppConfig;
use gymdesk_backend::database::owner_repository::OwnerRepository;
use gymdesk_backend::database::plan_repository::PlanRepository;
use gymdesk_backend::database::subscription_repository::SubscriptionRepository;
use gymdesk_backend::gateway::client::{InstamojoClient, InstamojoConfig};
use gymdesk_backend::health::{HealthChecker, HealthStatus};
use gymdesk_backend::services::checkout::CheckoutService;
use gymdesk_backend::services::reconciler::WebhookReconciler;
use gymdesk_backend::{api, database, logging};

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = AppConfig::from_env()?;
    config.validate()?;
    logging::init_tracing(&config.logging);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting GymDesk backend service"
    );

    let db_pool = database::init_pool_from_config(&config.database).await?;

    let gateway_config = InstamojoConfig::from_env()?;
    info!(
        sandbox = gateway_config.sandbox,
        "Payment gateway configuration loaded"
    );
    let gateway = InstamojoClient::new(gateway_config)?;
    let webhook_salt = gateway.webhook_salt().map(String::from);
    if webhook_salt.is_none() {
        warn!("INSTAMOJO_SALT is not set; webhook signatures will not be verified");
    }

    let checkout = Arc::new(CheckoutService::new(
        PlanRepository::new(db_pool.clone()),
        SubscriptionRepository::new(db_pool.clone()),
        gateway,
    ));
    let reconciler = Arc::new(WebhookReconciler::new(
        SubscriptionRepository::new(db_pool.clone()),
        OwnerRepository::new(db_pool.clone()),
        webhook_salt,
    ));

    let checkout_routes = Router::new()
        .route("/api/payments/create", post(api::payments::create_payment))
        .with_state(Arc::new(CheckoutState {
            service: checkout,
            jwt_secret: JwtSecret(config.auth.jwt_secret.clone()),
        }));

    let webhook_routes = Router::new()
        .route(
            "/webhooks/payment",
            post(api::webhooks::handle_payment_webhook),
        )
        .with_state(Arc::new(WebhookState { reconciler }));

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .route("/health/live", get(liveness))
        .with_state(HealthChecker::new(db_pool.clone()));

    let app = Router::new()
        .route("/", get(root))
        .merge(health_routes)
        .merge(checkout_routes)
        .merge(webhook_routes)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(logging::UuidRequestId))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        );

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

async fn root() -> &'static str {
    "GymDesk backend API"
}

async fn health(
    State(checker): State<HealthChecker>,
) -> Result<Json<HealthStatus>, (StatusCode, String)> {
    let status = checker.check_health().await;
    if status.is_healthy() {
        Ok(Json(status))
    } else {
        Err((
            StatusCode::SERVICE_UNAVAILABLE,
            "Service Unavailable".to_string(),
        ))
    }
}

/// Readiness probe - checks if the service is ready to accept traffic
async fn readiness(
    State(checker): State<HealthChecker>,
) -> Result<Json<HealthStatus>, (StatusCode, String)> {
    health(State(checker)).await
}

/// Liveness probe - checks if the service is alive (basic check)
async fn liveness() -> &'static str {
    "OK"
}
