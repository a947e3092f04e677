use axum::routing::{get, post};
use axum::Router;
use page_video_bot::db::store::{JobStore, PgJobStore};
use page_video_bot::jobs::scheduler::run_poll_schedule;
use page_video_bot::jobs::worker::JobWorker;
use page_video_bot::{db, AppConfig, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "page_video_bot=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("Starting page video bot");

    // Load configuration
    let config = AppConfig::from_env()?;
    config.validate().map_err(anyhow::Error::msg)?;

    info!("Configuration loaded");

    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;

    let store: Arc<dyn JobStore> = Arc::new(PgJobStore::new(pool));

    // Create job queue
    let (job_sender, job_receiver) = mpsc::unbounded_channel();
    let poll_interval = Duration::from_secs(config.poll_interval_secs);
    let addr = SocketAddr::new(config.host.parse()?, config.port);

    let state = AppState::new(store, config, job_sender.clone())?;

    // Start job worker and the timer that feeds it
    let worker = JobWorker::new(job_receiver, state.poller());
    tokio::spawn(async move {
        worker.start().await;
    });
    tokio::spawn(run_poll_schedule(poll_interval, job_sender));

    // Build router
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/invoke", post(page_video_bot::resolvers::invoke::handle_invoke))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> (axum::http::StatusCode, axum::Json<serde_json::Value>) {
    use axum::http::StatusCode;
    use axum::Json;

    let store_healthy = state.store.health_check().await;

    if store_healthy {
        (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "healthy",
                "store": "connected",
                "version": env!("CARGO_PKG_VERSION"),
            })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({
                "status": "unhealthy",
                "store": "disconnected",
                "version": env!("CARGO_PKG_VERSION"),
            })),
        )
    }
}
