use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::PgPool;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use planpm_api::advisor::{AdvisorConfig, FailurePredictor, HttpFailurePredictor};
use planpm_api::bootstrap::{ensure_super_admin, BootstrapAdmin};
use planpm_api::config::ServerConfig;
use planpm_api::router::build_app_router;
use planpm_api::state::AppState;

const DEFAULT_LOG_FILTER: &str = "planpm_api=debug,planpm_db=info,tower_http=debug";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = config.port,
        cors_origins = ?config.cors_origins,
        projection_strict = config.projection_strict,
        "Starting Plan-PM API",
    );

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = prepare_database(&database_url).await;

    if let Some(admin) = BootstrapAdmin::from_env() {
        ensure_super_admin(&pool, &admin)
            .await
            .expect("Failed to create bootstrap admin");
    }

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        predictor: config.advisor.clone().map(build_predictor),
    };
    if state.predictor.is_none() {
        tracing::warn!("ADVISOR_API_KEY not set, failure prediction disabled");
    }

    let app = build_app_router(state, &config);

    let host = config.host.parse().expect("HOST must be an IP address");
    let addr = SocketAddr::new(host, config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Server stopped");
}

/// Connect, verify and migrate. Any failure aborts startup.
async fn prepare_database(url: &str) -> PgPool {
    let pool = planpm_db::create_pool(url)
        .await
        .expect("Failed to connect to database");
    planpm_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    planpm_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database ready");
    pool
}

fn build_predictor(advisor: AdvisorConfig) -> Arc<dyn FailurePredictor> {
    tracing::info!(model = %advisor.model, "Failure prediction enabled");
    Arc::new(HttpFailurePredictor::new(advisor).expect("Failed to build advisor HTTP client"))
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let interrupt = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        () = interrupt => "SIGINT",
        () = terminate => "SIGTERM",
    };
    tracing::info!(signal, "Shutting down");
}
