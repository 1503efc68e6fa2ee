use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{info, warn};

use studypoint_common::{
    config::AppConfig,
    db::DbPool,
    metrics::register_metrics,
    store::{CatalogStore, MemCatalog, PgCatalog},
};
use studypoint_server::{create_router, seed_admin, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Arc::new(AppConfig::load()?);
    init_tracing(&config);

    register_metrics();
    if config.observability.metrics_port > 0 {
        PrometheusBuilder::new()
            .with_http_listener(([0, 0, 0, 0], config.observability.metrics_port))
            .install()?;
        info!(
            port = config.observability.metrics_port,
            "prometheus exporter listening"
        );
    }

    if config.uses_dev_jwt_secret() {
        warn!("running with the built-in development JWT secret");
    }

    let store: Arc<dyn CatalogStore> = if config.database.url.is_some() {
        let pool = DbPool::new(&config.database).await?;
        info!("connected to postgres");
        Arc::new(PgCatalog::new(pool))
    } else {
        warn!("database.url not set, serving from the in-memory store");
        Arc::new(MemCatalog::new())
    };

    let state = AppState::new(store, config.clone());
    seed_admin(&state).await?;
    let generation = state.taxonomy.reload(state.store.as_ref()).await?;
    info!(generation, "taxonomy loaded");

    let app = create_router(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "studypoint server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.observability.log_level));

    if config.observability.json_logging {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
