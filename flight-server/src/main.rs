use flight_server::config::ServerConfig;
use flight_server::schedule::ScheduleTable;
use flight_server::web::{AppState, create_router};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Bad configuration: {e}");
            std::process::exit(2);
        }
    };

    // A schedule that fails to load is fatal: never serve partial data.
    let table = match ScheduleTable::load_csv(&config.data_path) {
        Ok(table) => table,
        Err(e) => {
            error!(path = %config.data_path.display(), "Failed to load schedule: {e}");
            std::process::exit(1);
        }
    };

    let state = AppState::new(table, config.search.clone());
    let app = create_router(state);

    info!(addr = %config.bind, "Flight schedule server listening");
    info!("  GET  /health          - Health check");
    info!("  GET  /flights/summary - Schedule summary");
    info!("  POST /flights/query   - Run a schedule query");

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app).await.expect("Server error");
}
