//! Contact-List Sanitizer binary entrypoint.
//! Boots the Axum HTTP server, wiring routes, shared state, and middleware.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use contact_list_sanitizer::api::{self, AppState};
use contact_list_sanitizer::metrics::Metrics;

const ENV_BIND_ADDR: &str = "SANITIZER_ADDR";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let metrics = Metrics::init();
    let state = AppState::from_env();
    let app = api::router(state).merge(metrics.router());

    let addr = std::env::var(ENV_BIND_ADDR).unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "contact-list-sanitizer listening");
    axum::serve(listener, app).await?;
    Ok(())
}
