use std::path::Path;

use anyhow::Context;
use tokio::net::TcpListener;

use ragserve::config::Settings;
use ragserve::server::router::router;
use ragserve::state::AppState;
use ragserve::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;
    logging::init(Path::new("logs"));

    let state = AppState::initialize(settings)?;

    let bind_addr = format!("{}:{}", state.settings.host, state.settings.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    let addr = listener.local_addr()?;

    tracing::info!("App started successfully on - {}", addr);

    let app = router(state);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
