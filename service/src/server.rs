//! Server assembly and startup

use std::sync::Arc;

use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::issuer::Issuer;
use crate::routes;
use crate::state::AppState;

/// Starts the server with the given issuer
///
/// # Errors
///
/// Returns an error if the server fails to start or bind to the port
pub async fn start(issuer: Arc<Issuer>) -> anyhow::Result<()> {
    let state = AppState { issuer };

    let router = routes::handler()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(std::time::Duration::from_secs(5)));

    let addr = std::net::SocketAddr::from((
        [0, 0, 0, 0],
        std::env::var("PORT").map_or(Ok(8001), |p| p.parse())?,
    ));

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("presign service started on http://{addr}");

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(anyhow::Error::from)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install shutdown handler: {e}");
    }
}
