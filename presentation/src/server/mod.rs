//! HTTP transport for the chat endpoint

mod routes;

pub use routes::{AppState, NOT_CONFIGURED_ERROR, chat, health, router};

use tokio::net::TcpListener;
use tracing::info;

/// Serve the chat API on `bind` until Ctrl-C.
pub async fn serve(bind: &str, state: AppState) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind).await?;
    info!("FlowGrid server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("FlowGrid server shutting down");
        })
        .await
}
