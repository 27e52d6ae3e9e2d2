//! The serving endpoint installed by the swap.

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

/// The fixed payload a healthy endpoint serves.
pub const PAYLOAD: &str = "hello";

/// Build the router for the serving endpoint: the target path answers
/// 200 with the fixed payload, everything else is axum's default 404.
pub fn payload_router(target_path: &str) -> Router {
    Router::new()
        .route(target_path, get(|| async { PAYLOAD }))
        .layer(TraceLayer::new_for_http())
}

/// Serve on an already-bound listener until the shutdown signal arrives.
pub async fn serve(listener: TcpListener, router: Router, mut shutdown: broadcast::Receiver<()>) {
    let graceful = async move {
        let _ = shutdown.recv().await;
    };

    if let Err(e) = axum::serve(listener, router)
        .with_graceful_shutdown(graceful)
        .await
    {
        tracing::error!(error = %e, "serving endpoint exited with error");
    }
}
