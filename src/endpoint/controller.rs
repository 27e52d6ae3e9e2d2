//! Endpoint controller: owns the port and the exactly-once swap.

use arc_swap::ArcSwap;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::endpoint::server;
use crate::endpoint::state::EndpointState;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

/// Error type for endpoint operations.
#[derive(Debug, Error)]
pub enum EndpointError {
    /// Binding the port failed.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    /// The swap already happened; it is exactly-once per run.
    #[error("endpoint already swapped to serving")]
    AlreadySwapped,
}

/// Owns the network endpoint under test for the lifetime of one run.
///
/// Starts Closed: the listener is bound so the port is taken, but nothing
/// ever accepts. [`EndpointController::swap`] atomically replaces it with a
/// live HTTP server on the identical port. Observers read the state through
/// an atomic handle and can never see a torn or intermediate value.
pub struct EndpointController {
    addr: SocketAddr,
    target_path: String,
    state: ArcSwap<EndpointState>,
    closed: Mutex<Option<TcpListener>>,
    serving_task: Mutex<Option<JoinHandle<()>>>,
    shutdown: Shutdown,
}

impl EndpointController {
    /// Bind a Closed endpoint. Port 0 selects an ephemeral port; the
    /// assigned address is available via [`EndpointController::addr`].
    pub async fn bind(port: u16, target_path: &str) -> Result<Self, EndpointError> {
        let listener = TcpListener::bind(("127.0.0.1", port))
            .await
            .map_err(|e| EndpointError::Bind {
                addr: format!("127.0.0.1:{port}"),
                source: e,
            })?;

        let addr = listener.local_addr().map_err(|e| EndpointError::Bind {
            addr: format!("127.0.0.1:{port}"),
            source: e,
        })?;

        tracing::info!(address = %addr, "Endpoint bound; not accepting");

        Ok(Self {
            addr,
            target_path: target_path.to_string(),
            state: ArcSwap::from_pointee(EndpointState::Closed),
            closed: Mutex::new(Some(listener)),
            serving_task: Mutex::new(None),
            shutdown: Shutdown::new(),
        })
    }

    /// Bind and immediately swap to Serving. Used by the sanity scenario,
    /// which needs a working endpoint and no closed era.
    pub async fn serve(port: u16, target_path: &str) -> Result<Self, EndpointError> {
        let controller = Self::bind(port, target_path).await?;
        controller.swap().await?;
        Ok(controller)
    }

    /// Replace the closed listener with a live HTTP server on the same
    /// port. Exactly once per run; a second call fails.
    ///
    /// Requests in flight across this transition either fail cleanly
    /// against the dying socket or are served by the replacement. The
    /// mutex serializes the transition; the state handle publishes it.
    pub async fn swap(&self) -> Result<SocketAddr, EndpointError> {
        let mut closed = self.closed.lock().await;
        let listener = closed.take().ok_or(EndpointError::AlreadySwapped)?;

        // Closing the listener resets whatever sits in its backlog.
        drop(listener);

        let replacement =
            TcpListener::bind(self.addr)
                .await
                .map_err(|e| EndpointError::Bind {
                    addr: self.addr.to_string(),
                    source: e,
                })?;

        let router = server::payload_router(&self.target_path);
        let task = tokio::spawn(server::serve(
            replacement,
            router,
            self.shutdown.subscribe(),
        ));
        *self.serving_task.lock().await = Some(task);

        self.state.store(Arc::new(EndpointState::Serving));
        metrics::record_swap();
        tracing::info!(address = %self.addr, "Endpoint swapped to serving");

        Ok(self.addr)
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Snapshot of the current endpoint identity.
    pub fn state(&self) -> EndpointState {
        **self.state.load()
    }

    /// Tear down the serving task at run end.
    pub async fn shutdown(&self) {
        self.shutdown.trigger();
        if let Some(task) = self.serving_task.lock().await.take() {
            let _ = task.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn swap_preserves_port_and_is_single_shot() {
        let controller = EndpointController::bind(0, "/foo").await.unwrap();
        let bound = controller.addr();
        assert_eq!(controller.state(), EndpointState::Closed);

        let serving = controller.swap().await.unwrap();
        assert_eq!(serving, bound);
        assert_eq!(controller.state(), EndpointState::Serving);

        assert!(matches!(
            controller.swap().await,
            Err(EndpointError::AlreadySwapped)
        ));

        controller.shutdown().await;
    }

    #[tokio::test]
    async fn serve_skips_the_closed_era() {
        let controller = EndpointController::serve(0, "/foo").await.unwrap();
        assert_eq!(controller.state(), EndpointState::Serving);
        controller.shutdown().await;
    }
}
