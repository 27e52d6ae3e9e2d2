//! Async request engine.
//!
//! # Responsibilities
//! - Issue a single HTTP GET and expose its completion as an awaitable
//!   handle
//! - Drive the per-request phase machine from transport events
//! - Enforce connect, read, and whole-request deadlines independently
//! - Map every transport failure to a distinguishable error kind

use axum::body::Body;
use axum::http::{header, Method, Request};
use futures_util::StreamExt;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tokio::time;
use url::Url;

use crate::config::schema::TimeoutConfig;
use crate::engine::error::{RequestError, RequestResult, TimeoutKind};
use crate::engine::phase::RequestState;

/// Issues requests and resolves each to a terminal result.
///
/// The underlying connection pool is hyper-util's; the engine layers the
/// phase machine and deadline enforcement on top. Request state machines
/// are independent; nothing here synchronizes across requests. Clones
/// share the same connection pool.
#[derive(Clone)]
pub struct RequestEngine {
    client: Client<HttpConnector, Body>,
    timeouts: TimeoutConfig,
}

impl RequestEngine {
    pub fn new(timeouts: TimeoutConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(timeouts.connect()));

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self { client, timeouts }
    }

    /// Spawn a request and return a handle that eventually resolves to its
    /// terminal result. The handle never panics out of `wait`; a dead task
    /// surfaces as an internal fault.
    pub fn submit(&self, seq: u32, url: &Url) -> RequestHandle {
        let engine = self.clone();
        let url = url.clone();
        let task = tokio::spawn(async move { engine.execute(seq, &url).await });
        RequestHandle { seq, task }
    }

    /// Execute a request inline under the whole-request deadline.
    pub async fn execute(&self, seq: u32, url: &Url) -> RequestResult {
        match time::timeout(self.timeouts.request(), self.drive(seq, url)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::debug!(seq, "request deadline expired");
                Err(RequestError::Timeout(TimeoutKind::Request))
            }
        }
    }

    async fn drive(&self, seq: u32, url: &Url) -> RequestResult {
        let mut state = RequestState::new(seq);
        match self.advance(&mut state, url).await {
            Ok(response) => {
                tracing::trace!(seq, status = %response.status, "request completed");
                Ok(response)
            }
            Err(err) => {
                state.fail();
                tracing::debug!(seq, error = %err, "request failed");
                Err(err)
            }
        }
    }

    async fn advance(&self, state: &mut RequestState, url: &Url) -> RequestResult {
        let request = Request::builder()
            .method(Method::GET)
            .uri(url.as_str())
            .header(header::USER_AGENT, "swapstorm-harness")
            .body(Body::empty())
            .map_err(|e| RequestError::Internal(format!("failed to build request: {e}")))?;

        state.on_sent()?;

        let response = self
            .client
            .request(request)
            .await
            .map_err(map_transport_error)?;

        let (parts, body) = response.into_parts();
        state.on_status(parts.status)?;
        state.on_headers(&parts.headers)?;

        self.drain_body(state, body).await?;

        Ok(state.on_complete()?)
    }

    /// Pull body frames one at a time, each under the read deadline, and
    /// feed them to the phase machine in arrival order.
    async fn drain_body(
        &self,
        state: &mut RequestState,
        body: hyper::body::Incoming,
    ) -> Result<(), RequestError> {
        let mut frames = Body::new(body).into_data_stream();
        loop {
            let next = time::timeout(self.timeouts.read(), frames.next())
                .await
                .map_err(|_| RequestError::Timeout(TimeoutKind::Read))?;

            match next {
                Some(Ok(chunk)) => state.on_chunk(chunk)?,
                Some(Err(e)) => return Err(RequestError::Transfer(e.to_string())),
                None => return Ok(()),
            }
        }
    }
}

/// Awaitable handle for a submitted request.
pub struct RequestHandle {
    seq: u32,
    task: tokio::task::JoinHandle<RequestResult>,
}

impl RequestHandle {
    pub fn seq(&self) -> u32 {
        self.seq
    }

    /// Resolve to the request's terminal result.
    pub async fn wait(self) -> RequestResult {
        match self.task.await {
            Ok(result) => result,
            Err(err) => Err(RequestError::Internal(format!(
                "request task {} aborted: {err}",
                self.seq
            ))),
        }
    }
}

/// Map a transport-layer error onto the failure taxonomy.
///
/// A timed-out connect is a deadline failure, not a refusal; anything else
/// that died before the response head is a connection failure, and a death
/// after the head is a mid-stream transfer failure.
fn map_transport_error(err: hyper_util::client::legacy::Error) -> RequestError {
    if err.is_connect() {
        if cause_chain_timed_out(&err) {
            RequestError::Timeout(TimeoutKind::Connect)
        } else {
            RequestError::Connect(root_message(&err))
        }
    } else {
        RequestError::Transfer(root_message(&err))
    }
}

fn cause_chain_timed_out(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = current {
        if let Some(io) = e.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::TimedOut {
                return true;
            }
        }
        current = e.source();
    }
    false
}

fn root_message(err: &(dyn std::error::Error + 'static)) -> String {
    let mut current: &(dyn std::error::Error + 'static) = err;
    while let Some(source) = current.source() {
        current = source;
    }
    current.to_string()
}
