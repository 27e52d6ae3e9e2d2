//! Endpoint identity states.

/// The two identities an endpoint can have during a run.
///
/// There is no third state: a half-bound listener is never observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointState {
    /// A listener is bound to the port but never accepts. Connections
    /// land in the kernel backlog and starve, or are refused once the
    /// backlog fills.
    Closed,
    /// An HTTP server is accepting on the port.
    Serving,
}

impl std::fmt::Display for EndpointState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EndpointState::Closed => write!(f, "closed"),
            EndpointState::Serving => write!(f, "serving"),
        }
    }
}
