//! Client address allow-list.

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use std::net::{IpAddr, SocketAddr};

use super::{respond, AppState};
use crate::envelope::Envelope;
use crate::routing::{PatternSet, RouteResult};

/// Glob patterns matched against the client IP.
#[derive(Clone, Debug)]
pub struct AccessPolicy {
    trusted: PatternSet,
}

impl AccessPolicy {
    /// Build a policy; a malformed pattern is rejected.
    pub fn new<I, S>(patterns: I) -> RouteResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self {
            trusted: PatternSet::new(patterns)?,
        })
    }

    /// Whether a client address is trusted.
    ///
    /// IPv4-mapped IPv6 addresses are compared in their IPv4 form.
    pub fn allows(&self, ip: &IpAddr) -> bool {
        let ip = match ip {
            IpAddr::V6(v6) => v6.to_ipv4_mapped().map(IpAddr::V4).unwrap_or(*ip),
            IpAddr::V4(_) => *ip,
        };
        self.trusted.is_match(&ip.to_string())
    }
}

/// Middleware answering 404 to any client outside the allow-list.
///
/// Runs before route resolution, so an untrusted client cannot tell a real
/// route from a missing one.
pub async fn enforce(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    match client {
        Some(ip) if state.access.allows(&ip) => next.run(request).await,
        _ => {
            tracing::warn!(client = ?client, "request from untrusted client rejected");
            let mut envelope = Envelope::new();
            envelope.error("Not Found", Some(404));
            respond(&envelope, None)
        }
    }
}
