//! Request and response transform steps
//!
//! Steps run in the order they were registered on the client. Request steps
//! may rewrite the outgoing request; response steps only observe.

use crate::auth::session::SessionGuard;
use crate::auth::storage::CredentialStore;
use crate::http::transport::{ApiRequest, ApiResponse};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Method, StatusCode};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Facts about a request captured when it was issued
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Session epoch current at issue time
    pub epoch: u64,
    pub method: Method,
    pub path: String,
    pub started: Instant,
}

impl RequestContext {
    pub fn new(epoch: u64, request: &ApiRequest) -> Self {
        Self {
            epoch,
            method: request.method.clone(),
            path: request.path.clone(),
            started: Instant::now(),
        }
    }
}

pub trait RequestStep: Send + Sync {
    fn on_request(&self, request: &mut ApiRequest, ctx: &RequestContext);
}

pub trait ResponseStep: Send + Sync {
    fn on_response(&self, response: &ApiResponse, ctx: &RequestContext);
}

/// Attaches `Authorization: Bearer <token>` when a credential is stored
pub struct BearerAuth {
    store: Arc<CredentialStore>,
}

impl BearerAuth {
    pub fn new(store: Arc<CredentialStore>) -> Self {
        Self { store }
    }
}

impl RequestStep for BearerAuth {
    fn on_request(&self, request: &mut ApiRequest, _ctx: &RequestContext) {
        let Some(token) = self.store.token() else {
            request.headers.remove(AUTHORIZATION);
            return;
        };
        match HeaderValue::from_str(&format!("Bearer {}", token)) {
            Ok(mut value) => {
                value.set_sensitive(true);
                request.headers.insert(AUTHORIZATION, value);
            }
            Err(_) => warn!("Stored token is not a valid header value; sending unauthenticated"),
        }
    }
}

/// Hands 401 responses to the session guard
pub struct AuthFailureDetector {
    guard: Arc<SessionGuard>,
}

impl AuthFailureDetector {
    pub fn new(guard: Arc<SessionGuard>) -> Self {
        Self { guard }
    }
}

impl ResponseStep for AuthFailureDetector {
    fn on_response(&self, response: &ApiResponse, ctx: &RequestContext) {
        if response.status == StatusCode::UNAUTHORIZED {
            let fired = self.guard.invalidate(ctx.epoch);
            debug!(path = %ctx.path, fired, "Authorization rejected");
        }
    }
}

/// Debug-level log line per exchange
pub struct RequestLog;

impl ResponseStep for RequestLog {
    fn on_response(&self, response: &ApiResponse, ctx: &RequestContext) {
        debug!(
            method = %ctx.method,
            path = %ctx.path,
            status = response.status.as_u16(),
            elapsed_ms = ctx.started.elapsed().as_secs_f64() * 1000.0,
            "HTTP exchange"
        );
    }
}
