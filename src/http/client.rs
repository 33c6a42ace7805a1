//! Shared request pipeline
//!
//! Every call to the service goes through [`HttpClient::send`]:
//! request steps, transport, response steps, then status classification.
//! Nothing is retried and nothing is swallowed; a 401 reaches the caller as
//! [`Error::Unauthorized`] after the session guard has seen it.

use crate::auth::session::SessionGuard;
use crate::core::error::{Error, Result};
use crate::http::middleware::{
    AuthFailureDetector, BearerAuth, RequestContext, RequestLog, RequestStep, ResponseStep,
};
use crate::http::transport::{ApiRequest, ApiResponse, Transport};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

pub struct HttpClient {
    transport: Arc<dyn Transport>,
    guard: Option<Arc<SessionGuard>>,
    request_steps: Vec<Arc<dyn RequestStep>>,
    response_steps: Vec<Arc<dyn ResponseStep>>,
}

impl HttpClient {
    pub fn builder(transport: Arc<dyn Transport>) -> HttpClientBuilder {
        HttpClientBuilder {
            transport,
            guard: None,
            request_steps: Vec::new(),
            response_steps: Vec::new(),
        }
    }

    /// Standard pipeline: bearer injection, 401 detection, exchange logging
    pub fn with_session(transport: Arc<dyn Transport>, guard: Arc<SessionGuard>) -> Self {
        Self::builder(transport)
            .session(Arc::clone(&guard))
            .request_step(Arc::new(BearerAuth::new(Arc::clone(guard.store()))))
            .response_step(Arc::new(AuthFailureDetector::new(guard)))
            .response_step(Arc::new(RequestLog))
            .build()
    }

    pub fn session(&self) -> Option<&Arc<SessionGuard>> {
        self.guard.as_ref()
    }

    pub async fn send(&self, mut request: ApiRequest) -> Result<ApiResponse> {
        let epoch = self.guard.as_ref().map(|g| g.epoch()).unwrap_or_default();
        let ctx = RequestContext::new(epoch, &request);

        for step in &self.request_steps {
            step.on_request(&mut request, &ctx);
        }

        let response = match self.transport.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                debug!(method = %ctx.method, path = %ctx.path, "Transport failure: {}", e);
                return Err(e);
            }
        };

        for step in &self.response_steps {
            step.on_response(&response, &ctx);
        }

        classify(response)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        self.send(request).await?.json()
    }

    pub async fn send_text(&self, request: ApiRequest) -> Result<String> {
        Ok(self.send(request).await?.text())
    }
}

pub struct HttpClientBuilder {
    transport: Arc<dyn Transport>,
    guard: Option<Arc<SessionGuard>>,
    request_steps: Vec<Arc<dyn RequestStep>>,
    response_steps: Vec<Arc<dyn ResponseStep>>,
}

impl HttpClientBuilder {
    /// Guard whose epoch is stamped on each request
    pub fn session(mut self, guard: Arc<SessionGuard>) -> Self {
        self.guard = Some(guard);
        self
    }

    pub fn request_step(mut self, step: Arc<dyn RequestStep>) -> Self {
        self.request_steps.push(step);
        self
    }

    pub fn response_step(mut self, step: Arc<dyn ResponseStep>) -> Self {
        self.response_steps.push(step);
        self
    }

    pub fn build(self) -> HttpClient {
        HttpClient {
            transport: self.transport,
            guard: self.guard,
            request_steps: self.request_steps,
            response_steps: self.response_steps,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// 2xx and 3xx pass through; everything else becomes an error
fn classify(response: ApiResponse) -> Result<ApiResponse> {
    if response.status.is_success() || response.status.is_redirection() {
        return Ok(response);
    }

    let message = error_message(&response);
    if response.status == StatusCode::UNAUTHORIZED {
        return Err(Error::Unauthorized { message });
    }
    Err(Error::Api {
        status: response.status.as_u16(),
        message,
    })
}

fn error_message(response: &ApiResponse) -> String {
    if let Ok(ErrorBody {
        message: Some(message),
    }) = response.json::<ErrorBody>()
    {
        return message;
    }

    let text = response.text();
    let text = text.trim();
    if !text.is_empty() && !text.starts_with('{') {
        return text.to_string();
    }

    response
        .status
        .canonical_reason()
        .unwrap_or("Request failed")
        .to_string()
}
