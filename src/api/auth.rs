//! Authentication endpoints

use crate::api::types::{ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest};
use crate::auth::storage::Credential;
use crate::core::error::{Error, Result};
use crate::http::{ApiRequest, HttpClient};
use std::sync::Arc;

#[derive(Clone)]
pub struct AuthApi {
    http: Arc<HttpClient>,
}

impl AuthApi {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Create an account; the service signs the new user in directly
    pub async fn register(&self, request: &RegisterRequest) -> Result<Credential> {
        request.validate()?;
        let request = ApiRequest::post("/api/auth/register").with_json(request)?;
        self.http.get_json(request).await
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<Credential> {
        request.validate()?;
        let request = ApiRequest::post("/api/auth/login").with_json(request)?;
        self.http.get_json(request).await
    }

    /// Ask the service to mail a reset link. Returns the service's ack text.
    pub async fn forgot_password(&self, email: &str) -> Result<String> {
        let body = ForgotPasswordRequest {
            email: email.trim().to_string(),
        };
        if body.email.is_empty() {
            return Err(Error::MissingField { field: "email" });
        }
        let request = ApiRequest::post("/api/auth/forgot-password").with_json(&body)?;
        self.http.send_text(request).await
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<String> {
        let body = ResetPasswordRequest {
            token: token.to_string(),
            new_password: new_password.to_string(),
        };
        if body.token.trim().is_empty() {
            return Err(Error::MissingField { field: "token" });
        }
        if body.new_password.is_empty() {
            return Err(Error::MissingField { field: "newPassword" });
        }
        let request = ApiRequest::post("/api/auth/reset-password").with_json(&body)?;
        self.http.send_text(request).await
    }
}
