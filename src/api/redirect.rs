//! Public short-code resolution

use crate::core::error::{Error, Result};
use crate::http::{ApiRequest, HttpClient};
use std::sync::Arc;

#[derive(Clone)]
pub struct RedirectApi {
    http: Arc<HttpClient>,
}

impl RedirectApi {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Target of a short code, or `None` when the code is unknown.
    ///
    /// Resolving records a click on the server.
    pub async fn resolve(&self, short_code: &str) -> Result<Option<String>> {
        let path = format!("/{}", urlencoding::encode(short_code));
        match self.http.send(ApiRequest::get(path)).await {
            Ok(response) => Ok(response.location().map(str::to_string)),
            Err(Error::Api { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
