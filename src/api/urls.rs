//! Link management and analytics endpoints

use crate::api::types::{ClickEvent, DailyClicks, ShortLink, ShortenRequest};
use crate::core::error::{Error, Result};
use crate::http::{ApiRequest, HttpClient};
use chrono::NaiveDate;
use std::sync::Arc;

/// `startDate` for per-link analytics: start of the first day
pub fn range_start_param(date: NaiveDate) -> String {
    format!("{}T00:00:00", date.format("%Y-%m-%d"))
}

/// `endDate` for per-link analytics: last second of the final day
pub fn range_end_param(date: NaiveDate) -> String {
    format!("{}T23:59:59", date.format("%Y-%m-%d"))
}

fn day_param(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[derive(Clone)]
pub struct UrlApi {
    http: Arc<HttpClient>,
}

impl UrlApi {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn shorten(&self, original_url: &str) -> Result<ShortLink> {
        let original_url = original_url.trim();
        if original_url.is_empty() {
            return Err(Error::MissingField {
                field: "originalUrl",
            });
        }
        let body = ShortenRequest {
            original_url: original_url.to_string(),
        };
        let request = ApiRequest::post("/api/urls/shorten").with_json(&body)?;
        self.http.get_json(request).await
    }

    /// The signed-in user's links, in server order
    pub async fn my_urls(&self) -> Result<Vec<ShortLink>> {
        self.http.get_json(ApiRequest::get("/api/urls/myurls")).await
    }

    /// Click events for one short code within `[start, end]`, whole days
    pub async fn analytics(
        &self,
        short_code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ClickEvent>> {
        let path = format!("/api/urls/analytics/{}", urlencoding::encode(short_code));
        let request = ApiRequest::get(path)
            .with_query("startDate", range_start_param(start))
            .with_query("endDate", range_end_param(end));
        self.http.get_json(request).await
    }

    /// Clicks per day across all of the user's links within `[start, end]`
    pub async fn total_clicks(&self, start: NaiveDate, end: NaiveDate) -> Result<DailyClicks> {
        let request = ApiRequest::get("/api/urls/totalClicks")
            .with_query("startDate", day_param(start))
            .with_query("endDate", day_param(end));
        self.http.get_json(request).await
    }
}
