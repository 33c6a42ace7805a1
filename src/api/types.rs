//! Wire types exchanged with the shortener service

use crate::core::error::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// A shortened link owned by the signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortLink {
    pub id: i64,
    #[serde(rename = "shortUrl")]
    pub short_code: String,
    pub original_url: String,
    #[serde(default)]
    pub created_date: Option<NaiveDateTime>,
    /// Cumulative clicks, maintained by the server
    #[serde(default)]
    pub click_count: u64,
    #[serde(default)]
    pub username: Option<String>,
}

/// Recorded visits to a short code at `click_date`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickEvent {
    #[serde(deserialize_with = "date_or_timestamp")]
    pub click_date: NaiveDateTime,
    #[serde(default = "single_click")]
    pub count: u64,
}

/// Click counts per calendar day, in chronological order
pub type DailyClicks = BTreeMap<NaiveDate, u64>;

fn single_click() -> u64 {
    1
}

/// Accepts `YYYY-MM-DD` (midnight) or a full ISO local timestamp
pub fn parse_click_date(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(timestamp) = raw.parse::<NaiveDateTime>() {
        return Some(timestamp);
    }
    raw.parse::<NaiveDate>()
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

fn date_or_timestamp<'de, D>(deserializer: D) -> std::result::Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_click_date(&raw).ok_or_else(|| de::Error::custom(format!("invalid click date '{}'", raw)))
}

// =============================================================================
// REQUEST BODIES
// =============================================================================

fn require(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::MissingField { field });
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<()> {
        require("username", &self.username)?;
        require("password", &self.password)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<()> {
        require("username", &self.username)?;
        require("email", &self.email)?;
        require("password", &self.password)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenRequest {
    pub original_url: String,
}
