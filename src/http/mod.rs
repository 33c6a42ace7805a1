//! HTTP client core
//!
//! A middleware pipeline over a pluggable [`Transport`]. The pipeline attaches
//! the bearer credential and reports authorization failures to the session
//! guard; the transport only moves bytes.

pub mod client;
pub mod middleware;
pub mod transport;

pub use client::{HttpClient, HttpClientBuilder};
pub use middleware::{
    AuthFailureDetector, BearerAuth, RequestContext, RequestLog, RequestStep, ResponseStep,
};
pub use transport::{ApiRequest, ApiResponse, ReqwestTransport, Transport};
