//! Remote API surface
//!
//! Stateless request builders over the shared [`HttpClient`](crate::http::HttpClient).

pub mod auth;
pub mod redirect;
pub mod types;
pub mod urls;

pub use auth::AuthApi;
pub use redirect::RedirectApi;
pub use types::{ClickEvent, DailyClicks, ShortLink};
pub use urls::UrlApi;
