//! ClickCut - client core for the ClickCut URL shortener
//!
//! Session handling and an authenticated request pipeline for the shortener
//! API, plus the analytics engine that keeps the dashboard's datasets
//! consistent with the current selection.

pub mod analytics;
pub mod api;
pub mod auth;
pub mod cli;
pub mod core;
pub mod http;
pub mod output;

#[cfg(test)]
mod testing;

pub use core::config::Config;
pub use core::error::{Error, Result};
