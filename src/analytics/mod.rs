//! Analytics reconciliation
//!
//! Merges the link inventory, per-link click events and the daily aggregate
//! into one consistent view of the current (link, date range) selection.

pub mod engine;
pub mod metrics;
pub mod selection;
pub mod view;

pub use engine::AnalyticsEngine;
pub use metrics::DailyBar;
pub use selection::AnalyticsSelection;
pub use view::{AnalyticsSnapshot, AnalyticsSummary, AnalyticsView, SourceState};
