//! Cached datasets behind the analytics view and what is derived from them

use crate::analytics::metrics::{self, DailyBar};
use crate::analytics::selection::AnalyticsSelection;
use crate::api::types::{ClickEvent, DailyClicks, ShortLink};
use serde::Serialize;

/// One independently fetched source: last good data, in-flight flag, error
#[derive(Debug, Clone, Serialize)]
pub struct SourceState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
    /// Number of results applied so far, successes and failures alike
    pub revision: u64,
}

impl<T> Default for SourceState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            revision: 0,
        }
    }
}

impl<T> SourceState<T> {
    pub fn begin(&mut self) {
        self.loading = true;
    }

    /// Replace the data wholesale
    pub fn succeed(&mut self, data: T) {
        self.data = Some(data);
        self.loading = false;
        self.error = None;
        self.revision += 1;
    }

    /// Record a failure; the last good data stays visible
    pub fn fail(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
        self.revision += 1;
    }

    /// Stop loading without recording anything (session rejections)
    pub fn abandon(&mut self) {
        self.loading = false;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalyticsView {
    pub link_inventory: SourceState<Vec<ShortLink>>,
    pub click_events: SourceState<Vec<ClickEvent>>,
    pub daily_clicks: SourceState<DailyClicks>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    pub total_clicks_in_range: u64,
    pub total_links: usize,
    pub days_tracked: i64,
    pub daily_bars: Vec<DailyBar>,
}

impl AnalyticsView {
    pub fn links(&self) -> &[ShortLink] {
        self.link_inventory.data.as_deref().unwrap_or(&[])
    }

    pub fn events(&self) -> &[ClickEvent] {
        self.click_events.data.as_deref().unwrap_or(&[])
    }

    pub fn is_loading(&self) -> bool {
        self.link_inventory.loading || self.click_events.loading || self.daily_clicks.loading
    }

    pub fn summarize(&self, selection: &AnalyticsSelection) -> AnalyticsSummary {
        let empty = DailyClicks::new();
        let daily = self.daily_clicks.data.as_ref().unwrap_or(&empty);
        AnalyticsSummary {
            total_clicks_in_range: metrics::total_clicks_in_range(
                selection.short_code().is_some(),
                self.events(),
                daily,
            ),
            total_links: self.links().len(),
            days_tracked: selection.days_tracked(),
            daily_bars: metrics::daily_bars(daily),
        }
    }
}

/// Point-in-time copy of everything the analytics view renders
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSnapshot {
    pub selection: AnalyticsSelection,
    pub selected_link: Option<ShortLink>,
    pub view: AnalyticsView,
    pub summary: AnalyticsSummary,
}

impl AnalyticsSnapshot {
    pub fn capture(selection: &AnalyticsSelection, view: &AnalyticsView) -> Self {
        let selected_link = selection
            .short_code()
            .and_then(|code| view.links().iter().find(|l| l.short_code == code))
            .cloned();
        Self {
            selection: selection.clone(),
            selected_link,
            view: view.clone(),
            summary: view.summarize(selection),
        }
    }
}
