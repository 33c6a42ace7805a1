//! Analytics reconciliation
//!
//! The engine owns the current [`AnalyticsSelection`] and three cached
//! sources. Every selection change bumps a generation counter and issues a
//! fresh batch of fetches as tokio tasks. A task applies its result only if
//! the generation it was issued under is still current, so out-of-order
//! responses never overwrite newer data.

use crate::analytics::selection::AnalyticsSelection;
use crate::analytics::view::{AnalyticsSnapshot, AnalyticsView, SourceState};
use crate::api::types::ShortLink;
use crate::api::UrlApi;
use crate::core::error::Result;
use chrono::NaiveDate;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

const LINKS_FAILED: &str = "Failed to load URLs";
const EVENTS_FAILED: &str = "Failed to load analytics";
const DAILY_FAILED: &str = "Failed to load total clicks";

struct EngineState {
    selection: AnalyticsSelection,
    generation: u64,
    /// Set once the user picks a link (or "all links") explicitly
    link_chosen: bool,
    view: AnalyticsView,
}

struct Inner {
    api: UrlApi,
    state: Mutex<EngineState>,
    inflight: Mutex<Vec<JoinHandle<()>>>,
}

#[derive(Clone)]
pub struct AnalyticsEngine {
    inner: Arc<Inner>,
}

impl AnalyticsEngine {
    pub fn new(api: UrlApi, selection: AnalyticsSelection) -> Self {
        let link_chosen = selection.short_code().is_some();
        Self {
            inner: Arc::new(Inner {
                api,
                state: Mutex::new(EngineState {
                    selection,
                    generation: 0,
                    link_chosen,
                    view: AnalyticsView::default(),
                }),
                inflight: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Keep the selection's link (or "all links") even when the inventory
    /// arrives
    pub fn with_link_chosen(self) -> Self {
        self.inner.state.lock().link_chosen = true;
        self
    }

    /// Load the link inventory and the batch for the current selection
    pub fn mount(&self) {
        let mut state = self.inner.state.lock();
        state.view.link_inventory.begin();
        let inner = self.inner.clone();
        self.inner
            .track(tokio::spawn(async move { inner.load_inventory().await }));
        self.inner.issue_batch(&mut state);
    }

    pub fn select_link(&self, short_code: Option<String>) {
        let mut state = self.inner.state.lock();
        state.link_chosen = true;
        state.selection = state.selection.clone().with_link(short_code);
        self.inner.issue_batch(&mut state);
    }

    /// Rejects `start > end` without touching the current selection
    pub fn set_date_range(&self, start: NaiveDate, end: NaiveDate) -> Result<()> {
        let mut state = self.inner.state.lock();
        state.selection = state.selection.clone().with_range(start, end)?;
        self.inner.issue_batch(&mut state);
        Ok(())
    }

    pub fn set_selection(&self, selection: AnalyticsSelection) {
        let mut state = self.inner.state.lock();
        state.link_chosen = true;
        state.selection = selection;
        self.inner.issue_batch(&mut state);
    }

    /// Re-issue the batch for the unchanged selection
    pub fn refresh(&self) {
        let mut state = self.inner.state.lock();
        self.inner.issue_batch(&mut state);
    }

    /// Wait for every fetch issued so far, including batches issued by
    /// fetches that completed while waiting
    pub async fn settle(&self) {
        loop {
            let handles = std::mem::take(&mut *self.inner.inflight.lock());
            if handles.is_empty() {
                return;
            }
            for handle in handles {
                if let Err(e) = handle.await {
                    warn!("Analytics fetch task failed: {}", e);
                }
            }
        }
    }

    pub fn snapshot(&self) -> AnalyticsSnapshot {
        let state = self.inner.state.lock();
        AnalyticsSnapshot::capture(&state.selection, &state.view)
    }

    pub fn selection(&self) -> AnalyticsSelection {
        self.inner.state.lock().selection.clone()
    }

    pub fn generation(&self) -> u64 {
        self.inner.state.lock().generation
    }

    #[cfg(test)]
    fn tracked_tasks(&self) -> usize {
        self.inner.inflight.lock().len()
    }

    /// Put a freshly shortened link at the head of the inventory
    pub fn record_shortened(&self, link: ShortLink) {
        let mut state = self.inner.state.lock();
        state
            .view
            .link_inventory
            .data
            .get_or_insert_with(Vec::new)
            .insert(0, link);
    }
}

impl Inner {
    /// Remember a spawned fetch for `settle`; finished ones are dropped here
    fn track(&self, handle: JoinHandle<()>) {
        let mut inflight = self.inflight.lock();
        inflight.retain(|h| !h.is_finished());
        inflight.push(handle);
    }

    /// Bump the generation and spawn the fetches for the current selection
    fn issue_batch(self: &Arc<Self>, state: &mut EngineState) {
        state.generation += 1;
        let generation = state.generation;
        let start = state.selection.start();
        let end = state.selection.end();
        debug!(
            generation,
            link = state.selection.short_code().unwrap_or("*"),
            %start,
            %end,
            "Issuing analytics batch"
        );

        state.view.daily_clicks.begin();
        let inner = self.clone();
        self.track(tokio::spawn(async move {
            let result = inner.api.total_clicks(start, end).await;
            inner.apply(generation, "daily_clicks", result, DAILY_FAILED, |view| {
                &mut view.daily_clicks
            });
        }));

        match state.selection.short_code() {
            Some(code) => {
                state.view.click_events.begin();
                let code = code.to_string();
                let inner = self.clone();
                self.track(tokio::spawn(async move {
                    let result = inner.api.analytics(&code, start, end).await;
                    inner.apply(generation, "click_events", result, EVENTS_FAILED, |view| {
                        &mut view.click_events
                    });
                }));
            }
            None => state.view.click_events.reset(),
        }
    }

    fn apply<T>(
        &self,
        generation: u64,
        source: &str,
        result: Result<T>,
        failure: &str,
        select: impl FnOnce(&mut AnalyticsView) -> &mut SourceState<T>,
    ) {
        let mut state = self.state.lock();
        if state.generation != generation {
            trace!(
                source,
                issued = generation,
                current = state.generation,
                "Discarding stale analytics response"
            );
            return;
        }
        record(select(&mut state.view), source, result, failure);
    }

    async fn load_inventory(self: Arc<Self>) {
        let result = self.api.my_urls().await;
        let mut state = self.state.lock();
        let first = match &result {
            Ok(links) => links.first().map(|l| l.short_code.clone()),
            Err(_) => None,
        };
        record(&mut state.view.link_inventory, "link_inventory", result, LINKS_FAILED);

        if state.link_chosen || state.selection.short_code().is_some() {
            return;
        }
        if let Some(code) = first {
            debug!(link = %code, "Defaulting analytics selection to first link");
            state.selection = state.selection.clone().with_link(Some(code));
            self.issue_batch(&mut state);
        }
    }
}

fn record<T>(slot: &mut SourceState<T>, source: &str, result: Result<T>, failure: &str) {
    match result {
        Ok(data) => slot.succeed(data),
        // The session guard has already reacted to the rejection
        Err(e) if e.is_unauthorized() => slot.abandon(),
        Err(e) => {
            warn!(source, "{}: {}", failure, e);
            slot.fail(failure.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::SessionGuard;
    use crate::auth::storage::CredentialStore;
    use crate::http::{ApiRequest, ApiResponse, HttpClient};
    use crate::testing::{credential, json_reply, RecordingObserver, ScriptedTransport};
    use serde_json::json;

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn january() -> AnalyticsSelection {
        AnalyticsSelection::new(None, day(1, 1), day(1, 31)).unwrap()
    }

    struct Harness {
        engine: AnalyticsEngine,
        transport: Arc<ScriptedTransport>,
        observer: Arc<RecordingObserver>,
    }

    fn setup(selection: AnalyticsSelection) -> Harness {
        let store = Arc::new(CredentialStore::in_memory());
        store.set(credential("alice", "ROLE_USER")).unwrap();
        let observer = Arc::new(RecordingObserver::default());
        let guard = Arc::new(SessionGuard::new(store, observer.clone()));
        let transport = Arc::new(ScriptedTransport::default());
        let http = Arc::new(HttpClient::with_session(transport.clone(), guard));
        Harness {
            engine: AnalyticsEngine::new(UrlApi::new(http), selection),
            transport,
            observer,
        }
    }

    fn is_events(code: &'static str, start: &'static str) -> impl Fn(&ApiRequest) -> bool {
        move |r: &ApiRequest| {
            r.path == format!("/api/urls/analytics/{}", code)
                && r.query_value("startDate") == Some(start)
        }
    }

    fn is_daily(start: &'static str) -> impl Fn(&ApiRequest) -> bool {
        move |r: &ApiRequest| {
            r.path == "/api/urls/totalClicks" && r.query_value("startDate") == Some(start)
        }
    }

    fn link(code: &str) -> serde_json::Value {
        json!({
            "id": 1,
            "shortUrl": code,
            "originalUrl": format!("https://example.com/{}", code),
            "clickCount": 0
        })
    }

    #[tokio::test]
    async fn test_late_response_for_old_selection_is_discarded() {
        let h = setup(january());
        h.engine.select_link(Some("A".to_string()));
        h.engine.select_link(Some("B".to_string()));
        h.transport.wait_for(4).await;

        // B answers first, A's slower reply arrives afterwards
        h.transport.respond(
            is_events("B", "2024-01-01T00:00:00"),
            json_reply(200, json!([{"clickDate": "2024-01-02"}])),
        );
        h.transport.respond(
            is_events("A", "2024-01-01T00:00:00"),
            json_reply(200, json!([{"clickDate": "2024-01-02"}, {"clickDate": "2024-01-03"}])),
        );
        h.transport.respond(|_| true, json_reply(200, json!({})));
        h.transport.respond(|_| true, json_reply(200, json!({})));
        h.engine.settle().await;

        let snap = h.engine.snapshot();
        assert_eq!(snap.selection.short_code(), Some("B"));
        assert_eq!(snap.view.events().len(), 1);
        assert_eq!(snap.summary.total_clicks_in_range, 1);
    }

    #[tokio::test]
    async fn test_range_change_applies_only_latest_batch() {
        let h = setup(january());
        h.engine.select_link(Some("abc123".to_string()));
        h.engine.set_date_range(day(2, 1), day(2, 29)).unwrap();
        h.transport.wait_for(4).await;

        h.transport.respond(
            is_events("abc123", "2024-02-01T00:00:00"),
            json_reply(200, json!([{"clickDate": "2024-02-03"}])),
        );
        h.transport.respond(
            is_daily("2024-02-01"),
            json_reply(200, json!({"2024-02-03": 1})),
        );
        // January replies land last and must be dropped
        h.transport.respond(
            is_events("abc123", "2024-01-01T00:00:00"),
            json_reply(200, json!([{"clickDate": "2024-01-04"}, {"clickDate": "2024-01-05"}])),
        );
        h.transport.respond(
            is_daily("2024-01-01"),
            json_reply(200, json!({"2024-01-04": 9})),
        );
        h.engine.settle().await;

        let snap = h.engine.snapshot();
        assert_eq!(snap.view.click_events.revision, 1);
        assert_eq!(snap.view.daily_clicks.revision, 1);
        assert_eq!(snap.view.events().len(), 1);
        assert_eq!(snap.summary.daily_bars.len(), 1);
        assert_eq!(snap.summary.daily_bars[0].date, day(2, 3));
        assert_eq!(snap.summary.days_tracked, 29);
        assert!(!snap.view.is_loading());
    }

    #[tokio::test]
    async fn test_inverted_range_keeps_selection() {
        let h = setup(january());
        let before = h.engine.generation();
        assert!(h.engine.set_date_range(day(3, 1), day(2, 1)).is_err());
        assert_eq!(h.engine.generation(), before);
        assert_eq!(h.engine.selection(), january());
        assert_eq!(h.transport.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_mount_defaults_to_first_link() {
        let h = setup(january());
        h.engine.mount();
        h.transport.wait_for(2).await;

        h.transport.respond(
            |r| r.path == "/api/urls/myurls",
            json_reply(200, json!([link("first"), link("second")])),
        );
        h.transport.wait_for(3).await;
        assert!(h
            .transport
            .pending_paths()
            .contains(&"/api/urls/analytics/first".to_string()));

        h.transport.respond(
            is_events("first", "2024-01-01T00:00:00"),
            json_reply(200, json!([{"clickDate": "2024-01-02"}])),
        );
        h.transport.respond(|_| true, json_reply(200, json!({"2024-01-02": 1})));
        h.transport.respond(|_| true, json_reply(200, json!({"2024-01-02": 1})));
        h.engine.settle().await;

        let snap = h.engine.snapshot();
        assert_eq!(snap.selection.short_code(), Some("first"));
        assert_eq!(snap.summary.total_links, 2);
        assert_eq!(
            snap.selected_link.map(|l| l.original_url),
            Some("https://example.com/first".to_string())
        );
    }

    #[tokio::test]
    async fn test_explicit_all_links_is_not_overridden() {
        let h = setup(january());
        h.engine.mount();
        h.engine.select_link(None);
        h.transport.wait_for(3).await;

        h.transport.respond(
            |r| r.path == "/api/urls/myurls",
            json_reply(200, json!([link("first")])),
        );
        h.transport.respond(|_| true, json_reply(200, json!({"2024-01-02": 5})));
        h.transport.respond(|_| true, json_reply(200, json!({"2024-01-02": 5})));
        h.engine.settle().await;

        let snap = h.engine.snapshot();
        assert_eq!(snap.selection.short_code(), None);
        assert_eq!(snap.summary.total_clicks_in_range, 5);
        assert_eq!(h.transport.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_link_chosen_up_front_skips_default() {
        let h = setup(january());
        let engine = h.engine.clone().with_link_chosen();
        engine.mount();
        h.transport.wait_for(2).await;
        h.transport.respond(
            |r| r.path == "/api/urls/myurls",
            json_reply(200, json!([link("first")])),
        );
        h.transport.respond(|_| true, json_reply(200, json!({})));
        engine.settle().await;

        assert_eq!(engine.selection().short_code(), None);
        assert_eq!(h.transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_one_failing_source_leaves_others_intact() {
        let h = setup(january().with_link(Some("abc123".to_string())));
        h.engine.refresh();
        h.transport.wait_for(2).await;
        h.transport.respond(
            is_daily("2024-01-01"),
            json_reply(200, json!({"2024-01-02": 2, "2024-01-03": 4})),
        );
        h.transport.respond(
            is_events("abc123", "2024-01-01T00:00:00"),
            json_reply(200, json!([{"clickDate": "2024-01-02"}])),
        );
        h.engine.settle().await;

        h.engine.refresh();
        h.transport.wait_for(2).await;
        h.transport.respond(
            is_events("abc123", "2024-01-01T00:00:00"),
            Ok(ApiResponse::new(500, "boom")),
        );
        h.transport.respond(
            is_daily("2024-01-01"),
            json_reply(200, json!({"2024-01-02": 3})),
        );
        h.engine.settle().await;

        let snap = h.engine.snapshot();
        assert_eq!(snap.view.click_events.error.as_deref(), Some("Failed to load analytics"));
        assert_eq!(snap.view.events().len(), 1);
        assert!(snap.view.daily_clicks.error.is_none());
        assert_eq!(snap.summary.daily_bars.len(), 1);
    }

    #[tokio::test]
    async fn test_unauthorized_clears_loading_without_error() {
        let h = setup(january());
        h.engine.refresh();
        h.transport.wait_for(1).await;
        h.transport.respond(|_| true, Ok(ApiResponse::new(401, "")));
        h.engine.settle().await;

        let snap = h.engine.snapshot();
        assert!(!snap.view.daily_clicks.loading);
        assert!(snap.view.daily_clicks.error.is_none());
        assert_eq!(h.observer.navigations(), vec!["/login".to_string()]);
    }

    #[tokio::test]
    async fn test_deselect_clears_click_events() {
        let h = setup(january().with_link(Some("abc123".to_string())));
        h.engine.refresh();
        h.transport.wait_for(2).await;
        h.transport.respond(
            is_events("abc123", "2024-01-01T00:00:00"),
            json_reply(200, json!([{"clickDate": "2024-01-02"}])),
        );
        h.transport.respond(|_| true, json_reply(200, json!({"2024-01-02": 7})));
        h.engine.settle().await;

        h.engine.select_link(None);
        let snap = h.engine.snapshot();
        assert!(snap.view.click_events.data.is_none());
        assert!(!snap.view.click_events.loading);

        h.transport.wait_for(1).await;
        h.transport.respond(|_| true, json_reply(200, json!({"2024-01-02": 7})));
        h.engine.settle().await;
        assert_eq!(h.engine.snapshot().summary.total_clicks_in_range, 7);
    }

    #[tokio::test]
    async fn test_finished_tasks_are_not_retained() {
        let h = setup(january());
        for _ in 0..50 {
            h.engine.refresh();
            h.transport.wait_for(1).await;
            h.transport.respond(|_| true, json_reply(200, json!({})));
            for _ in 0..5 {
                tokio::task::yield_now().await;
            }
        }

        assert!(h.engine.tracked_tasks() <= 2);
        h.engine.settle().await;
        assert_eq!(h.engine.tracked_tasks(), 0);
        assert_eq!(h.engine.generation(), 50);
    }

    #[tokio::test]
    async fn test_record_shortened_prepends() {
        let h = setup(january());
        let link: ShortLink = serde_json::from_value(link("fresh")).unwrap();
        h.engine.record_shortened(link);
        let snap = h.engine.snapshot();
        assert_eq!(snap.view.links()[0].short_code, "fresh");
        assert_eq!(snap.summary.total_links, 1);
    }
}
