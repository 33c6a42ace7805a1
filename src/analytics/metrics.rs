//! Derived numbers for the analytics view

use crate::api::types::{ClickEvent, DailyClicks};
use chrono::NaiveDate;
use serde::Serialize;

/// Smallest bar drawn for a day, as a fraction of the busiest day
pub const MIN_BAR_PROPORTION: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub clicks: u64,
    /// Bar length in `[MIN_BAR_PROPORTION, 1.0]`
    pub magnitude: f64,
}

/// Inclusive day count of `[start, end]`
pub fn days_tracked(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// `count / max`, floored so quiet days stay visible
pub fn bar_magnitude(count: u64, max: u64) -> f64 {
    if max == 0 {
        return MIN_BAR_PROPORTION;
    }
    (count as f64 / max as f64).max(MIN_BAR_PROPORTION)
}

pub fn daily_bars(daily: &DailyClicks) -> Vec<DailyBar> {
    let max = daily.values().copied().max().unwrap_or(0);
    daily
        .iter()
        .map(|(date, clicks)| DailyBar {
            date: *date,
            clicks: *clicks,
            magnitude: bar_magnitude(*clicks, max),
        })
        .collect()
}

/// Aggregate sum across all links, or the event count for one link
pub fn total_clicks_in_range(
    link_selected: bool,
    events: &[ClickEvent],
    daily: &DailyClicks,
) -> u64 {
    if link_selected {
        events.len() as u64
    } else {
        daily.values().copied().fold(0u64, u64::saturating_add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_days_tracked_is_inclusive() {
        assert_eq!(days_tracked(day(1), day(1)), 1);
        assert_eq!(days_tracked(day(1), day(31)), 31);
    }

    #[test]
    fn test_quiet_day_gets_floor() {
        let mut daily = DailyClicks::new();
        daily.insert(day(1), 0);
        daily.insert(day(2), 10);

        let bars = daily_bars(&daily);
        assert_eq!(bars[0].magnitude, 0.05);
        assert_eq!(bars[1].magnitude, 1.0);
    }

    #[test]
    fn test_all_zero_range_is_floor() {
        let mut daily = DailyClicks::new();
        daily.insert(day(1), 0);
        daily.insert(day(2), 0);
        assert!(daily_bars(&daily).iter().all(|b| b.magnitude == MIN_BAR_PROPORTION));
    }

    #[test]
    fn test_total_depends_on_selection() {
        let mut daily = DailyClicks::new();
        daily.insert(day(1), 3);
        daily.insert(day(2), 4);
        let events: Vec<ClickEvent> =
            serde_json::from_str(r#"[{"clickDate":"2024-01-01"},{"clickDate":"2024-01-02"}]"#).unwrap();

        assert_eq!(total_clicks_in_range(false, &events, &daily), 7);
        assert_eq!(total_clicks_in_range(true, &events, &daily), 2);
    }
}
