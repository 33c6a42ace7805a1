//! The (link, date range) selection driving the analytics view

use crate::core::error::{Error, Result};
use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// Which link and which whole-day range the view shows.
///
/// `short_code == None` means all links. `start <= end` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyticsSelection {
    short_code: Option<String>,
    start: NaiveDate,
    end: NaiveDate,
}

impl AnalyticsSelection {
    pub fn new(short_code: Option<String>, start: NaiveDate, end: NaiveDate) -> Result<Self> {
        check_range(start, end)?;
        Ok(Self {
            short_code,
            start,
            end,
        })
    }

    /// All links, over the `days` days before `today` through `today`.
    ///
    /// `days` comes from configuration; a span reaching past the earliest
    /// representable date is a configuration error.
    pub fn trailing(today: NaiveDate, days: u32) -> Result<Self> {
        let start = today
            .checked_sub_signed(Duration::days(i64::from(days)))
            .ok_or_else(|| Error::ConfigError {
                message: format!("analytics.default_range_days = {} is out of range", days),
            })?;
        Ok(Self {
            short_code: None,
            start,
            end: today,
        })
    }

    pub fn short_code(&self) -> Option<&str> {
        self.short_code.as_deref()
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn with_link(mut self, short_code: Option<String>) -> Self {
        self.short_code = short_code;
        self
    }

    pub fn with_range(mut self, start: NaiveDate, end: NaiveDate) -> Result<Self> {
        check_range(start, end)?;
        self.start = start;
        self.end = end;
        Ok(self)
    }

    /// Inclusive number of days in the range
    pub fn days_tracked(&self) -> i64 {
        super::metrics::days_tracked(self.start, self.end)
    }
}

fn check_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if start > end {
        return Err(Error::InvalidDateRange { start, end });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    #[test]
    fn test_rejects_inverted_range() {
        assert!(matches!(
            AnalyticsSelection::new(None, day(2, 1), day(1, 1)),
            Err(Error::InvalidDateRange { .. })
        ));

        let sel = AnalyticsSelection::new(None, day(1, 1), day(1, 1)).unwrap();
        assert!(sel.clone().with_range(day(1, 5), day(1, 4)).is_err());
        assert_eq!(sel.with_range(day(1, 4), day(1, 5)).unwrap().start(), day(1, 4));
    }

    #[test]
    fn test_trailing_default() {
        let sel = AnalyticsSelection::trailing(day(1, 31), 30).unwrap();
        assert_eq!(sel.start(), day(1, 1));
        assert_eq!(sel.end(), day(1, 31));
        assert_eq!(sel.short_code(), None);
        assert_eq!(sel.days_tracked(), 31);
    }

    #[test]
    fn test_trailing_rejects_huge_span() {
        assert!(matches!(
            AnalyticsSelection::trailing(day(1, 31), u32::MAX),
            Err(Error::ConfigError { .. })
        ));
    }
}
