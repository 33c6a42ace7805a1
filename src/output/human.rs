//! Human-readable output formatting

use crate::analytics::{AnalyticsSnapshot, SourceState};
use crate::api::ShortLink;
use crate::output::short_url;

/// Widest bar drawn for the busiest day
const BAR_WIDTH: usize = 40;

/// Format the user's links, one per line
pub fn links(links: &[ShortLink], base_url: &str) -> String {
    let mut output = String::new();

    if links.is_empty() {
        output.push_str("No links yet. Run 'clickcut shorten <url>' to create one.\n");
        return output;
    }

    output.push_str(&format!("{} links\n\n", links.len()));
    for link in links {
        output.push_str(&format!(
            "{}  ({} clicks)\n",
            short_url(base_url, &link.short_code),
            link.click_count
        ));
        output.push_str(&format!("   -> {}\n", truncate(&link.original_url, 76)));
        if let Some(created) = link.created_date {
            output.push_str(&format!("   created {}\n", created.format("%Y-%m-%d %H:%M")));
        }
    }

    output
}

pub fn created(link: &ShortLink, base_url: &str) -> String {
    format!(
        "Shortened {}\n       -> {}\n",
        short_url(base_url, &link.short_code),
        link.original_url
    )
}

/// Format an analytics snapshot: totals, per-source problems, then one bar per day
pub fn analytics(snapshot: &AnalyticsSnapshot) -> String {
    let mut output = String::new();
    let selection = &snapshot.selection;
    let summary = &snapshot.summary;

    let scope = match (&snapshot.selected_link, selection.short_code()) {
        (Some(link), _) => format!("{} -> {}", link.short_code, link.original_url),
        (None, Some(code)) => code.to_string(),
        (None, None) => "all links".to_string(),
    };
    output.push_str(&format!(
        "Analytics for {} ({} to {})\n\n",
        scope,
        selection.start(),
        selection.end()
    ));

    output.push_str(&format!("  Clicks in range  {}\n", summary.total_clicks_in_range));
    output.push_str(&format!("  Total links      {}\n", summary.total_links));
    output.push_str(&format!("  Days tracked     {}\n", summary.days_tracked));

    for (name, error) in [
        ("links", source_error(&snapshot.view.link_inventory)),
        ("clicks", source_error(&snapshot.view.click_events)),
        ("daily totals", source_error(&snapshot.view.daily_clicks)),
    ] {
        if let Some(message) = error {
            output.push_str(&format!("  ! {}: {}\n", name, message));
        }
    }
    output.push('\n');

    if summary.daily_bars.is_empty() {
        output.push_str("No clicks recorded in this range.\n");
        return output;
    }

    for bar in &summary.daily_bars {
        let width = ((bar.magnitude * BAR_WIDTH as f64).round() as usize).max(1);
        output.push_str(&format!(
            "  {}  {:<width$} {}\n",
            bar.date.format("%Y-%m-%d"),
            "#".repeat(width),
            bar.clicks,
            width = BAR_WIDTH
        ));
    }

    output
}

fn source_error<T>(source: &SourceState<T>) -> Option<&str> {
    source.error.as_deref()
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let kept: String = text.chars().take(max - 3).collect();
        format!("{}...", kept)
    } else {
        text.to_string()
    }
}
