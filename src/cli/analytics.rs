//! Analytics command implementation

use crate::analytics::{AnalyticsEngine, AnalyticsSelection};
use crate::cli::Context;
use crate::output::{self, human};
use chrono::{Local, NaiveDate};
use clap::Parser;

/// Arguments for the analytics command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:
    clickcut analytics                        First link, default range
    clickcut analytics --link abc123          One link
    clickcut analytics --all --from 2024-01-01
    clickcut analytics --json                 Full snapshot as JSON

Without --link or --all the first of your links is shown, as on the dashboard.")]
pub struct AnalyticsArgs {
    /// Short code to report on
    #[arg(short, long, conflicts_with = "all")]
    pub link: Option<String>,

    /// Aggregate across every link
    #[arg(long)]
    pub all: bool,

    /// First day of the range (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day of the range (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

pub async fn run(ctx: &Context, args: AnalyticsArgs) -> anyhow::Result<()> {
    ctx.require_session()?;

    let today = Local::now().date_naive();
    let default = AnalyticsSelection::trailing(today, ctx.config.analytics.default_range_days)?;
    let end = args.to.unwrap_or(default.end());
    let start = args.from.unwrap_or(default.start());
    let selection = AnalyticsSelection::new(args.link.clone(), start, end)?;

    let mut engine = AnalyticsEngine::new(ctx.url_api(), selection);
    if args.all {
        engine = engine.with_link_chosen();
    }
    engine.mount();
    engine.settle().await;

    let snapshot = engine.snapshot();
    output::emit(ctx.format, &snapshot, human::analytics);
    Ok(())
}
