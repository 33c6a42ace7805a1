use crate::cli::{failure, Context};
use crate::output::{self, human};
use clap::Parser;

/// Arguments for the shorten command
#[derive(Parser, Debug)]
pub struct ShortenArgs {
    /// URL to shorten
    pub url: String,
}

pub async fn run(ctx: &Context, args: ShortenArgs) -> anyhow::Result<()> {
    ctx.require_session()?;
    let link = ctx
        .url_api()
        .shorten(&args.url)
        .await
        .map_err(|e| failure(e, "Failed to shorten URL"))?;

    let base_url = &ctx.config.api.base_url;
    output::emit(ctx.format, &link, |link| human::created(link, base_url));
    Ok(())
}
