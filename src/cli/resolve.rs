use crate::cli::{failure, Context, OutputFormat};
use clap::Parser;
use serde_json::json;

/// Arguments for the resolve command
#[derive(Parser, Debug)]
#[command(after_help = "Resolving a code counts as a click, like visiting it.")]
pub struct ResolveArgs {
    /// Short code to look up
    pub code: String,
}

pub async fn run(ctx: &Context, args: ResolveArgs) -> anyhow::Result<()> {
    let target = ctx
        .redirect_api()
        .resolve(&args.code)
        .await
        .map_err(|e| failure(e, "Failed to resolve short code"))?;

    match ctx.format {
        OutputFormat::Json => {
            let value = json!({ "shortCode": args.code, "target": target });
            println!("{}", crate::output::json::format(&value));
        }
        OutputFormat::Human => match target {
            Some(url) => println!("{} -> {}", args.code, url),
            None => anyhow::bail!("No link found for '{}'", args.code),
        },
    }
    Ok(())
}
