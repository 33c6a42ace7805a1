//! List command implementation

use crate::cli::{failure, Context};
use crate::output::{self, human};

/// Run the list command
pub async fn run(ctx: &Context) -> anyhow::Result<()> {
    ctx.require_session()?;
    let mut links = ctx
        .url_api()
        .my_urls()
        .await
        .map_err(|e| failure(e, "Failed to load URLs"))?;
    // Newest first; undated links keep server order at the end
    links.sort_by(|a, b| b.created_date.cmp(&a.created_date));

    let base_url = &ctx.config.api.base_url;
    output::emit(ctx.format, links.as_slice(), |links| human::links(links, base_url));
    Ok(())
}
