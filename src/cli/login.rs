//! Login command implementation

use crate::api::types::LoginRequest;
use crate::cli::{failure, Context, OutputFormat};
use clap::Parser;
use dialoguer::{theme::ColorfulTheme, Input, Password};
use tracing::info;

/// Arguments for the login command
#[derive(Parser, Debug)]
pub struct LoginArgs {
    /// Username (prompted when omitted)
    #[arg(short, long)]
    pub username: Option<String>,
}

pub async fn run(ctx: &Context, args: LoginArgs) -> anyhow::Result<()> {
    let theme = ColorfulTheme::default();
    let username = match args.username {
        Some(username) => username,
        None => Input::with_theme(&theme)
            .with_prompt("Username")
            .interact_text()?,
    };
    let password = Password::with_theme(&theme)
        .with_prompt("Password")
        .interact()?;

    let request = LoginRequest { username, password };
    let credential = ctx
        .guard
        .login(&ctx.auth_api(), &request)
        .await
        .map_err(|e| {
            if e.is_unauthorized() {
                anyhow::anyhow!("Invalid username or password")
            } else {
                failure(e, "Login failed")
            }
        })?;
    info!(username = %credential.user.username, "Logged in");

    match ctx.format {
        OutputFormat::Human => println!("Signed in as {}", credential.user.username),
        OutputFormat::Json => println!("{}", crate::output::json::format(&credential.user)),
    }
    Ok(())
}
