//! Register command implementation

use crate::api::types::RegisterRequest;
use crate::cli::{failure, Context, OutputFormat};
use clap::Parser;
use dialoguer::{theme::ColorfulTheme, Input, Password};

/// Arguments for the register command
#[derive(Parser, Debug)]
pub struct RegisterArgs {
    /// Username (prompted when omitted)
    #[arg(short, long)]
    pub username: Option<String>,

    /// Email address (prompted when omitted)
    #[arg(short, long)]
    pub email: Option<String>,
}

pub async fn run(ctx: &Context, args: RegisterArgs) -> anyhow::Result<()> {
    let theme = ColorfulTheme::default();
    let username = match args.username {
        Some(username) => username,
        None => Input::with_theme(&theme)
            .with_prompt("Username")
            .interact_text()?,
    };
    let email = match args.email {
        Some(email) => email,
        None => Input::with_theme(&theme)
            .with_prompt("Email")
            .interact_text()?,
    };
    let password = Password::with_theme(&theme)
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?;

    let request = RegisterRequest {
        username,
        email,
        password,
    };
    let credential = ctx
        .guard
        .register(&ctx.auth_api(), &request)
        .await
        .map_err(|e| failure(e, "Registration failed"))?;

    match ctx.format {
        OutputFormat::Human => println!(
            "Account created. Signed in as {}",
            credential.user.username
        ),
        OutputFormat::Json => println!("{}", crate::output::json::format(&credential.user)),
    }
    Ok(())
}
