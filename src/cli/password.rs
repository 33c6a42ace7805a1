//! Password recovery commands

use crate::cli::{failure, Context};
use clap::Parser;
use dialoguer::{theme::ColorfulTheme, Password};

/// Arguments for the forgot-password command
#[derive(Parser, Debug)]
pub struct ForgotPasswordArgs {
    /// Email address of the account
    pub email: String,
}

/// Arguments for the reset-password command
#[derive(Parser, Debug)]
#[command(after_help = "The token comes from the link in the reset email.")]
pub struct ResetPasswordArgs {
    /// Reset token from the email
    #[arg(short, long)]
    pub token: String,
}

pub async fn forgot(ctx: &Context, args: ForgotPasswordArgs) -> anyhow::Result<()> {
    let ack = ctx
        .auth_api()
        .forgot_password(&args.email)
        .await
        .map_err(|e| failure(e, "Failed to send reset link."))?;
    println!("{}", ack);
    Ok(())
}

pub async fn reset(ctx: &Context, args: ResetPasswordArgs) -> anyhow::Result<()> {
    let new_password = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("New password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?;

    let ack = ctx
        .auth_api()
        .reset_password(&args.token, &new_password)
        .await
        .map_err(|e| failure(e, "Failed to reset password."))?;
    println!("{}", ack);
    Ok(())
}
