use crate::cli::Context;
use crate::core::config::Config;
use crate::output;
use serde::Serialize;

#[derive(Serialize)]
struct StatusReport {
    api_url: String,
    session_file: String,
    signed_in: bool,
    username: Option<String>,
    email: Option<String>,
    admin: bool,
}

pub fn run(ctx: &Context) -> anyhow::Result<()> {
    let credential = ctx.guard.store().get();
    let report = StatusReport {
        api_url: ctx.config.api.base_url.clone(),
        session_file: Config::session_path()?.display().to_string(),
        signed_in: credential.is_some(),
        username: credential.as_ref().map(|c| c.user.username.clone()),
        email: credential.as_ref().and_then(|c| c.user.email.clone()),
        admin: credential.as_ref().map_or(false, |c| c.is_admin()),
    };

    output::emit(ctx.format, &report, render);
    Ok(())
}

fn render(report: &StatusReport) -> String {
    let mut out = format!("Server:   {}\n", report.api_url);
    match &report.username {
        Some(username) => {
            out.push_str(&format!("User:     {}", username));
            if let Some(email) = &report.email {
                out.push_str(&format!(" <{}>", email));
            }
            if report.admin {
                out.push_str(" (admin)");
            }
            out.push('\n');
        }
        None => out.push_str("User:     not signed in\n"),
    }
    out.push_str(&format!("Session:  {}\n", report.session_file));
    out
}
