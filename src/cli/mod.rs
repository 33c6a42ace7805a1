//! CLI command definitions and handlers

pub mod analytics;
pub mod list;
pub mod login;
pub mod logout;
pub mod password;
pub mod register;
pub mod resolve;
pub mod shorten;
pub mod status;

use crate::api::{AuthApi, RedirectApi, UrlApi};
use crate::auth::{CredentialStore, SessionEvent, SessionEvents, SessionGuard};
use crate::core::config::Config;
use crate::http::{HttpClient, ReqwestTransport};
use anyhow::{bail, Context as _};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

const LONG_ABOUT: &str = r#"
Command-line client for the ClickCut URL shortener.

QUICK START:
    1. clickcut register          Create an account (signs you in)
    2. clickcut shorten <url>     Shorten a link
    3. clickcut analytics         Clicks for your first link, last 30 days

ACCOUNT:
    clickcut login                Sign in
    clickcut logout               Sign out and forget the stored session
    clickcut forgot-password      Email yourself a reset link
    clickcut reset-password       Set a new password with a reset token
    clickcut status               Show the server and the signed-in user

LINKS:
    clickcut list                 Your links, newest first
    clickcut resolve <code>       Where a short code points (counts a click)

ANALYTICS:
    clickcut analytics --link abc123 --from 2024-01-01 --to 2024-01-31
    clickcut analytics --all      Daily totals across every link

CONFIGURATION:
    Settings live in $CLICKCUT_HOME/config.toml. CLICKCUT_API_URL overrides
    the server address and CLICKCUT_LOG sets the log filter.
"#;

/// ClickCut URL shortener client
#[derive(Parser, Debug)]
#[command(name = "clickcut")]
#[command(author, version)]
#[command(about = "ClickCut URL shortener client")]
#[command(long_about = LONG_ABOUT)]
#[command(propagate_version = true)]
pub struct Cli {
    /// JSON output
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in with username and password
    Login(login::LoginArgs),

    /// Create an account and sign in
    Register(register::RegisterArgs),

    /// Sign out and remove the stored session
    Logout,

    /// Request a password reset email
    ForgotPassword(password::ForgotPasswordArgs),

    /// Set a new password using a reset token
    ResetPassword(password::ResetPasswordArgs),

    /// Shorten a URL
    #[command(visible_alias = "s")]
    Shorten(shorten::ShortenArgs),

    /// List your short links
    #[command(visible_alias = "ls")]
    List,

    /// Click analytics for one link or all links
    #[command(visible_alias = "a")]
    Analytics(analytics::AnalyticsArgs),

    /// Show where a short code redirects
    Resolve(resolve::ResolveArgs),

    /// Show the configured server and the signed-in user
    Status,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

impl OutputFormat {
    pub fn from_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Everything a command needs to talk to the server
pub struct Context {
    pub config: Config,
    pub format: OutputFormat,
    pub guard: Arc<SessionGuard>,
    pub http: Arc<HttpClient>,
    events: broadcast::Receiver<SessionEvent>,
    had_session: bool,
}

impl Context {
    pub fn open(format: OutputFormat) -> anyhow::Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Config::ensure_home().context("Failed to create clickcut home directory")?;

        let store = Arc::new(CredentialStore::open(Config::session_path()?));
        let had_session = store.is_signed_in();
        let events = Arc::new(SessionEvents::default());
        let receiver = events.subscribe();
        let guard = Arc::new(SessionGuard::new(store, events));

        let transport = Arc::new(
            ReqwestTransport::new(&config.api.base_url)
                .with_context(|| format!("Invalid server address '{}'", config.api.base_url))?,
        );
        let http = Arc::new(HttpClient::with_session(transport, guard.clone()));

        Ok(Self {
            config,
            format,
            guard,
            http,
            events: receiver,
            had_session,
        })
    }

    pub fn auth_api(&self) -> AuthApi {
        AuthApi::new(self.http.clone())
    }

    pub fn url_api(&self) -> UrlApi {
        UrlApi::new(self.http.clone())
    }

    pub fn redirect_api(&self) -> RedirectApi {
        RedirectApi::new(self.http.clone())
    }

    /// Fail fast instead of sending a request the server will reject
    pub fn require_session(&self) -> anyhow::Result<()> {
        if !self.guard.store().is_signed_in() {
            bail!("Not signed in. Run 'clickcut login' first.");
        }
        Ok(())
    }

    /// Report session events raised while the command ran
    pub fn finish(mut self) {
        while let Ok(event) = self.events.try_recv() {
            debug!(?event, "Session event");
            match event {
                SessionEvent::SignedOut => return,
                SessionEvent::Navigate { .. } => {
                    if self.had_session {
                        eprintln!("Your session has ended. Run 'clickcut login' to sign in again.");
                    }
                    return;
                }
                SessionEvent::SignedIn { .. } => {}
            }
        }
    }
}

/// Dispatch a parsed command line
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = Context::open(OutputFormat::from_flag(cli.json))?;

    let result = match cli.command {
        Commands::Login(args) => login::run(&ctx, args).await,
        Commands::Register(args) => register::run(&ctx, args).await,
        Commands::Logout => logout::run(&ctx),
        Commands::ForgotPassword(args) => password::forgot(&ctx, args).await,
        Commands::ResetPassword(args) => password::reset(&ctx, args).await,
        Commands::Shorten(args) => shorten::run(&ctx, args).await,
        Commands::List => list::run(&ctx).await,
        Commands::Analytics(args) => analytics::run(&ctx, args).await,
        Commands::Resolve(args) => resolve::run(&ctx, args).await,
        Commands::Status => status::run(&ctx),
    };

    ctx.finish();
    result
}

/// Turn an API failure into the message a user should see
pub(crate) fn failure(error: crate::Error, fallback: &str) -> anyhow::Error {
    debug!(%error, "Command failed");
    anyhow::anyhow!(error.user_message(fallback))
}
