mod args;
mod commands;
mod print;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use flickture_api::{ApiClient, ApiClientBuilder, ApiError};
use flickture_core::config::AppConfig;
use flickture_core::credentials::FileCredentialStore;
use flickture_core::error::CoreError;
use flickture_core::navigation::SessionExpiry;
use flickture_core::notify::ToastQueue;

use args::Cli;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("not signed in; run `flickture login <username>` first")]
    NotLoggedIn,
    #[error("{0}")]
    InvalidArgument(String),
}

impl CliError {
    /// Network and HTTP failures were already shown as a notification.
    fn already_reported(&self) -> bool {
        matches!(self, Self::Api(e) if e.is_user_facing())
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "flickture=debug,flickture_api=debug,flickture_core=debug"
    } else {
        "flickture=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match AppConfig::load() {
        Ok(config) => config.with_base_url_override(cli.base_url.clone()),
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let toasts = Arc::new(ToastQueue::new(config.notifications.auto_dismiss()));
    let session = Arc::new(SessionExpiry::new());

    let result = match build_client(&config, toasts.clone(), session.clone()) {
        Ok(client) => commands::run(&client, cli.command).await,
        Err(e) => Err(e),
    };

    for toast in toasts.drain() {
        eprintln!("{}", print::notification_line(&toast));
    }
    if session.take() {
        eprintln!("Your session has expired. Run `flickture login <username>` to sign in again.");
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if !e.already_reported() {
                eprintln!("error: {e}");
            }
            ExitCode::FAILURE
        }
    }
}

fn build_client(
    config: &AppConfig,
    toasts: Arc<ToastQueue>,
    session: Arc<SessionExpiry>,
) -> Result<ApiClient, CliError> {
    let credentials = FileCredentialStore::open(AppConfig::credentials_path())?;
    tracing::debug!(path = %credentials.path().display(), "Opened credential store");

    let client = ApiClientBuilder::from_config(&config.api)
        .credentials(Arc::new(credentials))
        .notifier(toasts)
        .navigator(session)
        .build()?;
    Ok(client)
}
