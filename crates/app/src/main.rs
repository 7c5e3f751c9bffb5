mod cli;
mod logging;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{ApiConfig, AppServices, AuthServiceError};
use storage::repository::Storage;
use ui::{App, UiApp, build_app_context};

use crate::cli::{Cli, Command};
use crate::logging::init_logging;

#[derive(Debug)]
enum ArgsError {
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn normalize_sqlite_url(raw: &str) -> Result<String, ArgsError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ArgsError::InvalidDbUrl { raw: raw.to_string() });
    }
    if trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite://") {
        return Ok(trimmed.to_string());
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    Ok(format!("sqlite://{}", absolute.display()))
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

fn api_config(cli: &Cli) -> ApiConfig {
    let mut config = cli
        .api_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map_or_else(ApiConfig::default, ApiConfig::new);
    if let Some(secs) = cli.timeout_secs.filter(|secs| *secs > 0) {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    config
}

async fn open_storage(cli: &Cli) -> Result<Storage, Box<dyn std::error::Error>> {
    // Offline accounts die with the process, so their sessions must too.
    if cli.offline {
        tracing::debug!("offline run; session kept in memory");
        return Ok(Storage::in_memory());
    }

    // Open + migrate SQLite here so services never touch the filesystem layout.
    let db_url = normalize_sqlite_url(&cli.db_url)?;
    prepare_sqlite_file(&db_url)?;
    let storage = Storage::sqlite(&db_url).await?;
    tracing::debug!(%db_url, "session store ready");
    Ok(storage)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbosity());

    let storage = open_storage(&cli).await?;
    let services = if cli.offline {
        AppServices::new_offline(&storage)?
    } else {
        AppServices::new_http(api_config(&cli), &storage)?
    };

    match cli.subcommand() {
        Command::Ui => {
            let app: Arc<dyn UiApp> = Arc::new(services);
            let context = build_app_context(&app);

            // Some dev setups default to an always-on-top window.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Career Roadmap")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Logout => {
            services.auth().logout().await?;
            println!("Signed out.");
            Ok(())
        }
        Command::Whoami => {
            let auth = services.auth();
            let user = match auth.refresh_profile().await {
                Ok(user) => Some(user),
                Err(AuthServiceError::NotAuthenticated) => None,
                Err(err) => {
                    tracing::warn!(error = %err, "profile refresh failed; using cached user");
                    auth.cached_user().await?
                }
            };
            match user {
                Some(user) => {
                    let stream = user
                        .selected_stream
                        .map_or_else(|| "no stream selected".to_string(), |s| s.to_string());
                    println!("{} <{}> ({stream})", user.name, user.email);
                }
                None => println!("Not signed in."),
            }
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
