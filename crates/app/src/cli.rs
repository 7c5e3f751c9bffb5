use clap::{Parser, Subcommand};

use crate::logging::Verbosity;

pub const DEFAULT_DB_URL: &str = "sqlite://roadmap.sqlite3";

/// Career roadmaps for Indian students, from stream choice to first job.
#[derive(Debug, Parser)]
#[command(name = "career-roadmap", version, about, long_about = None)]
pub struct Cli {
    /// Server origin, without the `/api` prefix
    #[arg(long, global = true, env = "ROADMAP_API_URL", value_name = "URL")]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "ROADMAP_API_TIMEOUT_SECS", value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// SQLite database holding the saved session
    #[arg(
        long = "db",
        global = true,
        env = "ROADMAP_DB_URL",
        default_value = DEFAULT_DB_URL,
        value_name = "SQLITE_URL"
    )]
    pub db_url: String,

    /// Use the bundled catalog and an in-process backend instead of the server
    #[arg(long, global = true, env = "ROADMAP_OFFLINE")]
    pub offline: bool,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Open the desktop window (default)
    Ui,
    /// Forget the saved session
    Logout,
    /// Print the signed-in user from the saved session
    Whoami,
}

impl Cli {
    #[must_use]
    pub fn subcommand(&self) -> Command {
        self.command.unwrap_or(Command::Ui)
    }

    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.verbose, self.quiet)
    }
}
