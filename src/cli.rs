//! Command-line argument parsing for the ora-bind harness.
//!
//! The harness stands in for the workflow host: it loads a node definition
//! and credentials, runs one invocation, and prints the output items.

use crate::config::{Config, Credentials};
use crate::db::DatabaseBackend;
use clap::Parser;
use std::path::PathBuf;

/// Run a parameterized Oracle SQL node once and print its output items as JSON.
#[derive(Parser, Debug)]
#[command(name = "ora-bind")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Node definition file (TOML, or JSON with a .json extension)
    #[arg(short = 'n', long, value_name = "PATH", required_unless_present = "describe")]
    pub node: Option<PathBuf>,

    /// Use named credentials from config
    #[arg(short = 'c', long, value_name = "NAME")]
    pub credentials: Option<String>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Database user
    #[arg(short = 'u', long, value_name = "USER")]
    pub user: Option<String>,

    /// Easy Connect string or TNS alias (e.g., dbhost:1521/ORCLPDB1)
    #[arg(long, value_name = "CONNECT_STRING")]
    pub connect_string: Option<String>,

    /// Bind parameters and print the rewritten SQL without connecting
    #[arg(long)]
    pub dry_run: bool,

    /// Use mock database (in-memory, for testing)
    #[arg(long)]
    pub mock_db: bool,

    /// Print the node description as JSON and exit
    #[arg(long)]
    pub describe: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Write logs to the log file instead of stderr
    #[arg(long)]
    pub log_file: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Returns the named credentials to use, if specified.
    pub fn credentials_name(&self) -> Option<&str> {
        self.credentials.as_deref()
    }

    /// Credentials given directly on the command line.
    ///
    /// The password is never taken from arguments.
    pub fn to_credentials(&self) -> Credentials {
        Credentials {
            user: self.user.clone(),
            password: None,
            connection_string: self.connect_string.clone(),
        }
    }

    pub fn backend(&self) -> DatabaseBackend {
        if self.mock_db {
            DatabaseBackend::Mock
        } else {
            DatabaseBackend::Oracle
        }
    }
}
