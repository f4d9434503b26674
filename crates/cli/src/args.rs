//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Resolve the origin file that anchors every file lookup.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `dispatch` module).
//! - Does not configure logging (see `logging` module).

use clap::{Parser, Subcommand, ValueEnum};
use opskit_db::DEFAULT_DATABASE;
use opskit_secrets::DirLevel;
use opskit_secrets::constants::{DEFAULT_COMPOSE_FILE, DEFAULT_ENV_FILE};
use std::path::PathBuf;

/// File name used as the origin when `--origin` is not given, so that the
/// first candidate directory is the current working directory.
const CWD_ORIGIN: &str = ".opskit-origin";

#[derive(Parser, Debug)]
#[command(name = "opskit")]
#[command(about = "Locate secret files, load them, and wire them into compose files and databases", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  opskit locate creds.env\n  opskit --dir-level 3 secrets keys\n  opskit compose fill --dry-run\n  opskit sql tables\n  opskit sql query 'SELECT 1'\n"
)]
pub struct Cli {
    /// File whose directory, parent and grandparent are searched for targets.
    ///
    /// Defaults to a file in the current directory.
    #[arg(long, global = true, env = "OPSKIT_ORIGIN", value_name = "FILE")]
    pub origin: Option<PathBuf>,

    /// Use only this candidate directory (1 = origin's directory, 2 = parent, 3 = grandparent)
    #[arg(long, global = true, value_parser = clap::value_parser!(u8).range(1..=3))]
    pub dir_level: Option<u8>,

    /// Log level (RUST_LOG takes precedence when set)
    #[arg(long, global = true, env = "OPSKIT_LOG_LEVEL", value_enum, default_value_t = LogLevel::Default)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// The origin file, falling back to a placeholder in the current directory.
    pub fn origin_path(&self) -> std::io::Result<PathBuf> {
        match &self.origin {
            Some(path) if !path.as_os_str().is_empty() => Ok(path.clone()),
            _ => Ok(std::env::current_dir()?.join(CWD_ORIGIN)),
        }
    }

    pub fn dir_level(&self) -> Option<DirLevel> {
        // Range-checked by clap.
        self.dir_level.and_then(|l| DirLevel::try_from(l).ok())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
    Default,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the resolved path of a file near the origin
    Locate {
        /// File name to look for
        target: String,
    },

    /// Load an environment file and inspect its secrets
    Secrets {
        #[command(subcommand)]
        command: SecretsCommand,
    },

    /// Inject secrets into a docker-compose file
    Compose {
        #[command(subcommand)]
        command: ComposeCommand,
    },

    /// Run database introspection and queries
    Sql {
        /// Environment file holding POSTGRES_USER, POSTGRES_PASSWORD and POSTGRES_ADDRESS
        #[arg(long, default_value = DEFAULT_ENV_FILE)]
        env_file: String,

        /// Database name
        #[arg(long, env = "OPSKIT_DATABASE", default_value = DEFAULT_DATABASE)]
        database: String,

        /// Log every executed statement
        #[arg(long)]
        echo: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,

        #[command(subcommand)]
        command: SqlCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum SecretsCommand {
    /// Load the environment file and list the keys it defines (values are never printed)
    Keys {
        #[arg(long, default_value = DEFAULT_ENV_FILE)]
        env_file: String,
    },

    /// Load the environment file and verify each named secret is set and non-empty
    Check {
        /// Secret names to verify
        #[arg(required = true)]
        names: Vec<String>,

        #[arg(long, default_value = DEFAULT_ENV_FILE)]
        env_file: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ComposeCommand {
    /// Rewrite every service environment block with values from the environment file
    Fill {
        #[arg(long, default_value = DEFAULT_ENV_FILE)]
        env_file: String,

        #[arg(long, default_value = DEFAULT_COMPOSE_FILE)]
        compose_file: String,

        /// Print the rewritten document instead of saving it
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum SqlCommand {
    /// List tables in the public schema
    Tables,

    /// Describe the columns of a table
    Columns { table: String },

    /// List the column names of a table
    ColumnNames { table: String },

    /// Execute a raw SQL query and print every row
    Query { sql: String },

    /// Create the ratings table if it does not exist
    CreateRatings,

    /// Insert a rating into the ratings table
    Rate {
        #[arg(value_parser = clap::value_parser!(i32).range(0..=5))]
        stars: i32,
    },

    /// Run the sample session: a payments join, column names, then tables
    Demo {
        #[arg(long, default_value = "customer")]
        table: String,

        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
}
