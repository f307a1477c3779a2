use std::fmt::Display;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version = CliArgs::unstable_version(), about, long_about = None)]
#[command(name = "factory-location")]
#[command(next_line_help = true)]
/// Parse and normalize git factory locations
pub struct CliArgs {
    /// Use this config file instead of the discovered one.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Output format, either `text` or `json`.
    #[arg(long, global = true, default_value_t = OutputFormat::default())]
    format: OutputFormat,

    #[command(subcommand)]
    subcommand: Command,
}

impl CliArgs {
    /// Surface current version together with the current git revision and date, if available
    fn unstable_version() -> &'static str {
        const VERSION: &str = env!("CARGO_PKG_VERSION");
        let date = option_env!("GIT_DATE").unwrap_or("no_date");
        let rev = option_env!("GIT_REV").unwrap_or("no_rev");
        // This is a memory leak, only use sparingly.
        Box::leak(format!("{VERSION} - {date} - {rev}").into_boxed_str())
    }

    pub fn config(&self) -> Option<&PathBuf> {
        self.config.as_ref()
    }

    pub fn format(&self) -> &OutputFormat {
        &self.format
    }

    pub fn subcommand(&self) -> &Command {
        &self.subcommand
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse the value of a `remotes` parameter.
    #[clap(alias = "r")]
    Remotes { value: String },
    /// Encode remotes into the value of a `remotes` parameter.
    #[command(arg_required_else_help = true)]
    EncodeRemotes {
        /// Remotes in the form `NAME=URL`.
        #[arg(required = true)]
        remotes: Vec<String>,
    },
    /// Print a location without its transient parameters.
    #[clap(alias = "n")]
    Normalize { location: String },
    /// Classify and validate a location.
    #[clap(alias = "c")]
    Check {
        location: String,
        /// The user has ssh keys, ssh locations are accepted.
        #[arg(long)]
        ssh_keys: bool,
    },
    /// Print the branch encoded in a location.
    #[clap(alias = "b")]
    Branch { location: String },
    /// Point a location at a branch, or at the default branch if none is given.
    #[command(arg_required_else_help = true)]
    SetBranch {
        location: String,
        branch: Option<String>,
    },
    /// Print the repository and workspace options of a location.
    #[clap(alias = "o")]
    Options { location: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl From<String> for OutputFormat {
    fn from(value: String) -> Self {
        use OutputFormat::*;
        match value.to_lowercase().as_str() {
            "json" => Json,
            _ => Text,
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
