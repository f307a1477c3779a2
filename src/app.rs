use serde::Serialize;

use crate::cli::{CliArgs, Command, OutputFormat};
use crate::config::{Config, ConfigError};
use crate::error::LocationError;
use crate::location::{FactoryLocation, LocationKind};
use crate::bytes::format_bytes;
use crate::options::{AdvancedOptions, GitRepoOptions};
use crate::provider::{branch_from_location_with, set_branch_to_location_with};
use crate::remotes::{GitRemote, parse_remotes, remotes_to_param};
use crate::validate::{Validated, validate_location};

pub type Result<T> = std::result::Result<T, HandlerError>;

#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("{0}")]
    Location(#[from] LocationError),

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected a remote in the form NAME=URL, got: {0}")]
    InvalidRemote(String),
}

#[derive(Debug, Serialize)]
struct Normalized {
    kind: LocationKind,
    location: String,
}

#[derive(Debug, Serialize)]
struct Options {
    git: GitRepoOptions,
    advanced: AdvancedOptions,
}

#[derive(Debug, Serialize)]
struct Check {
    http: bool,
    ssh: bool,
    valid: Validated,
}

/// Main entry point for the application.
///
/// Loads the configuration and prints the output of the requested command.
pub fn run(args: CliArgs) -> Result<()> {
    let config = Config::load_from(args.config().map(|path| path.as_path()))?;
    let output = render(&args, &config)?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

/// The output of a command, without printing it.
pub fn render(args: &CliArgs, config: &Config) -> Result<String> {
    let format = args.format();
    match args.subcommand() {
        Command::Remotes { value } => {
            let remotes = parse_remotes(value)?;
            let text = lines(remotes.iter());
            emit(format, text, &remotes)
        }
        Command::EncodeRemotes { remotes } => {
            let remotes = remotes
                .iter()
                .map(String::as_str)
                .map(parse_remote_arg)
                .collect::<Result<Vec<_>>>()?;
            let param = remotes_to_param(&remotes);
            emit(format, param.clone(), &param)
        }
        Command::Normalize { location } => {
            let location = FactoryLocation::parse_with(location, &config.location)?;
            let normalized = Normalized {
                kind: location.kind(),
                location: location.to_string(),
            };
            emit(format, normalized.location.clone(), &normalized)
        }
        Command::Check { location, ssh_keys } => {
            let check = Check {
                http: FactoryLocation::is_http_location(location),
                ssh: FactoryLocation::is_ssh_location(location),
                valid: validate_location(location, *ssh_keys),
            };
            let text = format!(
                "http: {}\nssh: {}\nvalid: {}",
                check.http, check.ssh, check.valid
            );
            emit(format, text, &check)
        }
        Command::Branch { location } => {
            let branch = branch_from_location_with(location, &config.providers)?;
            emit(format, branch.clone().unwrap_or_default(), &branch)
        }
        Command::SetBranch { location, branch } => {
            let location =
                set_branch_to_location_with(location, branch.as_deref(), &config.providers)?;
            emit(format, location.clone(), &location)
        }
        Command::Options { location } => {
            let options = Options {
                git: GitRepoOptions::from_location_with(location, config)?,
                advanced: AdvancedOptions::from_location_with(location, config)?,
            };
            emit(format, options_text(&options), &options)
        }
    }
}

fn emit<T: Serialize>(format: &OutputFormat, text: String, value: &T) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(text),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
    }
}

fn lines<'a>(remotes: impl Iterator<Item = &'a GitRemote>) -> String {
    remotes
        .map(|remote| remote.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

fn options_text(Options { git, advanced }: &Options) -> String {
    fn show<T: ToString>(value: Option<T>) -> String {
        value.map(|value| value.to_string()).unwrap_or_default()
    }

    let mut text = vec![
        format!("location: {}", show(git.location.as_deref())),
        format!("branch: {}", show(git.git_branch.as_deref())),
        format!("devfile: {}", show(git.devfile_path.as_deref())),
        format!("supported: {}", git.has_supported_git_service),
    ];
    if let Some(remotes) = &git.remotes {
        text.push("remotes:".to_owned());
        text.extend(remotes.iter().map(|remote| format!("  {remote}")));
    }
    text.extend([
        format!("image: {}", show(advanced.container_image.as_deref())),
        format!("temporary storage: {}", show(advanced.temporary_storage)),
        format!("create new: {}", show(advanced.create_new_if_existing)),
        format!(
            "memory limit: {}",
            show(advanced.memory_limit.and_then(|bytes| format_bytes(bytes, 3, true)))
        ),
        format!("cpu limit: {}", show(advanced.cpu_limit)),
    ]);
    text.iter()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

fn parse_remote_arg(arg: &str) -> Result<GitRemote> {
    match arg.split_once('=') {
        Some((name, url)) if !name.is_empty() && !url.is_empty() => {
            Ok(GitRemote::new(name, url))
        }
        _ => Err(HandlerError::InvalidRemote(arg.to_owned())),
    }
}
