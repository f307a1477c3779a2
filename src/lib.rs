//! Convenience functionality for working with factory locations, the git
//! repository references a workspace is created from.
//!
//! A location is either an http(s) url or an ssh remote, optionally followed
//! by parameters:
//!
//! ```markdown
//! https://github.com/eclipse-che/che-dashboard/tree/main?remotes={{upstream,https://github.com/che/dashboard.git}}
//! ```
//!
//! ```
//! use factory_location::{FactoryLocation, GitRepoOptions, parse_remotes};
//!
//! let location = FactoryLocation::parse("git@github.com:a/b.git?session=1&df=x.yaml").unwrap();
//! assert!(location.is_ssh());
//! assert_eq!(location.to_string(), "git@github.com:a/b.git?df=x.yaml");
//!
//! let remotes = parse_remotes("{https://github.com/a/b.git,https://github.com/c/b.git}").unwrap();
//! assert_eq!(remotes[1].name, "upstream");
//!
//! let options = GitRepoOptions::from_location("https://gitlab.com/a/b/-/tree/dev").unwrap();
//! assert_eq!(options.git_branch.as_deref(), Some("dev"));
//! ```
#[cfg(feature = "application")]
pub mod app;
#[cfg(feature = "application")]
pub mod cli;
pub mod bytes;
pub mod config;
pub mod error;
pub mod location;
pub mod options;
pub mod params;
pub mod project;
pub mod provider;
pub mod remotes;
pub mod validate;

pub use config::Config;
pub use error::{LocationError, LocationResult};
pub use location::{FactoryLocation, LocationKind};
pub use options::{AdvancedOptions, GitRepoOptions};
pub use params::SearchParams;
pub use project::{GitProject, project_name};
pub use provider::{
    GitProvider, branch_from_location, is_supported_git_service, set_branch_to_location,
    supported_git_service,
};
pub use remotes::{GitRemote, parse_remotes, remotes_to_param};
pub use validate::{Validated, validate_branch_name, validate_location};
