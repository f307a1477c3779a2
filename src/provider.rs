//! Branch names encoded in the web urls of the supported git providers.
//!
//! | provider     | branch url                                        |
//! |--------------|---------------------------------------------------|
//! | github       | `https://github.com/u/p/tree/b`                   |
//! | gitlab       | `https://gitlab.com/u/p/-/tree/b`                 |
//! | bitbucket    | `https://bitbucket.org/u/p/src/b`                 |
//! | azure-devops | `https://dev.azure.com/o/p/_git/r%3Fversion%3DGBb` |
//!
//! Azure DevOps keeps the branch in the query of the repository url. That
//! query is percent encoded into the path of the factory location, so it
//! does not mix with the factory parameters.
use std::fmt::Display;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use url::{Position, Url};

use crate::{
    config::ProviderConfig,
    error::{LocationError, LocationResult},
    params::SearchParams,
};

/// Parameters of an Azure DevOps repository url.
pub const REPO_PARAMS: [&str; 2] = ["path", "version"];

const VERSION: &str = "version";
const VERSION_BRANCH_PREFIX: &str = "GB";
const ENCODED_QUERY_START: &str = "%3F";

/// Characters `encodeURIComponent` leaves alone.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GitProvider {
    GitHub,
    GitLab,
    Bitbucket,
    #[serde(rename = "azure-devops")]
    AzureDevOps,
}

enum BranchEncoding {
    /// Path segments between `user/project` and the branch name.
    Path(&'static [&'static str]),
    /// A `version=GB<branch>` parameter of the encoded repository query.
    RepoQuery,
}

impl GitProvider {
    /// Providers in the order their names are matched against a host.
    pub const ALL: [GitProvider; 4] = [
        GitProvider::GitHub,
        GitProvider::GitLab,
        GitProvider::Bitbucket,
        GitProvider::AzureDevOps,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GitProvider::GitHub => "github",
            GitProvider::GitLab => "gitlab",
            GitProvider::Bitbucket => "bitbucket",
            GitProvider::AzureDevOps => "azure-devops",
        }
    }

    /// The part of a host that identifies the provider.
    fn host_token(self) -> &'static str {
        match self {
            GitProvider::AzureDevOps => "azure",
            provider => provider.name(),
        }
    }

    fn encoding(self) -> BranchEncoding {
        match self {
            GitProvider::GitHub => BranchEncoding::Path(&["tree"]),
            GitProvider::GitLab => BranchEncoding::Path(&["-", "tree"]),
            GitProvider::Bitbucket => BranchEncoding::Path(&["src"]),
            GitProvider::AzureDevOps => BranchEncoding::RepoQuery,
        }
    }

    /// The provider for `host`, configured hosts take precedence over the
    /// provider name being part of the host.
    pub fn from_host(host: &str, config: &ProviderConfig) -> Option<Self> {
        config
            .provider_for_host(host)
            .or_else(|| Self::ALL.into_iter().find(|p| host.contains(p.host_token())))
    }

    /// The branch `url` points at.
    pub fn extract_branch(self, url: &Url) -> Option<String> {
        match self.encoding() {
            BranchEncoding::Path(marker) => {
                let segments = path_segments(url);
                let start = 2 + marker.len();
                if segments.len() <= start || segments[2..start] != *marker {
                    return None;
                }
                Some(segments[start..].join("/"))
            }
            BranchEncoding::RepoQuery => {
                let params = repo_params(url);
                let version = params.get(VERSION)?;
                version.strip_prefix(VERSION_BRANCH_PREFIX).map(str::to_owned)
            }
        }
    }

    /// Points `url` at `branch`, or at the default branch when `branch` is `None`.
    ///
    /// Pointing a url without `user/project` at a branch fails with
    /// [`LocationError::InvalidUrl`].
    pub fn inject_branch(self, url: &mut Url, branch: Option<&str>) -> LocationResult<()> {
        match self.encoding() {
            BranchEncoding::Path(marker) => {
                let mut segments: Vec<String> = path_segments(url)
                    .into_iter()
                    .take(2)
                    .filter(|s| !s.is_empty())
                    .map(str::to_owned)
                    .collect();
                if let Some(branch) = branch {
                    if segments.len() < 2 {
                        return Err(LocationError::InvalidUrl(url.to_string()));
                    }
                    segments.extend(marker.iter().map(|s| s.to_string()));
                    segments.push(branch.to_owned());
                }
                url.set_path(&segments.join("/"));
            }
            BranchEncoding::RepoQuery => update_repo_params(url, |params| match branch {
                Some(branch) => params.set(VERSION, format!("{VERSION_BRANCH_PREFIX}{branch}")),
                None => {
                    params.delete(VERSION);
                }
            }),
        }
        Ok(())
    }
}

impl Display for GitProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn parse_url(location: &str) -> LocationResult<Url> {
    Url::parse(location).map_err(|_| LocationError::InvalidUrl(location.to_owned()))
}

fn provider_of(url: &Url, config: &ProviderConfig) -> LocationResult<GitProvider> {
    let host = url.host_str().unwrap_or_default();
    GitProvider::from_host(host, config)
        .ok_or_else(|| LocationError::UnsupportedProvider(host.to_owned()))
}

fn path_segments(url: &Url) -> Vec<&str> {
    let path = url.path();
    let path = path.strip_prefix('/').unwrap_or(path);
    let path = path.strip_suffix('/').unwrap_or(path);
    path.split('/').collect()
}

/// Splits a path at the start of an encoded repository query.
fn split_encoded_query(path: &str) -> (&str, &str) {
    let start = path
        .find(ENCODED_QUERY_START)
        .or_else(|| path.find(&ENCODED_QUERY_START.to_lowercase()));
    match start {
        Some(ix) => (&path[..ix], &path[ix + ENCODED_QUERY_START.len()..]),
        None => (path, ""),
    }
}

fn repo_params(url: &Url) -> SearchParams {
    let (_, encoded) = split_encoded_query(url.path());
    SearchParams::parse(&percent_decode_str(encoded).decode_utf8_lossy())
}

fn update_repo_params(url: &mut Url, f: impl FnOnce(&mut SearchParams)) {
    let path = url.path().to_owned();
    let (pathname, encoded) = split_encoded_query(&path);
    let mut params = SearchParams::parse(&percent_decode_str(encoded).decode_utf8_lossy());
    f(&mut params);
    if params.is_empty() {
        url.set_path(pathname);
    } else {
        let query = format!("?{params}");
        url.set_path(&format!("{pathname}{}", utf8_percent_encode(&query, COMPONENT)));
    }
}

/// Moves the repository parameters of an Azure DevOps location out of its
/// factory parameters into its encoded repository query.
///
/// A `true` placeholder is dropped. Other locations are returned unchanged.
pub fn fold_repo_params(
    location: &str,
    params: &mut SearchParams,
    config: &ProviderConfig,
) -> LocationResult<String> {
    if supported_git_service_with(location, config).ok() != Some(GitProvider::AzureDevOps) {
        return Ok(location.to_owned());
    }
    let mut moved = vec![];
    for key in REPO_PARAMS {
        if let Some(value) = params.get(key).map(str::to_owned) {
            params.delete(key);
            if value != "true" {
                moved.push((key, value));
            }
        }
    }
    if moved.is_empty() {
        return Ok(location.to_owned());
    }
    tracing::debug!("Encoding {moved:?} into {location}");
    let mut url = parse_url(location)?;
    update_repo_params(&mut url, |repo| {
        for (key, value) in moved {
            repo.set(key, value);
        }
    });
    Ok(url[..Position::AfterQuery].to_owned())
}

pub fn supported_git_service(location: &str) -> LocationResult<GitProvider> {
    supported_git_service_with(location, &ProviderConfig::default())
}

pub fn supported_git_service_with(
    location: &str,
    config: &ProviderConfig,
) -> LocationResult<GitProvider> {
    let url = parse_url(location)?;
    provider_of(&url, config)
}

pub fn is_supported_git_service(location: &str) -> bool {
    is_supported_git_service_with(location, &ProviderConfig::default())
}

pub fn is_supported_git_service_with(location: &str, config: &ProviderConfig) -> bool {
    supported_git_service_with(location, config).is_ok()
}

/// The branch encoded in `location`, if any.
pub fn branch_from_location(location: &str) -> LocationResult<Option<String>> {
    branch_from_location_with(location, &ProviderConfig::default())
}

pub fn branch_from_location_with(
    location: &str,
    config: &ProviderConfig,
) -> LocationResult<Option<String>> {
    let url = parse_url(location)?;
    let provider = provider_of(&url, config)?;
    let branch = provider
        .extract_branch(&url)
        .filter(|branch| !branch.is_empty());
    Ok(branch)
}

/// Rewrites `location` to point at `branch`, or at the default branch when
/// `branch` is `None`.
pub fn set_branch_to_location(location: &str, branch: Option<&str>) -> LocationResult<String> {
    set_branch_to_location_with(location, branch, &ProviderConfig::default())
}

pub fn set_branch_to_location_with(
    location: &str,
    branch: Option<&str>,
    config: &ProviderConfig,
) -> LocationResult<String> {
    let mut url = parse_url(location)?;
    let provider = provider_of(&url, config)?;
    let branch = branch.filter(|b| !b.is_empty());
    provider.inject_branch(&mut url, branch)?;
    tracing::debug!("Set {provider} branch {branch:?} on {location}");

    Ok(url[..Position::AfterQuery].to_owned())
}
