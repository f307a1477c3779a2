//! Classification and normalization of factory locations.
//!
//! A factory location is a repository reference pasted by a user, either in
//! http(s) form:
//!
//! ```markdown
//! https://github.com/eclipse-che/che-dashboard/tree/main?df=devfile.yaml
//! ```
//!
//! or in one of the ssh forms:
//!
//! ```markdown
//! git@github.com:eclipse-che/che-dashboard.git
//! ssh://git@github.com:22/eclipse-che/che-dashboard.git
//! ```
use std::{fmt::Display, str::FromStr};

use nom::{
    bytes::complete::{tag, take_while1},
    character::complete::{char, digit1},
    combinator::{opt, rest},
    sequence::{pair, terminated},
    IResult,
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    config::LocationConfig,
    error::{LocationError, LocationResult},
    params::SearchParams,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    Http,
    Ssh,
}

/// A parsed factory location.
///
/// The path is kept verbatim, only the query is decoded into [`SearchParams`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactoryLocation {
    kind: LocationKind,
    path: String,
    search_params: SearchParams,
    transient_params: Vec<String>,
}

impl FactoryLocation {
    /// Parses `input`, dropping the default transient OAuth parameters on serialization.
    pub fn parse(input: &str) -> LocationResult<Self> {
        Self::parse_with(input, &LocationConfig::default())
    }

    pub fn parse_with(input: &str, config: &LocationConfig) -> LocationResult<Self> {
        let trimmed = input.trim();
        let (path, query) = split_query(trimmed);

        let kind =
            classify(path).ok_or_else(|| LocationError::UnsupportedLocation(input.to_owned()))?;
        tracing::debug!("Parsed {kind:?} location: {path}");

        Ok(Self {
            kind,
            path: path.to_owned(),
            search_params: query.map(SearchParams::parse).unwrap_or_default(),
            transient_params: config.transient_params.clone(),
        })
    }

    /// Whether `input` is an absolute http(s) url with a host.
    ///
    /// Whitespace inside the path is accepted, users paste such urls.
    pub fn is_http_location(input: &str) -> bool {
        match Url::parse(input.trim()) {
            Ok(url) => {
                matches!(url.scheme(), "http" | "https")
                    && url.host_str().is_some_and(|host| !host.is_empty())
            }
            Err(_) => false,
        }
    }

    /// Whether `input` is an scp-like `user@host:path` or an `ssh://` location.
    pub fn is_ssh_location(input: &str) -> bool {
        let input = input.trim();
        let path = match scp_like(input).or_else(|_| ssh_url(input)) {
            Ok((_, path)) => path,
            Err(_) => return false,
        };
        !path.is_empty() && !path.contains(char::is_whitespace)
    }

    pub fn kind(&self) -> LocationKind {
        self.kind
    }

    pub fn is_http(&self) -> bool {
        self.kind == LocationKind::Http
    }

    pub fn is_ssh(&self) -> bool {
        self.kind == LocationKind::Ssh
    }

    /// The location without its query.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Replaces the path, keeping the parameters.
    pub fn set_path(&mut self, path: &str) -> LocationResult<()> {
        self.kind =
            classify(path).ok_or_else(|| LocationError::UnsupportedLocation(path.to_owned()))?;
        self.path = path.to_owned();
        Ok(())
    }

    pub fn search_params(&self) -> &SearchParams {
        &self.search_params
    }

    pub fn search_params_mut(&mut self) -> &mut SearchParams {
        &mut self.search_params
    }

    /// Parameters as they are serialized, without the transient ones.
    pub fn persistent_params(&self) -> SearchParams {
        let mut params = self.search_params.clone();
        for param in &self.transient_params {
            if params.delete(param) {
                tracing::debug!("Dropped transient parameter: {param}");
            }
        }
        params
    }
}

impl Display for FactoryLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let params = self.persistent_params();
        if params.is_empty() {
            write!(f, "{}", self.path)
        } else {
            write!(f, "{}?{params}", self.path)
        }
    }
}

impl FromStr for FactoryLocation {
    type Err = LocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for FactoryLocation {
    type Error = LocationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

fn classify(path: &str) -> Option<LocationKind> {
    if FactoryLocation::is_http_location(path) {
        Some(LocationKind::Http)
    } else if FactoryLocation::is_ssh_location(path) {
        Some(LocationKind::Ssh)
    } else {
        None
    }
}

/// Splits at the first `?`.
/// Some producers join the query with `&` instead, that is accepted when no `?` is present.
fn split_query(input: &str) -> (&str, Option<&str>) {
    if let Some((path, query)) = input.split_once('?') {
        return (path, Some(query));
    }
    match input.split_once('&') {
        Some((path, query)) => (path, Some(query)),
        None => (input, None),
    }
}

fn is_user_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')
}

fn is_host_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_')
}

/// `user@host:path`
fn scp_like(input: &str) -> IResult<&str, &str> {
    let (input, _user) = terminated(take_while1(is_user_char), char('@'))(input)?;
    let (input, _host) = terminated(take_while1(is_host_char), char(':'))(input)?;
    rest(input)
}

/// `ssh://[user@]host[:port]/path`
fn ssh_url(input: &str) -> IResult<&str, &str> {
    let (input, _) = tag("ssh://")(input)?;
    let (input, _user) = opt(terminated(take_while1(is_user_char), char('@')))(input)?;
    let (input, (_host, _port)) =
        pair(take_while1(is_host_char), opt(pair(char(':'), digit1)))(input)?;
    let (input, _) = char('/')(input)?;
    rest(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_location() {
        let location = FactoryLocation::parse("https://git-test.com/dummy.git").unwrap();
        assert!(location.is_http());
        assert!(!location.is_ssh());
        assert_eq!(location.path(), "https://git-test.com/dummy.git");
    }

    #[test]
    fn ssh_location() {
        let location =
            FactoryLocation::parse("git@github.com:eclipse-che/che-dashboard.git").unwrap();
        assert!(location.is_ssh());
        assert!(!location.is_http());
    }

    #[test]
    fn unsupported_location() {
        let err = FactoryLocation::parse("dummy.git").unwrap_err();
        assert_eq!(err.to_string(), "Unsupported factory location: \"dummy.git\"");
    }

    #[test]
    fn http_classification() {
        assert!(FactoryLocation::is_http_location("http://test-location"));
        assert!(FactoryLocation::is_http_location(
            "https://github.com/eclipse-che/che dashboard"
        ));
        assert!(!FactoryLocation::is_http_location("http://"));
        assert!(!FactoryLocation::is_http_location("ftp://github.com/a/b"));
        assert!(!FactoryLocation::is_http_location("git@github.com:a/b.git"));
        assert!(!FactoryLocation::is_http_location(""));
    }

    #[test]
    fn ssh_classification() {
        assert!(FactoryLocation::is_ssh_location("git@github.com:test/test.git"));
        assert!(FactoryLocation::is_ssh_location(
            "ssh://git@github.com:2222/test/test.git"
        ));
        assert!(FactoryLocation::is_ssh_location("ssh://example.com/repo.git"));
        assert!(!FactoryLocation::is_ssh_location("git@github.com"));
        assert!(!FactoryLocation::is_ssh_location("git@github.com:"));
        assert!(!FactoryLocation::is_ssh_location("ssh://github.com"));
        assert!(!FactoryLocation::is_ssh_location("https://github.com/a/b"));
    }

    #[test]
    fn drops_transient_params() {
        let location = FactoryLocation::parse(
            "git@github.com:eclipse-che/che-dashboard.git?session_state=X&che-editor=che-incubator/checode/insiders",
        )
        .unwrap();
        assert_eq!(location.search_params().get("session_state"), Some("X"));
        assert_eq!(
            location.to_string(),
            "git@github.com:eclipse-che/che-dashboard.git?che-editor=che-incubator%2Fchecode%2Finsiders"
        );
    }

    #[test]
    fn ampersand_separated_query() {
        let location =
            FactoryLocation::parse("https://github.com/a/b&df=devfile2.yaml").unwrap();
        assert_eq!(location.path(), "https://github.com/a/b");
        assert_eq!(location.search_params().get("df"), Some("devfile2.yaml"));
    }

    #[test]
    fn no_separator_without_params() {
        let mut location = FactoryLocation::parse("https://github.com/a/b?session=1").unwrap();
        assert_eq!(location.to_string(), "https://github.com/a/b");
        location.search_params_mut().set("new", "");
        assert_eq!(location.to_string(), "https://github.com/a/b?new=");
    }

    #[test]
    fn set_path_reclassifies() {
        let mut location = FactoryLocation::parse("https://github.com/a/b?df=x.yaml").unwrap();
        location.set_path("git@github.com:a/b.git").unwrap();
        assert!(location.is_ssh());
        assert_eq!(location.to_string(), "git@github.com:a/b.git?df=x.yaml");
        assert!(location.set_path("b.git").is_err());
        assert!(location.is_ssh());
    }

    #[test]
    fn configured_transient_params() {
        let config = LocationConfig {
            transient_params: vec!["token".to_owned()],
        };
        let location =
            FactoryLocation::parse_with("https://github.com/a/b?token=1&session=2", &config)
                .unwrap();
        assert_eq!(location.to_string(), "https://github.com/a/b?session=2");
    }
}
