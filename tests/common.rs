//! Shared test fixtures and utilities for factory-location tests.

#![allow(dead_code)]

use factory_location::GitRemote;
use rstest::fixture;

/// Remotes from `(name, url)` pairs.
pub fn remotes(pairs: &[(&str, &str)]) -> Vec<GitRemote> {
    pairs
        .iter()
        .map(|(name, url)| GitRemote::new(*name, *url))
        .collect()
}

/// A github location with a branch, remotes and a devfile.
#[fixture]
pub fn github_location() -> String {
    "https://github.com/eclipse-che/che-dashboard/tree/main?remotes={{test-1,http://test-1.git}}&df=devfile2.yaml"
        .to_owned()
}

/// The same parameters on an ssh location.
#[fixture]
pub fn ssh_location() -> String {
    "git@github.com:eclipse-che/che-dashboard.git?remotes={{test-1,http://test-1.git}}&df=devfile2.yaml"
        .to_owned()
}
