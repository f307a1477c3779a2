//! The git block of a devfile project and the remotes configured on it.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    error::LocationResult,
    remotes::{GitRemote, parse_remotes},
};

/// The name a repository is cloned into, the last path segment without `.git`.
///
/// ```
/// use factory_location::project::project_name;
///
/// assert_eq!(project_name("git@github.com:eclipse-che/che-dashboard.git"), "che-dashboard");
/// assert_eq!(project_name("https://github.com/eclipse-che/che-dashboard/"), "che-dashboard");
/// ```
pub fn project_name(location: &str) -> String {
    let path = location
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/');
    let name = path.rsplit(['/', ':']).next().unwrap_or(path);
    name.strip_suffix(".git").unwrap_or(name).to_owned()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutFrom {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GitProject {
    #[serde(default)]
    pub remotes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkout_from: Option<CheckoutFrom>,
}

impl GitProject {
    /// A project for a `remotes` value, `None` if it names no remotes.
    pub fn from_remotes(value: &str) -> LocationResult<Option<Self>> {
        let remotes = parse_remotes(value)?;
        let Some(checkout) = checkout_remote(&remotes) else {
            return Ok(None);
        };
        let mut project = Self::default();
        project.add_remotes(&checkout.name, &remotes);
        Ok(Some(project))
    }

    /// Merges the remotes of a `remotes` value into this project.
    ///
    /// The project checks out `origin` if it has one already, otherwise the
    /// `origin` of `value` or its first remote. Returns the checkout remote.
    pub fn configure_remotes(&mut self, value: &str) -> LocationResult<Option<String>> {
        let remotes = parse_remotes(value)?;
        let Some(checkout) = checkout_remote(&remotes) else {
            return Ok(None);
        };
        let checkout = if self.remotes.contains_key("origin") {
            "origin"
        } else {
            checkout.name.as_str()
        };
        self.add_remotes(checkout, &remotes);
        Ok(Some(checkout.to_owned()))
    }

    pub fn checkout_remote(&self) -> Option<&str> {
        self.checkout_from.as_ref()?.remote.as_deref()
    }

    /// The url of the checkout remote.
    pub fn checkout_url(&self) -> Option<&str> {
        self.remotes
            .get(self.checkout_remote()?)
            .map(String::as_str)
    }

    fn add_remotes(&mut self, checkout: &str, remotes: &[GitRemote]) {
        for remote in remotes {
            self.remotes.insert(remote.name.clone(), remote.url.clone());
        }
        self.checkout_from
            .get_or_insert_with(CheckoutFrom::default)
            .remote = Some(checkout.to_owned());
        tracing::debug!("Checkout from remote: {checkout}");
    }
}

fn checkout_remote(remotes: &[GitRemote]) -> Option<&GitRemote> {
    remotes
        .iter()
        .find(|remote| remote.name == "origin")
        .or_else(|| remotes.first())
}
