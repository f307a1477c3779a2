//! The options a location carries in its parameters.
//!
//! [`GitRepoOptions`] covers the repository (branch, remotes, devfile),
//! [`AdvancedOptions`] the workspace (image, storage, limits).
use serde::{Deserialize, Serialize};

use crate::{
    bytes::{format_bytes, parse_bytes},
    config::Config,
    error::LocationResult,
    location::FactoryLocation,
    provider::{
        branch_from_location_with, fold_repo_params, is_supported_git_service_with,
        set_branch_to_location_with,
    },
    remotes::{GitRemote, parse_remotes, remotes_to_param},
};

const REMOTES: &str = "remotes";
const DEVFILE_PATH: &str = "devfilePath";
const DEVFILE_FILENAME: &str = "override.devfileFilename";
const DEVFILE_FILENAME_SHORT: &str = "df";

const IMAGE: &str = "image";
const STORAGE_TYPE: &str = "storageType";
const EPHEMERAL: &str = "ephemeral";
const POLICIES_CREATE: &str = "policies.create";
const PER_CLICK: &str = "perclick";
const NEW: &str = "new";
const MEMORY_LIMIT: &str = "memoryLimit";
const CPU_LIMIT: &str = "cpuLimit";

/// A parameter without a usable value.
fn is_placeholder(value: &str) -> bool {
    value.is_empty() || value == "true"
}

/// Parses `location` with `df` renamed to `override.devfileFilename`.
///
/// With `repo_params` the repository parameters of an Azure DevOps location
/// are moved into its path.
fn factory_params(
    location: &str,
    config: &Config,
    repo_params: bool,
) -> LocationResult<FactoryLocation> {
    let mut factory = FactoryLocation::parse_with(location, &config.location)?;
    if repo_params {
        let path = factory.path().to_owned();
        let folded = fold_repo_params(&path, factory.search_params_mut(), &config.providers)?;
        if folded != path {
            factory.set_path(&folded)?;
        }
    }

    let params = factory.search_params_mut();
    if params.has(DEVFILE_FILENAME) {
        params.delete(DEVFILE_FILENAME_SHORT);
    } else {
        params.rename(DEVFILE_FILENAME_SHORT, DEVFILE_FILENAME);
    }
    Ok(factory)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GitRepoOptions {
    pub location: Option<String>,
    pub git_branch: Option<String>,
    /// `None` when the location asks for remotes without naming any.
    pub remotes: Option<Vec<GitRemote>>,
    pub devfile_path: Option<String>,
    #[serde(default)]
    pub has_supported_git_service: bool,
}

impl GitRepoOptions {
    pub fn from_location(location: &str) -> LocationResult<Self> {
        Self::from_location_with(location, &Config::default())
    }

    /// Reads the options from `location` and normalizes it.
    ///
    /// A `df` parameter is renamed to `override.devfileFilename`, a
    /// placeholder `remotes` parameter (`true` or `{}`) is dropped. The
    /// `path` and `version` parameters of an Azure DevOps location are
    /// encoded into its path.
    pub fn from_location_with(location: &str, config: &Config) -> LocationResult<Self> {
        let mut factory = factory_params(location, config, true)?;
        let params = factory.search_params_mut();

        let devfile_path = params
            .get(DEVFILE_FILENAME)
            .or_else(|| params.get(DEVFILE_PATH))
            .filter(|path| !path.is_empty() && *path != "true")
            .map(str::to_owned);

        let remotes = match params.get(REMOTES) {
            None => Some(vec![]),
            Some("true" | "{}") => {
                params.delete(REMOTES);
                None
            }
            Some(value) => match parse_remotes(value) {
                Ok(remotes) => Some(remotes),
                Err(e) => {
                    tracing::warn!("{e}");
                    None
                }
            },
        };

        let location = factory.to_string();
        let has_supported_git_service =
            is_supported_git_service_with(&location, &config.providers);
        let git_branch = if has_supported_git_service {
            branch_from_location_with(&location, &config.providers).unwrap_or_else(|e| {
                tracing::warn!("Unable to get branch from '{location}'. {e}");
                None
            })
        } else {
            None
        };

        Ok(Self {
            location: Some(location),
            git_branch,
            remotes,
            devfile_path,
            has_supported_git_service,
        })
    }

    pub fn apply_to_location(&self, current: &GitRepoOptions) -> LocationResult<Self> {
        self.apply_to_location_with(current, &Config::default())
    }

    /// Writes these options into the location of `current`.
    ///
    /// Without a current location the options are returned as they are.
    pub fn apply_to_location_with(
        &self,
        current: &GitRepoOptions,
        config: &Config,
    ) -> LocationResult<Self> {
        let Some(location) = current.location.as_deref() else {
            return Ok(self.clone());
        };
        let mut factory = factory_params(location, config, true)?;
        let params = factory.search_params_mut();

        if self.remotes != current.remotes {
            match self.remotes.as_deref() {
                Some(remotes) if !remotes.is_empty() => {
                    params.set(REMOTES, remotes_to_param(remotes))
                }
                _ => {
                    params.delete(REMOTES);
                }
            }
        }

        params.delete(DEVFILE_FILENAME);
        params.delete(DEVFILE_FILENAME_SHORT);
        match self.devfile_path.as_deref().filter(|path| !path.is_empty()) {
            Some(path) => params.set(DEVFILE_PATH, path),
            None => {
                params.delete(DEVFILE_PATH);
            }
        }

        let has_supported_git_service =
            is_supported_git_service_with(factory.path(), &config.providers);
        if has_supported_git_service {
            let path = set_branch_to_location_with(
                factory.path(),
                self.git_branch.as_deref(),
                &config.providers,
            )?;
            factory.set_path(&path)?;
        }

        Ok(Self {
            location: Some(factory.to_string()),
            git_branch: self.git_branch.clone(),
            remotes: self.remotes.clone(),
            devfile_path: self.devfile_path.clone(),
            has_supported_git_service,
        })
    }
}

/// Workspace options a location carries next to the repository.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedOptions {
    pub location: Option<String>,
    pub container_image: Option<String>,
    /// `storageType=ephemeral`
    pub temporary_storage: Option<bool>,
    /// `policies.create=perclick`
    pub create_new_if_existing: Option<bool>,
    /// In bytes.
    pub memory_limit: Option<u64>,
    pub cpu_limit: Option<u64>,
}

impl AdvancedOptions {
    pub fn from_location(location: &str) -> LocationResult<Self> {
        Self::from_location_with(location, &Config::default())
    }

    /// Reads the options from `location` and normalizes it.
    ///
    /// Placeholder values (empty or `true`) are dropped from the location,
    /// limits that do not parse are dropped as well.
    pub fn from_location_with(location: &str, config: &Config) -> LocationResult<Self> {
        let mut factory = factory_params(location, config, false)?;
        let params = factory.search_params_mut();

        let container_image = match params.get(IMAGE).map(str::to_owned) {
            Some(image) if is_placeholder(&image) => {
                params.delete(IMAGE);
                None
            }
            image => image,
        };
        let temporary_storage = match params.get(STORAGE_TYPE) {
            Some(value) if is_placeholder(value) => {
                params.delete(STORAGE_TYPE);
                None
            }
            value => value.map(|value| value == EPHEMERAL),
        };
        let create_new_if_existing = match params.get(POLICIES_CREATE) {
            Some(value) if is_placeholder(value) => {
                params.delete(POLICIES_CREATE);
                None
            }
            value => value.map(|value| value == PER_CLICK),
        };

        let memory_limit = match params.get(MEMORY_LIMIT) {
            None => None,
            Some(value) if is_placeholder(value) => {
                params.delete(MEMORY_LIMIT);
                None
            }
            Some(value) => {
                let bytes = parse_bytes(value);
                if bytes.is_none() {
                    tracing::warn!("Ignoring invalid memory limit: {value}");
                    params.delete(MEMORY_LIMIT);
                }
                bytes
            }
        };
        let cpu_limit = match params.get(CPU_LIMIT) {
            None | Some("") => None,
            Some("true") => {
                params.delete(CPU_LIMIT);
                None
            }
            Some(value) => {
                let cpus = parse_cpus(value);
                if cpus.is_none() {
                    tracing::warn!("Ignoring invalid cpu limit: {value}");
                    params.delete(CPU_LIMIT);
                }
                cpus
            }
        };

        Ok(Self {
            location: Some(factory.to_string()),
            container_image,
            temporary_storage,
            create_new_if_existing,
            memory_limit,
            cpu_limit,
        })
    }

    pub fn apply_to_location(&self, current: &AdvancedOptions) -> LocationResult<Self> {
        self.apply_to_location_with(current, &Config::default())
    }

    /// Writes the options that differ from `current` into its location.
    ///
    /// Without a current location the options are returned as they are.
    pub fn apply_to_location_with(
        &self,
        current: &AdvancedOptions,
        config: &Config,
    ) -> LocationResult<Self> {
        let Some(location) = current.location.as_deref() else {
            return Ok(self.clone());
        };
        let mut factory = factory_params(location, config, false)?;
        let params = factory.search_params_mut();

        if self.container_image != current.container_image {
            match self.container_image.as_deref().filter(|image| !image.is_empty()) {
                Some(image) => params.set(IMAGE, image),
                None => {
                    params.delete(IMAGE);
                }
            }
        }

        if self.temporary_storage != current.temporary_storage {
            if self.temporary_storage == Some(true) {
                params.set(STORAGE_TYPE, EPHEMERAL);
            } else if params.get(STORAGE_TYPE) == Some(EPHEMERAL) {
                params.delete(STORAGE_TYPE);
            }
        }

        if self.create_new_if_existing != current.create_new_if_existing {
            params.delete(NEW);
            if self.create_new_if_existing == Some(true) {
                params.set(POLICIES_CREATE, PER_CLICK);
            } else {
                params.delete(POLICIES_CREATE);
            }
        }

        if self.memory_limit != current.memory_limit {
            match self.memory_limit.and_then(|bytes| format_bytes(bytes, 3, true)) {
                Some(limit) => params.set(MEMORY_LIMIT, limit),
                None => {
                    params.delete(MEMORY_LIMIT);
                }
            }
        }

        if self.cpu_limit != current.cpu_limit {
            match self.cpu_limit.filter(|cpus| *cpus > 0) {
                Some(cpus) => params.set(CPU_LIMIT, cpus.to_string()),
                None => {
                    params.delete(CPU_LIMIT);
                }
            }
        }

        Ok(Self {
            location: Some(factory.to_string()),
            ..self.clone()
        })
    }
}

/// The leading whole number of `value`, `1.5` is one cpu.
fn parse_cpus(value: &str) -> Option<u64> {
    let value = value.trim();
    let end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    value[..end].parse().ok()
}
