//! # svdeploy-config
//!
//! Deployment configuration: the `svdeploy.toml` settings file, `SVDEPLOY_` environment overrides
//! and named networks.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

use figment::{
    Figment, Provider,
    providers::{Env, Format, Serialized, Toml},
    value::{Dict, Map},
};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

mod error;
pub use error::{ExtractConfigError, UnknownNetworkError};

mod network;
pub use network::{HARDHAT, LOCALHOST, NetworkConfig, ResolvedNetwork};

pub use alloy_chains::{Chain, NamedChain};

/// The file name of the settings file looked up in the project root.
pub const CONFIG_FILE: &str = "svdeploy.toml";

/// Prefix of the environment variables overriding settings file keys.
pub const ENV_PREFIX: &str = "SVDEPLOY_";

/// The contract deployed when none is named.
pub const DEFAULT_CONTRACT: &str = "SimpleVoting";

/// Deployment settings.
///
/// Values are merged from, in increasing priority: [`Config::default`], the [`CONFIG_FILE`] in
/// the project root and `SVDEPLOY_` prefixed environment variables. Nested keys are separated by
/// `__` in environment variable names, e.g. `SVDEPLOY_NETWORKS__SEPOLIA__URL`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The project root the settings were loaded from.
    #[serde(skip)]
    pub root: PathBuf,
    /// Name of the contract to deploy.
    pub contract: String,
    /// Directory holding compiled contract artifacts, relative to the root.
    pub artifacts: PathBuf,
    /// Name of the network to deploy to.
    pub network: String,
    /// Number of confirmations to wait for before a deployment counts as done.
    pub confirmations: u64,
    /// Timeout in seconds for the deployment transaction to be confirmed.
    pub transaction_timeout: u64,
    /// Known networks by name.
    pub networks: BTreeMap<String, NetworkConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            contract: DEFAULT_CONTRACT.to_string(),
            artifacts: PathBuf::from("artifacts"),
            network: LOCALHOST.to_string(),
            confirmations: 1,
            transaction_timeout: 120,
            networks: network::builtin_networks(),
        }
    }
}

impl Config {
    /// Loads the config from the current directory.
    pub fn load() -> Result<Self, ExtractConfigError> {
        let root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::load_with_root(root)
    }

    /// Loads the config with `root` as the project root.
    pub fn load_with_root(root: impl AsRef<Path>) -> Result<Self, ExtractConfigError> {
        let root = root.as_ref();
        let mut config = Self::from_provider(Self::figment_with_root(root))?;
        config.root = dunce::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
        Ok(config)
    }

    /// Returns the figment merging defaults, the settings file in `root` and the environment.
    pub fn figment_with_root(root: impl AsRef<Path>) -> Figment {
        Figment::from(Self::default())
            .merge(Toml::file(root.as_ref().join(CONFIG_FILE)))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Extracts a config from any figment provider.
    pub fn from_provider<T: Provider>(provider: T) -> Result<Self, ExtractConfigError> {
        trace!("load config with provider: {:?}", provider.metadata());
        Figment::from(provider).extract().map_err(ExtractConfigError::new)
    }

    /// Returns the artifacts directory, resolved against the project root.
    pub fn artifacts_dir(&self) -> PathBuf {
        if self.artifacts.is_absolute() {
            self.artifacts.clone()
        } else {
            self.root.join(&self.artifacts)
        }
    }

    /// Resolves the network named `name`, or the configured default network.
    pub fn resolve_network(&self, name: Option<&str>) -> Result<ResolvedNetwork, UnknownNetworkError> {
        let name = name.unwrap_or(&self.network);
        let Some(network) = self.networks.get(name) else {
            return Err(UnknownNetworkError {
                name: name.to_string(),
                known: self.networks.keys().cloned().collect(),
            });
        };
        Ok(ResolvedNetwork::new(name, network.clone()))
    }
}

impl Provider for Config {
    fn metadata(&self) -> figment::Metadata {
        figment::Metadata::named("svdeploy defaults")
    }

    fn data(&self) -> Result<Map<figment::Profile, Dict>, figment::Error> {
        Serialized::defaults(self).data()
    }
}
