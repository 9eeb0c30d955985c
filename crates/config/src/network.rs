use alloy_chains::Chain;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of the built-in local node network.
pub const LOCALHOST: &str = "localhost";

/// Name of the built-in Hardhat node network.
pub const HARDHAT: &str = "hardhat";

const LOCAL_RPC_URL: &str = "http://127.0.0.1:8545";

/// A network entry of the `[networks]` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// The JSON-RPC endpoint.
    pub url: String,
    /// The chain the endpoint is expected to serve. Checked against the node when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<Chain>,
    /// Send legacy (pre EIP-1559) transactions.
    #[serde(default)]
    pub legacy: bool,
}

impl NetworkConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), chain_id: None, legacy: false }
    }
}

/// A network selected by name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedNetwork {
    pub name: String,
    pub url: String,
    pub chain: Option<Chain>,
    pub legacy: bool,
}

impl ResolvedNetwork {
    pub fn new(name: impl Into<String>, config: NetworkConfig) -> Self {
        let NetworkConfig { url, chain_id, legacy } = config;
        Self { name: name.into(), url, chain: chain_id, legacy }
    }

    /// Whether transactions on this network must be legacy transactions.
    pub fn is_legacy(&self) -> bool {
        self.legacy || self.chain.is_some_and(|chain| chain.is_legacy())
    }
}

pub(crate) fn builtin_networks() -> BTreeMap<String, NetworkConfig> {
    BTreeMap::from([
        (LOCALHOST.to_string(), NetworkConfig::new(LOCAL_RPC_URL)),
        (
            HARDHAT.to_string(),
            NetworkConfig { chain_id: Some(Chain::from_id(31337)), ..NetworkConfig::new(LOCAL_RPC_URL) },
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hardhat_network_pins_chain() {
        let networks = builtin_networks();
        let hardhat = ResolvedNetwork::new(HARDHAT, networks[HARDHAT].clone());
        assert_eq!(hardhat.chain.map(|c| c.id()), Some(31337));
        assert!(!hardhat.is_legacy());
    }

    #[test]
    fn legacy_flag_forces_legacy() {
        let network = ResolvedNetwork::new(
            "old",
            NetworkConfig { legacy: true, ..NetworkConfig::new("http://localhost:8545") },
        );
        assert!(network.is_legacy());
    }
}
