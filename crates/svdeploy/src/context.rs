use alloy_primitives::Address;
use std::{path::PathBuf, time::Duration};
use svdeploy_cli::opts::TransactionOpts;
use svdeploy_config::{Config, ResolvedNetwork};
use svdeploy_wallets::WalletSigner;

/// The account deploying the contract.
#[derive(Clone, Debug)]
pub enum Sender {
    /// Transactions are signed locally.
    Signer(WalletSigner),
    /// Transactions are signed by the node, via `eth_sendTransaction`.
    Unlocked(Address),
}

impl Sender {
    pub fn address(&self) -> Address {
        match self {
            Self::Signer(signer) => signer.address(),
            Self::Unlocked(address) => *address,
        }
    }
}

/// Everything a deployment needs to know, resolved up front.
#[derive(Clone, Debug)]
pub struct DeployContext {
    pub network: ResolvedNetwork,
    pub sender: Sender,
    /// The directory compiled artifacts are read from.
    pub artifacts: PathBuf,
    pub tx: TransactionOpts,
    /// The number of confirmations to wait for after the transaction is mined.
    pub confirmations: u64,
    /// How long to wait for the receipt.
    pub timeout: Duration,
}

impl DeployContext {
    /// Creates a context for `network` with the settings of `config`.
    pub fn new(config: &Config, network: ResolvedNetwork, sender: Sender) -> Self {
        Self {
            network,
            sender,
            artifacts: config.artifacts_dir(),
            tx: TransactionOpts::default(),
            confirmations: config.confirmations,
            timeout: Duration::from_secs(config.transaction_timeout),
        }
    }

    /// Whether pre EIP-1559 transactions are sent.
    pub fn is_legacy(&self, chain_id: u64) -> bool {
        self.tx.legacy || self.network.is_legacy() || alloy_chains::Chain::from(chain_id).is_legacy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use svdeploy_config::NetworkConfig;

    #[test]
    fn uses_config_settings() {
        let config = Config { confirmations: 3, transaction_timeout: 10, ..Default::default() };
        let network = config.resolve_network(None).unwrap();
        let sender = Sender::Unlocked(address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8"));
        let context = DeployContext::new(&config, network, sender);

        assert_eq!(context.network.name, "localhost");
        assert_eq!(context.confirmations, 3);
        assert_eq!(context.timeout, Duration::from_secs(10));
        assert_eq!(context.artifacts, config.artifacts_dir());
        assert_eq!(context.sender.address(), address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8"));
    }

    #[test]
    fn legacy_rules() {
        let config = Config::default();
        let sender = Sender::Unlocked(Address::ZERO);
        let mut context =
            DeployContext::new(&config, config.resolve_network(None).unwrap(), sender.clone());
        assert!(!context.is_legacy(1));

        context.tx.legacy = true;
        assert!(context.is_legacy(1));

        let network = ResolvedNetwork::new(
            "old",
            NetworkConfig { legacy: true, ..NetworkConfig::new("http://localhost:8545") },
        );
        let context = DeployContext::new(&config, network, sender);
        assert!(context.is_legacy(1));
    }
}
