//! The contract factory abstraction.
//!
//! A [`ContractFactoryProvider`] hands out one [`ContractFactory`] per contract name. Deploying a
//! factory submits a single creation transaction and yields a [`DeployedInstance`], which is
//! awaited until the chain confirms it.

use alloy_primitives::{Address, TxHash};
use alloy_transport::TransportError;
use async_trait::async_trait;
use eyre::Result;
use serde::Serialize;
use std::time::Duration;

/// Resolves contract names to deployment factories.
#[async_trait]
pub trait ContractFactoryProvider: Send + Sync {
    type Factory: ContractFactory;

    /// Returns the factory for the contract `name`.
    async fn get_contract_factory(&self, name: &str) -> Result<Self::Factory>;
}

/// Creates new on-chain instances of a single contract.
#[async_trait]
pub trait ContractFactory: Send {
    type Instance: DeployedInstance;

    /// Submits the creation transaction, with no constructor arguments.
    async fn deploy(self) -> Result<Self::Instance>;
}

/// A contract instance whose creation transaction has been submitted.
#[async_trait]
pub trait DeployedInstance: Send {
    /// The address the instance is deployed to.
    ///
    /// Known before the transaction is mined.
    fn address(&self) -> Address;

    /// Waits until the creation transaction is confirmed.
    async fn deployed(self) -> Result<Deployment>;
}

/// A confirmed deployment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    #[serde(skip)]
    pub contract: String,
    pub deployer: Address,
    #[serde(rename = "deployedTo")]
    pub address: Address,
    pub transaction_hash: TxHash,
}

#[derive(Debug, thiserror::Error)]
pub enum ContractDeploymentError {
    #[error(
        "contract {contract} takes {expected} constructor argument(s), only constructors without arguments are supported"
    )]
    ConstructorArgs { contract: String, expected: usize },
    #[error("transaction reverted: {tx_hash}")]
    Reverted { tx_hash: TxHash },
    #[error("contract was not deployed")]
    ContractNotDeployed,
    #[error("contract was deployed to {actual}, expected {expected}")]
    AddressMismatch { expected: Address, actual: Address },
    #[error(transparent)]
    Rpc(#[from] TransportError),
    #[error("transaction {tx_hash} was not confirmed within {timeout:?}")]
    Timeout { tx_hash: TxHash, timeout: Duration },
}

impl ContractDeploymentError {
    /// Checks a mined creation receipt, returning the address of the new contract.
    pub fn check_receipt(
        tx_hash: TxHash,
        status: bool,
        contract_address: Option<Address>,
        expected: Address,
    ) -> Result<Address, Self> {
        if !status {
            return Err(Self::Reverted { tx_hash });
        }
        let actual = contract_address.ok_or(Self::ContractNotDeployed)?;
        if actual != expected {
            return Err(Self::AddressMismatch { expected, actual });
        }
        Ok(actual)
    }
}
