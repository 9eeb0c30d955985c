//! Contract factories backed by a JSON-RPC node.

use crate::{
    context::{DeployContext, Sender},
    factory::{
        ContractDeploymentError, ContractFactory, ContractFactoryProvider, DeployedInstance,
        Deployment,
    },
};
use alloy_network::{Ethereum, EthereumWallet, ReceiptResponse, TransactionBuilder};
use alloy_primitives::{Address, TxHash};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_rpc_types::{TransactionReceipt, TransactionRequest};
use async_trait::async_trait;
use eyre::{Result, WrapErr};
use std::{fmt, time::Duration};
use svdeploy_common::{ContractArtifact, ContractId};

/// Reads artifacts from disk and deploys them through an RPC endpoint.
#[derive(Clone)]
pub struct RpcFactoryProvider {
    provider: DynProvider<Ethereum>,
    context: DeployContext,
}

impl RpcFactoryProvider {
    /// Creates a provider for the network of `context`.
    ///
    /// No request is sent before a factory is requested.
    pub async fn connect(context: DeployContext) -> Result<Self> {
        let url = context.network.url.as_str();
        let provider = match &context.sender {
            Sender::Signer(signer) => ProviderBuilder::new()
                .wallet(EthereumWallet::from(signer.clone()))
                .connect(url)
                .await?
                .erased(),
            Sender::Unlocked(_) => ProviderBuilder::new().connect(url).await?.erased(),
        };
        debug!(network = %context.network.name, %url, "created provider");
        Ok(Self::new(provider, context))
    }

    /// Creates a factory provider sending its requests through `provider`.
    pub fn new(provider: DynProvider<Ethereum>, context: DeployContext) -> Self {
        Self { provider, context }
    }

    pub fn context(&self) -> &DeployContext {
        &self.context
    }
}

impl fmt::Debug for RpcFactoryProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcFactoryProvider").field("context", &self.context).finish_non_exhaustive()
    }
}

#[async_trait]
impl ContractFactoryProvider for RpcFactoryProvider {
    type Factory = RpcContractFactory;

    async fn get_contract_factory(&self, name: &str) -> Result<RpcContractFactory> {
        let id: ContractId = name.parse().map_err(|err: String| eyre::eyre!(err))?;
        let artifact = ContractArtifact::load(&self.context.artifacts, &id)?;

        let network = &self.context.network;
        let chain_id = self.provider.get_chain_id().await.wrap_err_with(|| {
            format!("failed to connect to network {} at {}", network.name, network.url)
        })?;
        if let Some(expected) = network.chain
            && expected.id() != chain_id
        {
            eyre::bail!(
                "network {} is expected to serve chain {}, but the node reports chain {chain_id}",
                network.name,
                expected.id()
            )
        }
        info!(network = %network.name, chain_id, contract = %artifact.id, "resolved contract factory");

        Ok(RpcContractFactory {
            provider: self.provider.clone(),
            context: self.context.clone(),
            artifact,
            chain_id,
        })
    }
}

/// Deploys a single artifact.
pub struct RpcContractFactory {
    provider: DynProvider<Ethereum>,
    context: DeployContext,
    artifact: ContractArtifact,
    chain_id: u64,
}

impl fmt::Debug for RpcContractFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcContractFactory")
            .field("contract", &self.artifact.id)
            .field("chain_id", &self.chain_id)
            .finish_non_exhaustive()
    }
}

impl RpcContractFactory {
    /// Builds the creation transaction, filling in everything the context leaves open.
    async fn transaction(&self) -> Result<TransactionRequest> {
        let deployer = self.context.sender.address();
        let mut tx = TransactionRequest::default()
            .with_from(deployer)
            .with_deploy_code(self.artifact.bytecode.clone())
            .with_chain_id(self.chain_id);

        let nonce = match self.context.tx.nonce {
            Some(nonce) => nonce,
            None => self.provider.get_transaction_count(deployer).await?,
        };
        tx.set_nonce(nonce);

        if self.context.is_legacy(self.chain_id) {
            if self.context.tx.priority_gas_price.is_some() {
                eyre::bail!("there is no priority fee for legacy txs");
            }
            let gas_price = match self.context.tx.gas_price {
                Some(gas_price) => gas_price,
                None => self.provider.get_gas_price().await?,
            };
            tx.set_gas_price(gas_price);
        } else {
            let (max_fee, priority_fee) =
                match (self.context.tx.gas_price, self.context.tx.priority_gas_price) {
                    (Some(max_fee), Some(priority_fee)) => (max_fee, priority_fee),
                    (max_fee, priority_fee) => {
                        let estimate = self.provider.estimate_eip1559_fees().await.wrap_err(
                            "Failed to estimate EIP1559 fees. This chain might not support EIP1559, try adding --legacy to your command.",
                        )?;
                        (
                            max_fee.unwrap_or(estimate.max_fee_per_gas),
                            priority_fee.unwrap_or(estimate.max_priority_fee_per_gas),
                        )
                    }
                };
            tx.set_max_fee_per_gas(max_fee);
            tx.set_max_priority_fee_per_gas(priority_fee);
        }

        let gas_limit = match self.context.tx.gas_limit {
            Some(gas_limit) => gas_limit,
            None => self
                .provider
                .estimate_gas(tx.clone())
                .await
                .wrap_err("failed to estimate gas for the deployment")?,
        };
        tx.set_gas_limit(gas_limit);

        Ok(tx)
    }
}

#[async_trait]
impl ContractFactory for RpcContractFactory {
    type Instance = PendingDeployment;

    async fn deploy(self) -> Result<PendingDeployment> {
        if let Some(constructor) = &self.artifact.abi.constructor
            && !constructor.inputs.is_empty()
        {
            return Err(ContractDeploymentError::ConstructorArgs {
                contract: self.artifact.id.name.clone(),
                expected: constructor.inputs.len(),
            }
            .into());
        }

        let tx = self.transaction().await?;
        let deployer = self.context.sender.address();
        let nonce = tx.nonce.unwrap_or_default();
        let address = deployer.create(nonce);
        trace!(?tx, "sending deployment transaction");

        let tx_hash = *self
            .provider
            .send_transaction(tx)
            .await
            .map_err(ContractDeploymentError::from)
            .wrap_err("failed to send deployment transaction")?
            .tx_hash();
        debug!(%tx_hash, %address, nonce, "deployment transaction sent");

        Ok(PendingDeployment {
            provider: self.provider,
            contract: self.artifact.id.name,
            deployer,
            address,
            tx_hash,
            confirmations: self.context.confirmations.max(1),
            timeout: self.context.timeout,
        })
    }
}

/// A creation transaction awaiting its receipt.
pub struct PendingDeployment {
    provider: DynProvider<Ethereum>,
    contract: String,
    deployer: Address,
    address: Address,
    tx_hash: TxHash,
    confirmations: u64,
    timeout: Duration,
}

impl fmt::Debug for PendingDeployment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingDeployment")
            .field("contract", &self.contract)
            .field("address", &self.address)
            .field("tx_hash", &self.tx_hash)
            .finish_non_exhaustive()
    }
}

impl PendingDeployment {
    pub fn tx_hash(&self) -> TxHash {
        self.tx_hash
    }

    /// Polls until the transaction is mined and has the required number of confirmations.
    async fn receipt(&self) -> Result<TransactionReceipt, ContractDeploymentError> {
        let interval = self.provider.client().poll_interval();
        let (receipt, mined) = loop {
            if let Some(receipt) = self.provider.get_transaction_receipt(self.tx_hash).await?
                && let Some(block) = receipt.block_number
            {
                break (receipt, block);
            }
            trace!(tx_hash = %self.tx_hash, "deployment not mined yet");
            tokio::time::sleep(interval).await;
        };

        if self.confirmations > 1 {
            let target = mined + self.confirmations - 1;
            while self.provider.get_block_number().await? < target {
                trace!(tx_hash = %self.tx_hash, target, "waiting for confirmations");
                tokio::time::sleep(interval).await;
            }
        }
        Ok(receipt)
    }
}

#[async_trait]
impl DeployedInstance for PendingDeployment {
    fn address(&self) -> Address {
        self.address
    }

    async fn deployed(self) -> Result<Deployment> {
        let receipt = tokio::time::timeout(self.timeout, self.receipt()).await.map_err(|_| {
            ContractDeploymentError::Timeout { tx_hash: self.tx_hash, timeout: self.timeout }
        })??;
        trace!(?receipt, "deployment receipt");

        let address = ContractDeploymentError::check_receipt(
            self.tx_hash,
            ReceiptResponse::status(&receipt),
            receipt.contract_address,
            self.address,
        )?;
        Ok(Deployment {
            contract: self.contract,
            deployer: self.deployer,
            address,
            transaction_hash: self.tx_hash,
        })
    }
}
