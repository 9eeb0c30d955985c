use crate::{
    context::{DeployContext, Sender},
    deployer,
    factory::Deployment,
    rpc::RpcFactoryProvider,
};
use clap::Parser;
use eyre::{OptionExt, Result};
use std::time::Duration;
use svdeploy_cli::opts::{EthereumOpts, ProjectPathsArgs, TransactionOpts};
use svdeploy_common::{
    ContractId,
    shell::{self, OutputFormat},
};
use svdeploy_config::Config;

/// Deploy a compiled contract and print its address.
#[derive(Clone, Debug, Parser)]
#[command(name = "svdeploy", version, long_about = None)]
pub struct DeployArgs {
    /// The contract identifier in the form `<path>:<contractname>` or `<contractname>`.
    ///
    /// Defaults to the `contract` setting, `SimpleVoting` unless configured otherwise.
    #[arg(value_name = "CONTRACT")]
    pub contract: Option<ContractId>,

    /// The number of confirmations to wait for after the transaction is mined.
    #[arg(long, value_name = "CONFIRMATIONS")]
    pub confirmations: Option<u64>,

    /// Timeout for the deployment receipt, in seconds.
    #[arg(long, env = "ETH_TIMEOUT", value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Send via `eth_sendTransaction` using the `--from` argument or `$ETH_FROM` as sender
    #[arg(long, requires = "from", conflicts_with_all = ["private_key", "mnemonic", "keystore_path"])]
    pub unlocked: bool,

    /// Print the deployment information as JSON.
    #[arg(long, help_heading = "Display options")]
    pub json: bool,

    /// Do not print anything to stdout.
    #[arg(long, short, help_heading = "Display options")]
    pub quiet: bool,

    #[command(flatten)]
    pub paths: ProjectPathsArgs,

    #[command(flatten)]
    pub tx: TransactionOpts,

    #[command(flatten)]
    pub eth: EthereumOpts,
}

impl DeployArgs {
    /// Executes the command to deploy the contract.
    pub async fn run(self) -> Result<Deployment> {
        if self.json {
            shell::set_format(OutputFormat::Json);
        }
        shell::set_quiet(self.quiet);

        let config = self.paths.load_config()?;
        let contract = match &self.contract {
            Some(contract) => contract.to_string(),
            None => config.contract.clone(),
        };
        let context = self.context(&config)?;

        let provider = RpcFactoryProvider::connect(context).await?;
        deployer::deploy(&provider, &contract).await
    }

    /// Resolves the deployment settings, with flags taking precedence over the config.
    pub fn context(&self, config: &Config) -> Result<DeployContext> {
        let mut network = config.resolve_network(self.eth.rpc.network.as_deref())?;
        if let Some(url) = &self.eth.rpc.url {
            network.url.clone_from(url);
        }
        if let Some(chain) = self.eth.chain {
            network.chain = Some(chain);
        }

        let sender = if self.unlocked {
            Sender::Unlocked(self.eth.wallet.from.ok_or_eyre("--unlocked requires --from")?)
        } else {
            Sender::Signer(self.eth.wallet.require_signer()?)
        };

        let mut context = DeployContext::new(config, network, sender);
        context.tx = self.tx.clone();
        if let Some(confirmations) = self.confirmations {
            context.confirmations = confirmations;
        }
        if let Some(timeout) = self.timeout {
            context.timeout = Duration::from_secs(timeout);
        }
        Ok(context)
    }
}
