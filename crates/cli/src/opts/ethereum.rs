use alloy_chains::Chain;
use clap::Parser;
use svdeploy_wallets::WalletOpts;

/// Overrides of the configured network's RPC endpoint.
#[derive(Clone, Debug, Default, Parser)]
#[command(next_help_heading = "RPC options")]
pub struct RpcOpts {
    /// The network to deploy to, as named in the `[networks]` table of `svdeploy.toml`.
    #[arg(long, short = 'n', value_name = "NAME", env = "SVDEPLOY_NETWORK")]
    pub network: Option<String>,

    /// The RPC endpoint, overriding the network's URL.
    #[arg(short = 'r', long = "rpc-url", value_name = "URL", env = "ETH_RPC_URL")]
    pub url: Option<String>,
}

#[derive(Clone, Debug, Default, Parser)]
pub struct EthereumOpts {
    #[command(flatten)]
    pub rpc: RpcOpts,

    /// The chain the endpoint is expected to serve, by name or id.
    #[arg(long, visible_alias = "chain-id", env = "CHAIN", value_name = "CHAIN")]
    pub chain: Option<Chain>,

    #[command(flatten)]
    pub wallet: WalletOpts,
}
