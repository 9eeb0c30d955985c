use crate::{WalletSigner, utils};
use alloy_primitives::Address;
use clap::Parser;
use eyre::Result;
use std::path::PathBuf;

/// The wallet options can either be:
/// 1. Raw (via private key / mnemonic)
/// 2. Keystore (via file path)
/// 3. Unlocked (via `--from` only, signed by the node)
#[derive(Clone, Debug, Default, Parser)]
#[command(next_help_heading = "Wallet options", about = None, long_about = None)]
pub struct WalletOpts {
    /// The sender account.
    #[arg(long, short, value_name = "ADDRESS", env = "ETH_FROM")]
    pub from: Option<Address>,

    /// Use the provided private key.
    #[arg(long, value_name = "RAW_PRIVATE_KEY", env = "ETH_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    /// Use the mnemonic phrase or the mnemonic file at the specified path.
    #[arg(long, alias = "mnemonic-path")]
    pub mnemonic: Option<String>,

    /// Use the private key from the given mnemonic index.
    ///
    /// Used with --mnemonic.
    #[arg(long, default_value = "0", value_name = "INDEX", requires = "mnemonic")]
    pub mnemonic_index: u32,

    /// Use the keystore at the specified path.
    #[arg(long = "keystore", value_name = "PATH", env = "ETH_KEYSTORE")]
    pub keystore_path: Option<PathBuf>,

    /// The keystore password.
    ///
    /// Used with --keystore.
    #[arg(
        long = "password",
        value_name = "PASSWORD",
        env = "ETH_PASSWORD",
        hide_env_values = true
    )]
    pub keystore_password: Option<String>,
}

impl WalletOpts {
    /// Returns the signer for the configured signing method, if any.
    ///
    /// At most one of `--private-key`, `--mnemonic` and `--keystore` may be given.
    pub fn signer(&self) -> Result<Option<WalletSigner>> {
        let methods = [
            self.private_key.is_some(),
            self.mnemonic.is_some(),
            self.keystore_path.is_some(),
        ];
        if methods.into_iter().filter(|given| *given).count() > 1 {
            eyre::bail!("Only one of --private-key, --mnemonic and --keystore may be provided")
        }

        let signer = if let Some(private_key) = &self.private_key {
            trace!("using private key signer");
            utils::create_private_key_signer(private_key)?
        } else if let Some(mnemonic) = &self.mnemonic {
            trace!("using mnemonic signer");
            utils::create_mnemonic_signer(mnemonic, self.mnemonic_index)?
        } else if let Some(path) = &self.keystore_path {
            trace!("using keystore signer");
            utils::create_keystore_signer(path, self.keystore_password.as_deref())?
        } else {
            return Ok(None);
        };

        if let Some(from) = self.from
            && from != signer.address()
        {
            eyre::bail!(
                "The specified sender via --from ({from}) does not match the signer's address ({})",
                signer.address()
            )
        }
        Ok(Some(signer))
    }

    /// Returns the signer, failing if no signing method was given.
    pub fn require_signer(&self) -> Result<WalletSigner> {
        self.signer()?.ok_or_else(|| {
            eyre::eyre!(
                "No signer configured, pass one of --private-key, --mnemonic or --keystore, or --unlocked with --from"
            )
        })
    }
}
