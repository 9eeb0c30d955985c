use crate::WalletSigner;
use alloy_primitives::{B256, hex::FromHex};
use alloy_signer_local::{MnemonicBuilder, coins_bip39::English};
use eyre::{Context, Result};
use std::path::Path;

/// Validates and sanitizes user inputs, returning the signer for the given private key.
pub fn create_private_key_signer(private_key_str: &str) -> Result<WalletSigner> {
    let private_key_str = private_key_str.trim();
    let Ok(private_key) = B256::from_hex(private_key_str) else {
        ensure_pk_not_env(private_key_str)?;
        eyre::bail!("Failed to decode private key")
    };
    WalletSigner::from_bytes(&private_key)
        .map_err(|err| eyre::eyre!("Failed to create wallet from private key: {err}"))
}

/// Creates the signer at `index` of the mnemonic. `mnemonic` is either the phrase itself or the
/// path of a file holding it.
pub fn create_mnemonic_signer(mnemonic: &str, index: u32) -> Result<WalletSigner> {
    let mnemonic = if Path::new(mnemonic).is_file() {
        std::fs::read_to_string(mnemonic).wrap_err("Failed to read mnemonic file")?
    } else {
        mnemonic.to_owned()
    };
    trace!(index, "deriving mnemonic signer");
    MnemonicBuilder::<English>::default()
        .phrase(mnemonic.trim())
        .index(index)?
        .build()
        .wrap_err("Failed to create wallet from mnemonic")
}

/// Decrypts the JSON keystore at `path`.
pub fn create_keystore_signer(path: &Path, password: Option<&str>) -> Result<WalletSigner> {
    if !path.is_file() {
        eyre::bail!("Keystore file `{}` does not exist", path.display())
    }
    let Some(password) = password else {
        eyre::bail!("A password is required to decrypt keystore `{}`, pass --password or set ETH_PASSWORD", path.display())
    };
    WalletSigner::decrypt_keystore(path, password)
        .wrap_err_with(|| format!("Failed to decrypt keystore `{}`", path.display()))
}

/// Catches the common mistake of passing the name of an unset environment variable.
fn ensure_pk_not_env(pk: &str) -> Result<()> {
    if !pk.starts_with("0x") && std::env::var(pk).is_ok() {
        eyre::bail!(
            "Failed to decode private key. Private key is an environment variable name, did you mean `${pk}`?"
        );
    }
    if pk.starts_with('$') {
        eyre::bail!("Failed to decode private key. Is the environment variable `{pk}` set?");
    }
    Ok(())
}
