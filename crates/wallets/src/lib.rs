//! # svdeploy-wallets
//!
//! Signing credentials for deployment transactions.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

pub mod utils;

mod wallet;
pub use wallet::WalletOpts;

/// The signer used to sign deployment transactions.
pub type WalletSigner = alloy_signer_local::PrivateKeySigner;
