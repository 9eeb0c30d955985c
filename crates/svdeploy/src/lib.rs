//! # svdeploy
//!
//! Deploys a compiled contract through a contract factory and reports the address it was
//! deployed to.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

#[macro_use]
extern crate svdeploy_common;

pub mod cmd;
pub mod context;
pub mod deployer;
pub mod factory;
pub mod rpc;

pub use context::{DeployContext, Sender};
pub use factory::{
    ContractDeploymentError, ContractFactory, ContractFactoryProvider, DeployedInstance,
    Deployment,
};
