//! # svdeploy-cli
//!
//! Common command-line options, error reporting and runtime setup for the svdeploy binary.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

pub mod handler;
pub mod opts;
pub mod utils;
