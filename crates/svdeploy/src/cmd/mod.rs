//! Command line entry points.

mod deploy;
pub use deploy::DeployArgs;
