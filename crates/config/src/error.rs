//! Config errors.

use std::{error::Error, fmt};

/// Wrapper around [`figment::Error`] that displays every accumulated error.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractConfigError {
    pub(crate) error: figment::Error,
}

impl ExtractConfigError {
    pub fn new(error: figment::Error) -> Self {
        Self { error }
    }
}

impl fmt::Display for ExtractConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut failures = String::new();
        for err in self.error.clone() {
            failures.push('\n');
            failures.push_str(&err.to_string());
        }
        write!(f, "failed to extract svdeploy config:{failures}")
    }
}

impl Error for ExtractConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Error::source(&self.error)
    }
}

impl From<ExtractConfigError> for figment::Error {
    fn from(err: ExtractConfigError) -> Self {
        err.error
    }
}

/// A network name with no matching entry in the config.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown network {name:?}, known networks: {}", known.join(", "))]
pub struct UnknownNetworkError {
    pub name: String,
    pub known: Vec<String>,
}

impl From<UnknownNetworkError> for figment::Error {
    fn from(err: UnknownNetworkError) -> Self {
        err.to_string().into()
    }
}
