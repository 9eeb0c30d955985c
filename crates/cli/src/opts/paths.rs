use clap::{Parser, ValueHint};
use eyre::Result;
use std::path::PathBuf;
use svdeploy_config::Config;

/// Where the project lives and where its compiled artifacts are.
#[derive(Clone, Debug, Default, Parser)]
#[command(next_help_heading = "Project options")]
pub struct ProjectPathsArgs {
    /// The project's root path.
    ///
    /// By default the current working directory. The `svdeploy.toml` and `.env` files are
    /// read from here.
    #[arg(long, value_hint = ValueHint::DirPath, value_name = "PATH")]
    pub root: Option<PathBuf>,

    /// The directory holding compiled contract artifacts, relative to the root.
    #[arg(long, value_hint = ValueHint::DirPath, value_name = "PATH")]
    pub artifacts: Option<PathBuf>,
}

impl ProjectPathsArgs {
    /// Returns the project root.
    pub fn project_root(&self) -> PathBuf {
        self.root
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Loads the config of the project root, applying the artifacts override.
    ///
    /// The `.env` file is not read here: it has to be loaded before the arguments are parsed.
    pub fn load_config(&self) -> Result<Config> {
        let root = self.project_root();
        let mut config = Config::load_with_root(&root)?;
        if let Some(artifacts) = &self.artifacts {
            config.artifacts = artifacts.clone();
        }
        Ok(config)
    }
}
