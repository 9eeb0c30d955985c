//! The `svdeploy` CLI: deploy a compiled contract and print the address it was deployed to.
use clap::Parser;
use eyre::Result;
use svdeploy::cmd::DeployArgs;
use svdeploy_cli::{handler, utils};
use svdeploy_common::sh_err;

fn main() {
    if let Err(err) = run() {
        let _ = sh_err!("{err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    handler::install();

    // `.env` variables feed env-backed flags, so they have to be set before parsing.
    let root = match utils::root_arg(std::env::args_os()) {
        Some(root) => root,
        None => std::env::current_dir()?,
    };
    utils::load_dotenv(&root);

    utils::subscriber();
    utils::enable_paint();

    let args = DeployArgs::parse();
    utils::block_on(args.run())?;
    Ok(())
}
