use std::{
    ffi::OsString,
    future::Future,
    path::{Path, PathBuf},
};
use tracing_subscriber::prelude::*;

/// Directives of noisy dependencies, applied unless overridden by `RUST_LOG`.
const DEFAULT_DIRECTIVES: &[&str] = &["hyper=off", "hyper_util=off", "reqwest=off", "h2=off"];

/// Initializes a tracing subscriber writing to stderr, filtered by `RUST_LOG`.
pub fn subscriber() {
    tracing_subscriber::Registry::default()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init()
}

fn env_filter() -> tracing_subscriber::EnvFilter {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    for &directive in DEFAULT_DIRECTIVES {
        filter = filter.add_directive(directive.parse().unwrap());
    }
    filter
}

/// Enables colored output when stdout is a terminal that supports it.
pub fn enable_paint() {
    let enable = yansi::Condition::os_support() && yansi::Condition::tty_and_color_live();
    yansi::whenever(yansi::Condition::cached(enable));
}

/// Runs the given future to completion on a new multi-threaded tokio runtime.
#[track_caller]
pub fn block_on<F: Future>(future: F) -> F::Output {
    let rt = tokio::runtime::Runtime::new().expect("could not start tokio rt");
    rt.block_on(future)
}

/// Loads the `.env` file of `root`, if any.
///
/// Variables already present in the environment take precedence.
pub fn load_dotenv(root: &Path) {
    let env = root.join(".env");
    match dotenvy::from_path(&env) {
        Ok(()) => trace!(path = %env.display(), "loaded .env"),
        Err(err) if err.not_found() => {}
        Err(err) => warn!(path = %env.display(), %err, "failed to load .env"),
    }
}

/// Returns the value of `--root` in the raw command line arguments.
///
/// Used to find the `.env` file before the arguments are parsed, so that its variables are seen
/// by the flags that read the environment.
pub fn root_arg<I, T>(args: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::into);
    while let Some(arg) = args.next() {
        if arg == "--" {
            break;
        }
        if arg == "--root" {
            return args.next().map(PathBuf::from);
        }
        if let Some(root) = arg.to_str().and_then(|arg| arg.strip_prefix("--root=")) {
            return Some(PathBuf::from(root));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_root_arg() {
        assert_eq!(root_arg(["svdeploy"]), None);
        assert_eq!(
            root_arg(["svdeploy", "--root", "/tmp/project", "SimpleVoting"]),
            Some(PathBuf::from("/tmp/project"))
        );
        assert_eq!(root_arg(["svdeploy", "--root=project"]), Some(PathBuf::from("project")));
        assert_eq!(root_arg(["svdeploy", "--", "--root", "project"]), None);
        assert_eq!(root_arg(["svdeploy", "--root"]), None);
    }

    #[test]
    fn default_directives_parse() {
        for directive in DEFAULT_DIRECTIVES {
            assert!(directive.parse::<tracing_subscriber::filter::Directive>().is_ok());
        }
    }

    #[test]
    fn block_on_runs_future() {
        assert_eq!(block_on(async { 7 }), 7);
    }
}
