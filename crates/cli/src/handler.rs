use eyre::EyreHandler;
use std::{error::Error, fmt};

/// A custom context type for svdeploy specific error reporting via `eyre`.
#[derive(Debug, Default)]
pub struct Handler;

impl Handler {
    /// Create a new instance of the `Handler`.
    pub fn new() -> Self {
        Self
    }
}

impl EyreHandler for Handler {
    fn display(&self, error: &(dyn Error + 'static), f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Display;
        dedup_chain(error).into_iter().enumerate().try_for_each(|(i, e)| {
            if i > 0 {
                write!(f, "; ")?;
            }
            Display::fmt(e, f)
        })
    }

    fn debug(&self, error: &(dyn Error + 'static), f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            return fmt::Debug::fmt(error, f);
        }
        let errors = dedup_chain(error);
        let Some((error, sources)) = errors.split_first() else { return Ok(()) };
        write!(f, "{error}")?;

        if !sources.is_empty() {
            write!(f, "\n\nContext:")?;

            let multiple = sources.len() > 1;
            for (n, error) in sources.iter().enumerate() {
                writeln!(f)?;
                if multiple {
                    write!(f, "- Error #{n}: {error}")?;
                } else {
                    write!(f, "- {error}")?;
                }
            }
        }

        Ok(())
    }
}

/// Returns the error and its sources, skipping sources whose message is already contained in the
/// message before them. Transport errors in particular tend to repeat their cause.
fn dedup_chain<'a>(error: &'a (dyn Error + 'static)) -> Vec<&'a (dyn Error + 'static)> {
    let mut chain: Vec<&(dyn Error + 'static)> = vec![error];
    let mut last = error.to_string();
    let mut source = error.source();
    while let Some(err) = source {
        let message = err.to_string();
        if !last.contains(&message) {
            chain.push(err);
        }
        last = message;
        source = err.source();
    }
    chain
}

/// Installs the svdeploy eyre hook as the global error report hook.
///
/// # Details
///
/// By default a simple user-centric handler is installed, unless `SVDEPLOY_DEBUG` is set in the
/// environment, in which case a more verbose debug-centric handler is installed.
///
/// Panics are always caught by the more debug-centric handler.
pub fn install() {
    if std::env::var_os("RUST_BACKTRACE").is_none() {
        // SAFETY: called at startup before any other thread is spawned.
        unsafe { std::env::set_var("RUST_BACKTRACE", "1") };
    }

    let debug_enabled = std::env::var_os("SVDEPLOY_DEBUG").is_some();
    if debug_enabled {
        if let Err(e) = color_eyre::install() {
            debug!("failed to install color eyre error hook: {e}");
        }
    } else {
        let (panic_hook, _) = color_eyre::config::HookBuilder::default()
            .panic_section(
                "This is a bug. Consider reporting it together with the command that triggered it.",
            )
            .into_hooks();
        panic_hook.install();
        if let Err(e) = eyre::set_hook(Box::new(move |_| Box::new(Handler::new()))) {
            debug!("failed to install eyre error hook: {e}");
        }
    }
}
