//! Terminal output.
//!
//! All user facing output goes through the `sh_*` macros so that `--json` and `--quiet` apply
//! uniformly. Diagnostics that are not part of the command's result go through `tracing`.

use std::{
    fmt,
    io::{self, Write},
    sync::atomic::{AtomicBool, AtomicU8, Ordering},
};
use yansi::Paint;

/// The format of the command's result output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputFormat {
    /// Human readable lines.
    #[default]
    Text,
    /// A single JSON document.
    Json,
}

static FORMAT: AtomicU8 = AtomicU8::new(OutputFormat::Text as u8);
static QUIET: AtomicBool = AtomicBool::new(false);

/// Sets the output format for the rest of the process.
pub fn set_format(format: OutputFormat) {
    FORMAT.store(format as u8, Ordering::Relaxed);
}

/// Returns the current output format.
pub fn format() -> OutputFormat {
    match FORMAT.load(Ordering::Relaxed) {
        1 => OutputFormat::Json,
        _ => OutputFormat::Text,
    }
}

/// Returns `true` if results are printed as JSON.
pub fn is_json() -> bool {
    format() == OutputFormat::Json
}

/// Silences informational stdout output. Errors and warnings are still printed.
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

/// Returns `true` if informational output is silenced.
pub fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

#[doc(hidden)]
pub fn __println(args: fmt::Arguments<'_>) -> io::Result<()> {
    if is_quiet() {
        return Ok(());
    }
    let mut stdout = io::stdout().lock();
    stdout.write_fmt(args)?;
    stdout.write_all(b"\n")?;
    stdout.flush()
}

#[doc(hidden)]
pub fn __eprintln(args: fmt::Arguments<'_>) -> io::Result<()> {
    let mut stderr = io::stderr().lock();
    stderr.write_fmt(args)?;
    stderr.write_all(b"\n")?;
    stderr.flush()
}

#[doc(hidden)]
pub fn __err(args: fmt::Arguments<'_>) -> io::Result<()> {
    __eprintln(format_args!("{}: {args}", "Error".red().bold()))
}

#[doc(hidden)]
pub fn __warn(args: fmt::Arguments<'_>) -> io::Result<()> {
    __eprintln(format_args!("{}: {args}", "Warning".yellow().bold()))
}

/// Prints a line to stdout, unless the shell is quiet.
#[macro_export]
macro_rules! sh_println {
    () => {
        $crate::shell::__println(::core::format_args!(""))
    };
    ($($args:tt)*) => {
        $crate::shell::__println(::core::format_args!($($args)*))
    };
}

/// Prints a line to stderr.
#[macro_export]
macro_rules! sh_eprintln {
    ($($args:tt)*) => {
        $crate::shell::__eprintln(::core::format_args!($($args)*))
    };
}

/// Prints an error to stderr, prefixed with `Error: `.
#[macro_export]
macro_rules! sh_err {
    ($($args:tt)*) => {
        $crate::shell::__err(::core::format_args!($($args)*))
    };
}

/// Prints a warning to stderr, prefixed with `Warning: `.
#[macro_export]
macro_rules! sh_warn {
    ($($args:tt)*) => {
        $crate::shell::__warn(::core::format_args!($($args)*))
    };
}
