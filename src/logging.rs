//! Tracing subscriber setup for the `procpipe` binary
//!
//! `RUST_LOG` wins when set. Otherwise `--verbose` (or `verbose = true` in
//! the config file) turns on debug events from the runner; the default only
//! shows warnings. Events go to stderr so they never mix with the child's
//! forwarded stdout.

use std::io::IsTerminal;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter directives used when `RUST_LOG` is unset.
#[must_use]
pub const fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "procpipe=debug,warn"
    } else {
        "procpipe=warn"
    }
}

/// Initialize tracing with an env filter and a compact stderr formatter.
///
/// Calling this twice is an error; the first subscriber stays installed.
pub fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(verbose)))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(verbose)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_line_number(false)
                .with_file(false)
                .compact(),
        )
        .try_init()?;

    Ok(())
}
