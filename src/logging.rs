//! Process-wide logger set-up for the binary and tests.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Default level filter for the given verbosity.
///
/// `RUST_LOG` still overrides this when set.
#[must_use]
pub const fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Initializes the global logger.
///
/// When `verbose` is `true`, focus transitions and other debug messages are
/// printed. Otherwise only info level and above are shown.
pub fn init(verbose: bool) {
    let env = Env::default().default_filter_or(default_level(verbose).to_string());
    let mut builder = Builder::from_env(env);

    // `try_init` only fails if a logger was already set. Ignore that case so
    // tests can call `init` multiple times without panicking.
    let _ = builder.try_init();
}
