//! Serial runner for the focus behavioural suites.

use rspec::report::Report;
use rspec::{block::Suite, ConfigurationBuilder, Logger, Runner};
use std::sync::Arc;

/// Runs `suite` on one thread and reports every failing example instead of
/// stopping at the first.
///
/// The scenarios share one Bevy app, so they must not run in parallel.
pub fn run_serial<T>(suite: &Suite<T>)
where
    T: Clone + Send + Sync + std::fmt::Debug,
{
    let config = ConfigurationBuilder::default()
        .parallel(false)
        .exit_on_failure(false)
        .build()
        .unwrap_or_else(|e| panic!("rspec configuration failed: {e}"));
    let report = Runner::new(config, vec![Arc::new(Logger::new(std::io::stdout()))]).run(suite);
    assert!(report.is_success(), "focus behaviour suite failed");
}
