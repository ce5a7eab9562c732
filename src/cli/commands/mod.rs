//! CLI command implementations.

mod ask;
mod banner;
mod config;
mod serve;

pub use ask::run_ask;
pub use banner::print_banner;
pub use config::run_config;
pub use serve::{router, run_serve, AppState};

use std::backtrace::Backtrace;

/// Release resources held by the agent before exit.
pub async fn cleanup() {
    crate::cli::Output::info("Cleaning up YouTube Analysis Agent resources...");
}

/// Error text plus a stack backtrace for a failed startup.
pub fn failure_report(error: &anyhow::Error) -> String {
    format!("{:?}\n\nStack backtrace:\n{}", error, Backtrace::force_capture())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_report_includes_backtrace() {
        let error = anyhow::anyhow!("Address already in use").context("Failed to bind 0.0.0.0:3773");
        let report = failure_report(&error);
        assert!(report.starts_with("Failed to bind 0.0.0.0:3773"));
        assert!(report.contains("Address already in use"));
        assert!(report.contains("Stack backtrace:"));
    }
}
