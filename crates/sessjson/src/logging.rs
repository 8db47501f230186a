//! Log output for binaries and tests built on sessjson.
//!
//! The library crates only emit `tracing` events. Nothing is printed
//! until somebody installs a subscriber; [`init`] is the stock one.

use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber filtered by `RUST_LOG`, or by
/// `default_directive` (e.g. `"sessjson=debug"`) when `RUST_LOG` is
/// unset or invalid.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init(default_directive: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_second_call_reports_already_installed() {
        init("warn");
        assert!(!init("debug"));
    }
}
