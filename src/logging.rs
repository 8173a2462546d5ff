//! Tracing subscriber setup.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a global tracing subscriber for procflow's logs.
///
/// Log level is controlled by:
/// 1. `debug = true` sets level to DEBUG, which includes one line per
///    lifecycle event from the default listener
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing(debug: bool) -> bool {
    let filter = if debug {
        EnvFilter::new("procflow=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("procflow=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_harmless() {
        init_tracing(true);
        assert!(!init_tracing(false));
    }
}
