//! Tracing subscriber setup.
//!
//! The hashing crates only emit `tracing` events; installing a subscriber is
//! left to the host. Hosts without their own subscriber (the C ABI, benches)
//! call [`init_logging`].

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogConfig, LogFormat};

/// Install a global subscriber. `RUST_LOG` takes precedence over `config.level`.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_logging(config: &LogConfig) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
            .is_ok(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .try_init()
            .is_ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_harmless() {
        let config = LogConfig::default();
        let _ = init_logging(&config);
        assert!(!init_logging(&config));
    }
}
