use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing_subscriber::EnvFilter;

use crate::error::{EdhashError, EdhashResult};

/// Default read buffer for streaming readers and files: 64KB
pub const DEFAULT_READ_BUFFER_SIZE: usize = 64 * 1024;

/// Top-level configuration (loaded from edhash.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EdhashConfig {
    pub stream: StreamConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Bytes requested per read when hashing a reader or file (default: 64KB)
    pub read_buffer_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive used when RUST_LOG is unset (default: info)
    pub level: String,
    /// Output format: "text" or "json"
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Text,
        }
    }
}

impl EdhashConfig {
    /// Parse a TOML document and validate it.
    pub fn from_toml_str(toml_str: &str) -> EdhashResult<Self> {
        let config: EdhashConfig =
            toml::from_str(toml_str).map_err(|e| EdhashError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from `path`, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> EdhashResult<Self> {
        if !path.exists() {
            tracing::warn!(
                "config file not found: {}  (using defaults)",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: EdhashConfig = toml::from_str(&content)
            .map_err(|e| EdhashError::Config(format!("parsing config {}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> EdhashResult<()> {
        self.stream.validate()?;
        self.log.validate()
    }
}

impl LogConfig {
    /// Reject filter directives `EnvFilter` would otherwise drop silently.
    pub fn validate(&self) -> EdhashResult<()> {
        EnvFilter::try_new(&self.level)
            .map(|_| ())
            .map_err(|e| EdhashError::Config(format!("log.level '{}': {e}", self.level)))
    }
}

impl StreamConfig {
    pub fn validate(&self) -> EdhashResult<()> {
        if self.read_buffer_size == 0 {
            return Err(EdhashError::Config(
                "stream.read_buffer_size must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
