//! edhash-core: shared pieces for the edhash crates
//!
//! - `error`: the workspace error enum and result alias
//! - `config`: `edhash.toml` schema (stream read buffer, logging)
//! - `logging`: tracing subscriber setup for hosts that want events

pub mod config;
pub mod error;
pub mod logging;

pub use config::{EdhashConfig, LogConfig, LogFormat, StreamConfig};
pub use error::{EdhashError, EdhashResult};
