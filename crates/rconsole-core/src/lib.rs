//! rconsole-core — wire types, health states and configuration shared by
//! the remote console crates.

pub mod config;
pub mod types;

pub use config::{ConfigError, ConsoleConfig};
pub use types::*;
