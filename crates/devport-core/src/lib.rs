pub mod config;
pub mod error;

pub use config::{CommandsConfig, Config, DispatchRule, ProfileConfig, RuntimeConfig};
pub use error::ConfigError;
