//! Raw TOML configuration data types
//!
//! These structs mirror the config file layout one section per type and are
//! deserialized directly by figment.

mod generation;
mod logging;
mod output;
mod repl;
mod server;

pub use generation::FileGenerationConfig;
pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;
pub use repl::FileReplConfig;
pub use server::FileServerConfig;

use serde::{Deserialize, Serialize};
use streamchat_domain::DomainError;
use thiserror::Error;

/// Reasons a merged configuration is unusable.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigValidationError {
    #[error("server.base_url must not be empty")]
    EmptyBaseUrl,

    #[error("generation: {0}")]
    Generation(#[from] DomainError),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Chat server location
    pub server: FileServerConfig,
    /// Parameters sent with every request
    pub generation: FileGenerationConfig,
    /// Terminal output settings
    pub output: FileOutputConfig,
    /// REPL settings
    pub repl: FileReplConfig,
    /// Conversation transcript settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Check the values a session cannot run without.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.server.base_url.trim().is_empty() {
            return Err(ConfigValidationError::EmptyBaseUrl);
        }
        self.generation.to_params().validate()?;
        Ok(())
    }

    /// Render the effective configuration as TOML (for `--show-config`).
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
