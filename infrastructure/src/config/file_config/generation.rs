//! Generation parameters from TOML (`[generation]` section)

use serde::{Deserialize, Serialize};
use streamchat_domain::GenerationParams;

/// Raw generation configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGenerationConfig {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for FileGenerationConfig {
    fn default() -> Self {
        let params = GenerationParams::default();
        Self {
            model: params.model,
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        }
    }
}

impl FileGenerationConfig {
    /// Convert to domain parameters. Call [`GenerationParams::validate`] on
    /// the result before use.
    pub fn to_params(&self) -> GenerationParams {
        GenerationParams::default()
            .with_model(self.model.clone())
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature)
    }
}
