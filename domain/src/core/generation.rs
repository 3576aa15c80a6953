//! Generation parameters sent alongside the conversation history.

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// Default model identifier requested from the server.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default upper bound on generated tokens.
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Static generation parameters (Value Object).
///
/// Fixed for the lifetime of a session: they are chosen at startup from
/// configuration and never edited by the chat core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl GenerationParams {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Check the parameters are something a server could accept.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.model.trim().is_empty() {
            return Err(DomainError::InvalidGenerationParams(
                "model cannot be empty".to_string(),
            ));
        }
        if self.max_tokens == 0 {
            return Err(DomainError::InvalidGenerationParams(
                "max_tokens must be greater than 0".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(DomainError::InvalidGenerationParams(format!(
                "temperature must be within 0.0..=2.0, got {}",
                self.temperature
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_client() {
        let params = GenerationParams::default();
        assert_eq!(params.model, "gpt-3.5-turbo");
        assert_eq!(params.max_tokens, 1000);
        assert_eq!(params.temperature, 0.7);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn builder_overrides_fields() {
        let params = GenerationParams::default()
            .with_model("gpt-4o-mini")
            .with_max_tokens(256)
            .with_temperature(0.0);
        assert_eq!(params.model, "gpt-4o-mini");
        assert_eq!(params.max_tokens, 256);
        assert_eq!(params.temperature, 0.0);
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert!(GenerationParams::default().with_model("  ").validate().is_err());
        assert!(GenerationParams::default().with_max_tokens(0).validate().is_err());
        assert!(GenerationParams::default().with_temperature(2.5).validate().is_err());
        assert!(GenerationParams::default().with_temperature(-0.1).validate().is_err());
    }
}
