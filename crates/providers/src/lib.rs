//! Language-model provider implementations for Math Relax.
//!
//! All providers implement the `mathrelax_core::Provider` trait.

pub mod gemini;
pub mod select;

use std::sync::Arc;

use mathrelax_config::{AppConfig, ConfigError};
use mathrelax_core::Provider;

pub use gemini::GeminiProvider;
pub use select::{pick_model, resolve_model};

/// Build the model provider from configuration.
///
/// Fails only on configuration problems (no API key, unusable HTTP client);
/// these are fatal at startup.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Provider>, ConfigError> {
    let api_key = config.require_api_key()?;
    let provider = GeminiProvider::new(&config.api_url, api_key)
        .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
    Ok(Arc::new(provider))
}
