//! Model selection: resolves the configured model name once, at startup.
//!
//! A concrete model name is used as-is. The pseudo name `auto` probes the
//! provider's model list and picks a fast Gemini model: the first stable
//! "flash" model, else the first Gemini model of any kind.

use mathrelax_core::Provider;
use mathrelax_core::error::ProviderError;
use tracing::info;

/// Pick the preferred model out of a provider's model list.
pub fn pick_model(available: &[String]) -> Option<&str> {
    let is_gemini = |m: &&String| m.contains("gemini");

    available
        .iter()
        .filter(is_gemini)
        .find(|m| m.contains("flash") && !m.contains("exp"))
        .or_else(|| available.iter().find(is_gemini))
        .map(String::as_str)
}

/// Resolve the model to use for the lifetime of the process.
pub async fn resolve_model(
    provider: &dyn Provider,
    configured: &str,
) -> Result<String, ProviderError> {
    if !configured.eq_ignore_ascii_case(mathrelax_config::AUTO_MODEL) {
        return Ok(configured.to_string());
    }

    let available = provider.list_models().await?;
    let chosen = pick_model(&available).ok_or_else(|| {
        ProviderError::ModelNotFound(format!(
            "no Gemini model among {} listed by {}",
            available.len(),
            provider.name()
        ))
    })?;

    info!(model = %chosen, "Selected model automatically");
    Ok(chosen.to_string())
}
