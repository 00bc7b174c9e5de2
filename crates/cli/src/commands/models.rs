//! `mathrelax models`: List the models the configured key can use.

use mathrelax_config::AppConfig;
use mathrelax_providers::select::pick_model;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let provider = mathrelax_providers::build_from_config(&config)?;

    let models = provider.list_models().await?;
    if models.is_empty() {
        println!("  No models available for this key.");
        return Ok(());
    }

    let auto_pick = pick_model(&models);

    println!("🤖 Available models ({})", models.len());
    println!("=======================");
    for model in &models {
        let marks = match (model == &config.model, Some(model.as_str()) == auto_pick) {
            (true, true) => "  [configured, auto]",
            (true, false) => "  [configured]",
            (false, true) => "  [auto]",
            (false, false) => "",
        };
        println!("  {model}{marks}");
    }
    println!();
    println!("  Set `model = \"auto\"` to pick the [auto] model at startup.");

    Ok(())
}
