//! `mathrelax serve`: Start the HTTP gateway and chat page.

use mathrelax_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("📐 Math Relax Gateway");
    println!("   Open: http://{}:{}/", config.gateway.host, config.gateway.port);
    println!("   Model: {}", config.model);
    println!(
        "   Spreadsheet log: {}",
        if config.active_sheets().is_some() { "on" } else { "off" }
    );

    mathrelax_gateway::start(config).await?;

    Ok(())
}
