//! `mathrelax onboard`: First-time setup.

use mathrelax_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    println!("📐 Math Relax: First-Time Setup");
    println!("================================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
        return Ok(());
    }

    std::fs::write(&config_path, AppConfig::default_toml())?;
    println!("✅ Created config.toml at: {}", config_path.display());
    println!("\n📝 Next steps:");
    println!("   1. Get a Gemini API key at https://aistudio.google.com/apikey");
    println!("   2. export GOOGLE_API_KEY=... (or save it to ./apikey.txt)");
    println!("   3. Optional: fill in [sheets] to log every chat to a spreadsheet");
    println!("      (access tokens expire after about an hour; refresh MATHRELAX_SHEETS_TOKEN");
    println!("       and restart, or rows stop being written)");
    println!("   4. Run: mathrelax chat   (or `mathrelax serve` for the web page)\n");

    Ok(())
}
