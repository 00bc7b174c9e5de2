//! `mathrelax doctor`: Diagnose configuration and connectivity.

use mathrelax_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Math Relax Doctor");
    println!("====================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("  ✅ Config file found: {}", config_path.display());
    } else {
        println!("  ⚠️  No config file, using defaults (run `mathrelax onboard`)");
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  1 issue found. Fix the config and run doctor again.");
            return Ok(());
        }
    };

    println!("  Model: {}", config.model);

    match mathrelax_providers::build_from_config(&config) {
        Ok(provider) => {
            println!("  ✅ API key configured");
            match provider.health_check().await {
                Ok(true) => println!("  ✅ Model service reachable"),
                Ok(false) => {
                    println!("  ❌ Model service rejected the key or is unavailable");
                    issues += 1;
                }
                Err(e) => {
                    println!("  ❌ Model service check failed: {e}");
                    issues += 1;
                }
            }

            match mathrelax_providers::resolve_model(provider.as_ref(), &config.model).await {
                Ok(model) if config.auto_model() => println!("  ✅ Auto model resolves to {model}"),
                Ok(_) => {}
                Err(e) => {
                    println!("  ❌ Model selection failed: {e}");
                    issues += 1;
                }
            }
        }
        Err(e) => {
            println!("  ❌ {e}");
            issues += 1;
        }
    }

    match config.active_sheets() {
        Some(sheets) if sheets.access_token.is_some() => {
            println!("  ✅ Spreadsheet logging to {}", sheets.spreadsheet_id)
        }
        Some(_) => {
            println!("  ⚠️  Spreadsheet logging enabled but no access token (set MATHRELAX_SHEETS_TOKEN)");
            issues += 1;
        }
        None => println!("  Spreadsheet logging off"),
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
