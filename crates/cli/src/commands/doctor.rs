//! `querydeck doctor` — Diagnose configuration health.

use querydeck_config::AppConfig;

pub async fn run() -> anyhow::Result<()> {
    println!("🩺 QueryDeck Doctor — Configuration Diagnostics");
    println!("==============================================\n");

    let mut issues = 0;

    // Check config
    let config_path = AppConfig::config_dir().join("config.toml");
    let config = if config_path.exists() {
        match AppConfig::load() {
            Ok(config) => {
                println!("  ✅ Config file valid");
                Some(config)
            }
            Err(e) => {
                println!("  ❌ Config file invalid: {e}");
                issues += 1;
                None
            }
        }
    } else {
        println!("  ⚠️  No config file at {} — using defaults", config_path.display());
        AppConfig::load().ok()
    };

    if let Some(config) = config {
        // Check generation API key
        if config.has_gemini_key() {
            println!("  ✅ Gemini API key configured");
        } else {
            println!("  ⚠️  No Gemini API key — set GEMINI_API_KEY or gemini.api_key");
            issues += 1;
        }

        // Check store backend coherence
        match config.store.backend.as_str() {
            "memory" => {
                println!("  ⚠️  In-memory chunk store — chunks are lost on restart");
            }
            "postgres" if config.store.database_url.is_some() => {
                println!("  ✅ PostgreSQL chunk store configured");
            }
            "postgres" => {
                println!("  ❌ postgres backend without a database URL");
                issues += 1;
            }
            other => {
                println!("  ❌ Unknown store backend: {other}");
                issues += 1;
            }
        }

        println!("  ℹ️  Qdrant: {} (collection \"{}\")", config.qdrant.url, config.qdrant.collection);
        println!("  ℹ️  Sidecar: {}", config.sidecar.base_url);
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
