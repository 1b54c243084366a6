//! `querydeck config` — Print the effective configuration.

use querydeck_config::AppConfig;

pub async fn run() -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    // Debug formatting redacts the API key.
    println!("{config:#?}");
    println!();
    println!("# Sample config.toml ({})", AppConfig::config_dir().join("config.toml").display());
    println!("{}", AppConfig::default_toml());

    Ok(())
}
