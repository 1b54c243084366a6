//! `querydeck serve` — start the HTTP gateway.

use anyhow::anyhow;
use querydeck_config::AppConfig;

pub async fn run(port: Option<u16>) -> anyhow::Result<()> {
    let mut config = AppConfig::load()?;
    if let Some(port) = port {
        config.gateway.port = port;
    }
    config.validate()?;

    querydeck_gateway::start(config)
        .await
        .map_err(|e| anyhow!("{e}"))
}
