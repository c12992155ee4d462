//! Agora Server — application entry point.

use std::error::Error;

use agora_db::DbManager;
use agora_server::config::AppConfig;
use agora_server::services::Services;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("agora=info".parse()?))
        .json()
        .init();

    info!("Starting Agora server...");

    let config = AppConfig::from_env()?;

    let db = DbManager::open(&config.db).await?;
    let services = Services::new(db.client(), config.groups.clone(), &config.mail)?;
    services.startup().await?;

    info!(
        base_url = %config.groups.base_url,
        default_locale = %config.groups.default_locale,
        "Group services ready"
    );

    tokio::signal::ctrl_c().await?;

    info!("Agora server stopped.");
    Ok(())
}
