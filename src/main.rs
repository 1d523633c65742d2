use std::sync::Arc;

use tracing::{error, info, warn};
use videoflix::api::ReqwestTransport;
use videoflix::common::logger;
use videoflix::configs::Config;
use videoflix::routes::{LogNavigator, Route};
use videoflix::Videoflix;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            Config::default()
        }
    };
    logger::init(&config);

    let transport = Arc::new(ReqwestTransport::new(&config.http)?);
    let app = Videoflix::new(config, transport, Arc::new(LogNavigator));

    if !app.startup().await {
        info!("Not signed in; the login page would be shown");
        return Ok(());
    }

    if !app.enter(&Route::Catalog).await.is_allowed() {
        warn!("Session rejected by the backend");
        return Ok(());
    }

    if let Err(e) = app.catalog().load_home().await {
        error!("Failed to load catalog: {}", e);
    }
    if let Some(featured) = app.catalog().featured() {
        info!("Featured: {} ({})", featured.title, featured.id);
    }
    for section in app.catalog().sections() {
        info!("{}: {} videos", section.title, section.items.len());
    }

    Ok(())
}
