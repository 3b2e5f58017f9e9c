use std::sync::Arc;

use log::*;

use navigation_map::{
    config::Config,
    http,
    services::{geocoding::NominatimService, http_client},
    GenericError,
};

#[tokio::main]
async fn main() -> Result<(), GenericError> {
    env_logger::builder()
        .filter_module("navigation_map", log::LevelFilter::Info)
        .parse_default_env()
        .init();
    trace!("Logger init.");

    let config = Config::from_env()?;
    debug!("Loaded config: {:?}", config);

    let geocoder = NominatimService::new(http_client(&config)?, config.geocoder_url.clone());
    let router = http::router(Arc::new(geocoder));

    http::serve(config.port, router).await?;
    Ok(())
}
