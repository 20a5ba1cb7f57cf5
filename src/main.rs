use std::io;
use std::sync::Arc;

use actix_web::{middleware, web, App, HttpServer};
use taskdesk::{
    config::Config,
    routes,
    store::{MemoryStore, PgStore},
    AppState,
};

async fn build_state(config: &Config) -> io::Result<AppState> {
    match &config.database_url {
        Some(url) => {
            let store = PgStore::connect(url)
                .await
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            store
                .migrate()
                .await
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            log::info!("Using Postgres store");
            Ok(AppState::from_config(config, Arc::new(store)))
        }
        None => {
            log::warn!("DATABASE_URL is not set; data is kept in memory and lost on exit");
            Ok(AppState::from_config(config, Arc::new(MemoryStore::new())))
        }
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Loads `.env` before the logger reads RUST_LOG.
    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let state = web::Data::new(build_state(&config).await?);

    log::info!("Starting taskdesk server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(routes::cors())
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
