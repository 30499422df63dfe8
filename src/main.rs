// src/main.rs

use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod archive;
mod config;
mod db;
mod errors;
mod extractor;
mod flash;
mod form;
mod generator;
mod handlers;
mod htmx_handlers;
mod models;
mod pages;
mod response;
mod routes;
mod services;
mod session;
mod state;
mod submission;
mod themes;
mod uploads;

use crate::config::AppConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "microsite_builder=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting microsite builder...");

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    for dir in [&config.upload_dir, &config.sites_dir, &config.static_dir] {
        if let Err(e) = tokio::fs::create_dir_all(dir).await {
            tracing::error!("Cannot create directory {}: {}", dir.display(), e);
            std::process::exit(1);
        }
    }

    let pool = match db::connect(&config.database_url).await {
        Ok(pool) => pool,
        Err(err) => {
            tracing::error!("Cannot connect to the database: {:?}", err);
            std::process::exit(1);
        }
    };

    let addr = config.bind_addr;
    let app = routes::router(AppState::new(pool, config));

    tracing::info!("Listening on {}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Cannot bind {}: {}", addr, e);
            return;
        }
    };

    if let Err(e) = axum::serve(listener, app.into_make_service()).await {
        tracing::error!("Server error: {}", e);
    }
}
