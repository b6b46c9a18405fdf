mod api;
mod blockchain;
mod config;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{App, HttpServer, middleware, rt, web};
use dotenvy::dotenv;
use log::info;

use api::AppState;
use blockchain::Blockchain;
use config::AppConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env();

    info!(
        "⛓️ Starting CryptoChain server at http://{}:{}",
        config.host, config.port
    );
    info!(
        "Starting with difficulty = {}, mining cap = {}",
        config.difficulty,
        config
            .max_mining_attempts
            .map_or_else(|| "none".to_string(), |n| n.to_string())
    );

    // Raised on Ctrl-C so a block still being mined gives up instead of
    // holding shutdown hostage.
    let shutdown = Arc::new(AtomicBool::new(false));
    let limits = config.mining_limits().with_cancel_flag(shutdown.clone());

    let blockchain = Blockchain::new(config.difficulty).with_limits(limits);
    info!("Genesis block created: {}", blockchain.last_block().hash);
    let state = web::Data::new(AppState::new(blockchain));

    let cors_origins = config.cors_origins.clone();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(api::cors_layer(&cors_origins))
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .disable_signals()
    .bind((config.host.as_str(), config.port))?
    .run();

    let handle = server.handle();
    rt::spawn(async move {
        if rt::signal::ctrl_c().await.is_ok() {
            info!("Shutdown requested, cancelling in-flight mining");
            shutdown.store(true, Ordering::Relaxed);
            handle.stop(true).await;
        }
    });

    server.await
}
