mod chain;
mod cors;
pub mod error;
mod health;
pub mod models;
mod tamper;
mod tx;
mod validate;

use actix_web::web::{self, ServiceConfig};

pub use cors::cors_layer;
pub use error::ApiError;
pub use models::AppState;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    )
    .service(health::health_check)
    .service(chain::set_difficulty)
    .service(tx::add_transaction)
    .service(chain::view_chain)
    .service(tamper::tamper_block)
    .service(chain::verify_chain);
}
