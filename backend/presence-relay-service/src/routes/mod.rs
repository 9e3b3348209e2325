use crate::error::AppError;
use actix_web::{web, HttpResponse};

pub mod health;
pub mod messages;
pub mod presence;
pub mod wsroute;

async fn not_found() -> Result<HttpResponse, AppError> {
    Err(AppError::NotFound)
}

/// Malformed JSON bodies get the same error body as every other 4xx.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

/// Register every route. Shared by `main` and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(wsroute::ws_handler)
        .service(messages::send_message)
        .service(messages::get_messages)
        .service(presence::online_users)
        .service(health::health)
        .service(health::metrics_handler)
        .default_service(web::to(not_found));
}
