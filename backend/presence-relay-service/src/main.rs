use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use presence_relay_service::{
    auth, config, db, error, logging, middleware, routes,
    state::AppState,
    storage::{InMemoryMessageStore, MessageStore, PostgresMessageStore},
};
use std::sync::Arc;

/// An empty origin list means any origin.
fn build_cors(origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600);

    if origins.is_empty() {
        return cors.allow_any_origin();
    }
    origins
        .iter()
        .fold(cors.supports_credentials(), |cors, origin| {
            cors.allowed_origin(origin)
        })
}

#[actix_web::main]
async fn main() -> Result<(), error::AppError> {
    let cfg = Arc::new(config::Config::from_env()?);
    logging::init_tracing(cfg.log_format);

    let store: Arc<dyn MessageStore> = match &cfg.database_url {
        Some(url) => {
            let pool = db::init_pool(url, cfg.database_max_connections).await?;
            let store = PostgresMessageStore::new(pool);
            store.ensure_schema().await?;
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, messages are kept in memory only");
            Arc::new(InMemoryMessageStore::new())
        }
    };

    let authenticator = auth::from_config(&cfg)?;
    let state = AppState::new(cfg.clone(), store, authenticator);

    let bind_addr = cfg.bind_addr();
    tracing::info!(
        %bind_addr,
        auth_mode = ?cfg.auth_mode,
        persistent = cfg.database_url.is_some(),
        "starting presence-relay-service"
    );

    let origins = cfg.cors_allowed_origins.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(build_cors(&origins))
            .wrap(middleware::RequestId::new())
            .app_data(web::Data::new(state.clone()))
            .configure(routes::configure)
    })
    .bind(&bind_addr)
    .map_err(|e| error::AppError::StartServer(format!("bind {bind_addr}: {e}")))?
    .run()
    .await
    .map_err(|e| error::AppError::StartServer(format!("run server: {e}")))
}
