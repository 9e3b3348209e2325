use crate::auth::AuthenticatedUser;
use crate::state::AppState;
use actix_web::{get, web, HttpResponse};
use serde_json::json;

/// Current presence set, same shape as the `getOnlineUsers` frame.
#[get("/api/presence")]
pub async fn online_users(state: web::Data<AppState>, _user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "onlineUsers": state.registry.snapshot() }))
}
