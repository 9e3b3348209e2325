use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::models::NewMessage;
use crate::presence::Identity;
use crate::state::AppState;
use actix_web::{get, post, web, HttpResponse};

/// Persist a message from the caller to `receiver` and push it if they are
/// online. Responds 201 with the stored record either way.
#[post("/api/messages/send/{receiver}")]
pub async fn send_message(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Json<NewMessage>,
) -> Result<HttpResponse, AppError> {
    let receiver = Identity::new(path.into_inner());
    let (message, outcome) = state
        .messages
        .send_message(user.identity(), &receiver, body.into_inner())
        .await?;

    tracing::info!(
        message_id = %message.id,
        sender = %message.sender_id,
        receiver = %message.receiver_id,
        delivery = outcome.as_str(),
        "message sent"
    );
    Ok(HttpResponse::Created().json(message))
}

#[get("/api/messages/{peer}")]
pub async fn get_messages(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let peer = Identity::new(path.into_inner());
    let history = state.messages.conversation(user.identity(), &peer).await?;
    Ok(HttpResponse::Ok().json(history))
}
