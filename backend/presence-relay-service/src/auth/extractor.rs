use super::Handshake;
use crate::error::AppError;
use crate::presence::Identity;
use crate::state::AppState;
use actix_web::{web, Error, FromRequest, HttpRequest};
use std::future::Future;
use std::pin::Pin;

/// Caller identity for REST routes, resolved by the same authenticator the
/// WebSocket handshake uses.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Identity);

impl AuthenticatedUser {
    pub fn identity(&self) -> &Identity {
        &self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let handshake = Handshake::from_request(req);
        let state = req.app_data::<web::Data<AppState>>().cloned();

        Box::pin(async move {
            let state =
                state.ok_or_else(|| AppError::Internal("application state not configured".into()))?;
            let identity = state.authenticator.authenticate(&handshake).await?;
            Ok(AuthenticatedUser(identity))
        })
    }
}
