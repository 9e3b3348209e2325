use super::{ConnectionAuthenticator, Handshake};
use crate::error::AppError;
use crate::presence::Identity;
use async_trait::async_trait;

/// Takes the identity from the `userId` query parameter without verification.
pub struct TrustedQueryAuthenticator;

#[async_trait]
impl ConnectionAuthenticator for TrustedQueryAuthenticator {
    async fn authenticate(&self, handshake: &Handshake) -> Result<Identity, AppError> {
        handshake
            .query_param("userId")
            .map(Identity::from)
            .ok_or_else(|| AppError::Unauthorized("userId query parameter missing".into()))
    }
}
