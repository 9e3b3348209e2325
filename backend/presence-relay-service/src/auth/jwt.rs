use super::{ConnectionAuthenticator, Handshake};
use crate::error::AppError;
use crate::presence::Identity;
use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // identity
    pub exp: usize,
}

/// HS256 tokens signed with a shared secret.
pub struct JwtAuthenticator {
    key: DecodingKey,
    validation: Validation,
}

impl JwtAuthenticator {
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let data = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|e| AppError::Unauthorized(format!("invalid token: {e}")))?;
        if data.claims.sub.trim().is_empty() {
            return Err(AppError::Unauthorized("token has no subject".into()));
        }
        Ok(data.claims)
    }
}

#[async_trait]
impl ConnectionAuthenticator for JwtAuthenticator {
    async fn authenticate(&self, handshake: &Handshake) -> Result<Identity, AppError> {
        let token = handshake
            .token()
            .ok_or_else(|| AppError::Unauthorized("no token provided".into()))?;
        let claims = self.verify(token)?;
        Ok(Identity::new(claims.sub))
    }
}
