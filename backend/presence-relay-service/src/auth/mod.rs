//! Connection authentication. The relay never decides who a caller is on its
//! own; it asks a [`ConnectionAuthenticator`] at handshake time and trusts the
//! identity it gets back for the lifetime of the connection.

use crate::config::{AuthMode, Config};
use crate::error::AppError;
use crate::presence::Identity;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, HttpRequest};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

pub mod extractor;
pub mod jwt;
pub mod trusted;

pub use extractor::AuthenticatedUser;
pub use jwt::{Claims, JwtAuthenticator};
pub use trusted::TrustedQueryAuthenticator;

/// What a client presented when opening a connection or calling a route.
#[derive(Debug, Clone, Default)]
pub struct Handshake {
    query: HashMap<String, String>,
    bearer_token: Option<String>,
}

impl Handshake {
    pub fn new(query: HashMap<String, String>, bearer_token: Option<String>) -> Self {
        Self {
            query,
            bearer_token,
        }
    }

    pub fn from_request(req: &HttpRequest) -> Self {
        let query = web::Query::<HashMap<String, String>>::from_query(req.query_string())
            .map(|q| q.into_inner())
            .unwrap_or_default();

        let bearer_token = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().split_once(' '))
            // auth scheme names are case-insensitive (RFC 7235)
            .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
            .map(|(_, token)| token.trim().to_string())
            .filter(|s| !s.is_empty());

        Self {
            query,
            bearer_token,
        }
    }

    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// `token` query parameter first (browsers cannot set headers on a
    /// WebSocket upgrade), then the bearer header.
    pub fn token(&self) -> Option<&str> {
        self.query_param("token").or(self.bearer_token.as_deref())
    }
}

#[async_trait]
pub trait ConnectionAuthenticator: Send + Sync {
    /// Resolve the caller's identity, or `AppError::Unauthorized`.
    async fn authenticate(&self, handshake: &Handshake) -> Result<Identity, AppError>;
}

pub fn from_config(config: &Config) -> Result<Arc<dyn ConnectionAuthenticator>, AppError> {
    match config.auth_mode {
        AuthMode::Jwt => {
            let secret = config
                .jwt_secret
                .as_deref()
                .ok_or_else(|| AppError::Config("JWT_SECRET missing".into()))?;
            Ok(Arc::new(JwtAuthenticator::new(secret)))
        }
        AuthMode::Trusted => {
            tracing::warn!("AUTH_MODE=trusted: identities are taken from the userId query parameter unverified");
            Ok(Arc::new(TrustedQueryAuthenticator))
        }
    }
}
