use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::Claims;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use uuid::Uuid;

/// Signed access token and its lifetime in seconds
#[derive(Debug)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64,
}

/// Issues HS256 access tokens
pub struct TokenService {
    encoding_key: EncodingKey,
    ttl_secs: u64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl_secs: config.token_ttl.as_secs(),
        }
    }

    pub fn issue(&self, user_id: Uuid, username: &str) -> Result<IssuedToken> {
        let iat = Utc::now().timestamp().max(0) as u64;
        let claims = Claims {
            sub: user_id,
            username: username.to_string(),
            iat,
            exp: iat.saturating_add(self.ttl_secs),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| {
                tracing::error!("Failed to encode JWT: {}", e);
                AppError::Internal("Failed to issue token".to_string())
            })?;

        Ok(IssuedToken {
            token,
            expires_in: i64::try_from(self.ttl_secs).unwrap_or(i64::MAX),
        })
    }
}
