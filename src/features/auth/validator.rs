use super::model::{AuthenticatedUser, Claims};
use crate::core::config::AuthConfig;
use crate::core::error::AppError;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

/// Verifies HS256 access tokens issued by `TokenService`
pub struct JwtValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtValidator {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.jwt_leeway.as_secs();
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!("Rejected access token: {}", e);
                AppError::Unauthorized("Invalid or expired token".to_string())
            })?;

        Ok(token_data.claims.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::services::TokenService;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::Duration;
    use uuid::Uuid;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            token_ttl: Duration::from_secs(3600),
            jwt_leeway: Duration::from_secs(0),
        }
    }

    fn sign(secret: &str, claims: &Claims) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_issued_token_round_trip() {
        let config = config("test-secret");
        let tokens = TokenService::new(&config);
        let validator = JwtValidator::new(&config);
        let id = Uuid::new_v4();

        let issued = tokens.issue(id, "alice").unwrap();
        let user = validator.validate_token(&issued.token).unwrap();

        assert_eq!(user.id, id);
        assert_eq!(user.username, "alice");
        assert_eq!(issued.expires_in, 3600);
    }

    #[test]
    fn test_expired_token() {
        let now = Utc::now().timestamp() as u64;
        let claims = Claims {
            sub: Uuid::new_v4(),
            username: "alice".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = sign("test-secret", &claims);

        let result = JwtValidator::new(&config("test-secret")).validate_token(&token);
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_wrong_secret() {
        let token = TokenService::new(&config("secret1"))
            .issue(Uuid::new_v4(), "alice")
            .unwrap()
            .token;

        let result = JwtValidator::new(&config("secret2")).validate_token(&token);
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_tampered_token() {
        let token = TokenService::new(&config("test-secret"))
            .issue(Uuid::new_v4(), "alice")
            .unwrap()
            .token;
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_claims = Claims {
            sub: Uuid::new_v4(),
            username: "mallory".to_string(),
            iat: 0,
            exp: u64::MAX / 2,
        };
        let forged = sign("other-secret", &forged_claims);
        parts[1] = forged.split('.').nth(1).unwrap();

        let result = JwtValidator::new(&config("test-secret")).validate_token(&parts.join("."));
        assert!(result.is_err());
    }

    #[test]
    fn test_garbage_token() {
        let validator = JwtValidator::new(&config("test-secret"));
        assert!(validator.validate_token("").is_err());
        assert!(validator.validate_token("not.a.token").is_err());
    }
}
