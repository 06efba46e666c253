use crate::core::config::DefaultUserConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{AuthResponseDto, AuthUserDto, LoginRequestDto};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::models::User;
use crate::features::auth::password::{hash_password, verify_password, PasswordError};
use crate::features::auth::services::token_service::TokenService;
use sqlx::PgPool;
use std::sync::Arc;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Service for authentication operations (login, default account)
pub struct AuthService {
    pool: PgPool,
    token_service: Arc<TokenService>,
}

impl AuthService {
    pub fn new(pool: PgPool, token_service: Arc<TokenService>) -> Self {
        Self {
            pool,
            token_service,
        }
    }

    /// Login with username and password
    ///
    /// Unknown usernames and wrong passwords fail identically.
    pub async fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash FROM users WHERE username = $1",
        )
        .bind(dto.username.trim())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            tracing::debug!("Login attempt for unknown user");
            AppError::Unauthorized(INVALID_CREDENTIALS.to_string())
        })?;

        // Argon2 is CPU-bound; keep it off the async workers
        let password = dto.password;
        let password_hash = user.password_hash.clone();
        let verified = tokio::task::spawn_blocking(move || {
            verify_password(&password, &password_hash)
        })
        .await
        .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))?;

        match verified {
            Ok(()) => {}
            Err(PasswordError::VerificationFailed) => {
                tracing::debug!("Wrong password for user {}", user.id);
                return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
            Err(e) => {
                tracing::error!("Stored password hash for user {} is unusable: {}", user.id, e);
                return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
        }

        let issued = self.token_service.issue(user.id, &user.username)?;
        tracing::info!("User logged in: id={}", user.id);

        Ok(AuthResponseDto {
            token: issued.token,
            token_type: "Bearer".to_string(),
            expires_in: issued.expires_in,
            user: AuthUserDto::from(user),
        })
    }

    /// Get current authenticated user info
    pub async fn get_current_user(&self, user: AuthenticatedUser) -> Result<AuthUserDto> {
        Ok(AuthUserDto::from(user))
    }

    /// Create the configured default account unless it already exists.
    /// An existing account keeps its password.
    pub async fn provision_default_user(&self, config: &DefaultUserConfig) -> Result<()> {
        let password = config.password.clone();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
            .map_err(|e| AppError::Validation(format!("Invalid default password: {}", e)))?;

        let result = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            ON CONFLICT (username) DO NOTHING
            "#,
        )
        .bind(&config.username)
        .bind(&password_hash)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            tracing::info!("Default user '{}' created", config.username);
        } else {
            tracing::info!("Default user '{}' already exists", config.username);
        }

        Ok(())
    }
}
