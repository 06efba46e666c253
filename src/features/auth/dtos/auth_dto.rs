use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::models::User;

/// Request DTO for user login
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(
        min = 1,
        max = 128,
        message = "Password must be 1-128 characters"
    ))]
    pub password: String,
}

/// Response DTO for a successful login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponseDto {
    /// HS256 access token
    pub token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    pub user: AuthUserDto,
}

/// User info returned by login and /api/auth/me
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AuthUserDto {
    pub id: Uuid,
    pub username: String,
}

impl From<User> for AuthUserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

impl From<AuthenticatedUser> for AuthUserDto {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}
