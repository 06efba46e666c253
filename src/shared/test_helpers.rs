#[cfg(test)]
use crate::features::auth::model::AuthenticatedUser;

#[cfg(test)]
use axum::{Extension, Router};

#[cfg(test)]
use uuid::Uuid;

/// Test user whose id is derived from the username, so the same name always
/// maps to the same account
#[cfg(test)]
pub fn create_test_user(username: &str) -> AuthenticatedUser {
    let mut bytes = [0u8; 16];
    for (slot, b) in bytes.iter_mut().zip(username.bytes()) {
        *slot = b;
    }

    AuthenticatedUser {
        id: Uuid::from_bytes(bytes),
        username: username.to_string(),
    }
}

/// Serve `router` as if every request carried a valid token for `user`
#[cfg(test)]
pub fn with_test_user(router: Router, user: AuthenticatedUser) -> Router {
    router.layer(Extension(user))
}
