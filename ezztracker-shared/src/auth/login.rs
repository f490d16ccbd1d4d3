/// Email/password login
///
/// Every way a login can go wrong collapses into
/// [`LoginError::InvalidCredentials`], so a caller cannot tell an unknown
/// email from a wrong password.

use sqlx::SqlitePool;

use super::password::verify_password;
use crate::models::user::User;

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Verifies credentials and returns the matching user
///
/// The user row is never written; inactive accounts authenticate normally and
/// are stopped later by the access policy.
///
/// # Errors
///
/// `InvalidCredentials` when the password is blank, no user has this email,
/// the password does not match, or the stored hash is unreadable.
pub async fn authenticate(pool: &SqlitePool, email: &str, password: &str) -> Result<User, LoginError> {
    if password.is_empty() {
        return Err(LoginError::InvalidCredentials);
    }

    let Some(user) = User::find_by_email(pool, email).await? else {
        tracing::debug!("Login attempt for unknown email");
        return Err(LoginError::InvalidCredentials);
    };

    match verify_password(password, &user.password_hash) {
        Ok(true) => {
            tracing::info!(user_id = user.id, "User logged in");
            Ok(user)
        }
        Ok(false) => {
            tracing::debug!(user_id = user.id, "Password mismatch");
            Err(LoginError::InvalidCredentials)
        }
        Err(e) => {
            tracing::warn!(user_id = user.id, error = %e, "Stored password hash is unusable");
            Err(LoginError::InvalidCredentials)
        }
    }
}
