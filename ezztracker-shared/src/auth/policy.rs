/// Role-based access policy
///
/// An [`AccessPolicy`] names one required role. A request is allowed only if
/// it carries a [`Principal`] that is active and holds that role. The admin
/// uses a single superuser policy for every view.
///
/// # Example
///
/// ```
/// use ezztracker_shared::auth::policy::{AccessPolicy, Principal};
///
/// let admin = Principal {
///     user_id: 1,
///     email: "admin@ebizz.com.br".to_string(),
///     active: true,
///     roles: vec!["superuser".to_string(), "user".to_string()],
/// };
///
/// let policy = AccessPolicy::superuser();
/// assert!(policy.is_accessible(Some(&admin)));
/// assert!(!policy.is_accessible(None));
/// ```

use serde::Serialize;
use sqlx::SqlitePool;

use crate::models::{role::SUPERUSER, user::User};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthzError {
    #[error("Authentication required")]
    Anonymous,

    #[error("Account is inactive")]
    Inactive,

    #[error("Missing required role: {0}")]
    MissingRole(String),
}

/// The authenticated user behind a request
#[derive(Debug, Clone, Serialize)]
pub struct Principal {
    pub user_id: i64,
    pub email: String,
    pub active: bool,
    pub roles: Vec<String>,
}

impl Principal {
    /// Loads the principal fresh from the database
    ///
    /// Returns `None` when the user no longer exists.
    pub async fn load(pool: &SqlitePool, user_id: i64) -> Result<Option<Self>, sqlx::Error> {
        let Some(user) = User::find_by_id(pool, user_id).await? else {
            return Ok(None);
        };

        Ok(Some(user.load_roles(pool).await?.into()))
    }

    pub fn has_role(&self, name: &str) -> bool {
        self.roles.iter().any(|r| r == name)
    }
}

impl From<User> for Principal {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            email: user.email,
            active: user.active,
            roles: user.roles,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AccessPolicy {
    required_role: String,
}

impl AccessPolicy {
    pub fn new(required_role: impl Into<String>) -> Self {
        Self {
            required_role: required_role.into(),
        }
    }

    /// Policy guarding the admin views
    pub fn superuser() -> Self {
        Self::new(SUPERUSER)
    }

    pub fn required_role(&self) -> &str {
        &self.required_role
    }

    pub fn is_accessible(&self, principal: Option<&Principal>) -> bool {
        self.check(principal).is_ok()
    }

    /// Like [`AccessPolicy::is_accessible`], but says why access was denied
    pub fn check(&self, principal: Option<&Principal>) -> Result<(), AuthzError> {
        let principal = principal.ok_or(AuthzError::Anonymous)?;

        if !principal.active {
            return Err(AuthzError::Inactive);
        }

        if !principal.has_role(&self.required_role) {
            return Err(AuthzError::MissingRole(self.required_role.clone()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(active: bool, roles: &[&str]) -> Principal {
        Principal {
            user_id: 1,
            email: "someone@example.com".to_string(),
            active,
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn test_active_superuser_allowed() {
        let policy = AccessPolicy::superuser();
        assert!(policy.is_accessible(Some(&principal(true, &["superuser"]))));
        assert!(policy.is_accessible(Some(&principal(true, &["user", "superuser"]))));
    }

    #[test]
    fn test_anonymous_denied() {
        assert_eq!(AccessPolicy::superuser().check(None), Err(AuthzError::Anonymous));
    }

    #[test]
    fn test_inactive_superuser_denied() {
        let result = AccessPolicy::superuser().check(Some(&principal(false, &["superuser"])));
        assert_eq!(result, Err(AuthzError::Inactive));
    }

    #[test]
    fn test_plain_user_denied() {
        let result = AccessPolicy::superuser().check(Some(&principal(true, &["user"])));
        assert_eq!(result, Err(AuthzError::MissingRole("superuser".to_string())));
    }

    #[test]
    fn test_no_roles_denied() {
        assert!(!AccessPolicy::superuser().is_accessible(Some(&principal(true, &[]))));
    }

    #[test]
    fn test_role_match_is_exact() {
        let policy = AccessPolicy::superuser();
        assert!(!policy.is_accessible(Some(&principal(true, &["Superuser"]))));
        assert!(!policy.is_accessible(Some(&principal(true, &["superuser "]))));
    }

    #[test]
    fn test_custom_role() {
        let policy = AccessPolicy::new("user");
        assert_eq!(policy.required_role(), "user");
        assert!(policy.is_accessible(Some(&principal(true, &["user"]))));
    }
}
