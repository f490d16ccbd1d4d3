/// User model and database operations
///
/// Users log into the admin with their email and password. Capabilities come
/// from role membership, stored in the `roles_users` association table (see
/// [`super::role::UserRole`]).
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     login VARCHAR(255) UNIQUE,
///     first_name VARCHAR(50),
///     last_name VARCHAR(100),
///     company_id INTEGER REFERENCES companies(id),
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     telephone VARCHAR(50),
///     active BOOLEAN NOT NULL DEFAULT 0,
///     confirmed_at TIMESTAMP
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use ezztracker_shared::auth::password::hash_password;
/// use ezztracker_shared::models::user::{CreateUser, User};
/// use sqlx::SqlitePool;
///
/// # async fn example(pool: SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
/// let user = User::create(&pool, CreateUser {
///     email: "harry.brown@example.com".to_string(),
///     password_hash: hash_password("s3cret-pass")?,
///     first_name: Some("Harry".to_string()),
///     last_name: Some("Brown".to_string()),
///     active: true,
///     ..Default::default()
/// }).await?;
///
/// let found = User::find_by_email(&pool, "harry.brown@example.com").await?;
/// assert_eq!(found.map(|u| u.id), Some(user.id));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Acquire, Sqlite, SqliteConnection, SqlitePool};

use super::role::Role;

/// User account
///
/// Passwords are stored as Argon2id hashes, never in plaintext, and the hash
/// is never serialized.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,

    /// Optional login name (unique when present)
    pub login: Option<String>,

    pub first_name: Option<String>,

    pub last_name: Option<String>,

    /// Company the user belongs to
    pub company_id: Option<i64>,

    /// Email address, unique across all users
    pub email: String,

    /// Argon2id password hash
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    pub telephone: Option<String>,

    /// Inactive users never pass the admin access policy
    pub active: bool,

    pub confirmed_at: Option<DateTime<Utc>>,

    /// Names of the roles the user holds
    ///
    /// Not a column: filled by [`User::load_roles`] where needed.
    #[sqlx(skip)]
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateUser {
    pub login: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company_id: Option<i64>,
    pub email: String,

    /// Argon2id password hash (NOT plaintext password!)
    pub password_hash: String,

    pub telephone: Option<String>,
    pub active: bool,
    pub confirmed_at: Option<DateTime<Utc>>,

    /// Role ids to grant
    pub role_ids: Vec<i64>,
}

/// Input for editing an existing user
///
/// Profile fields are always written. `password_hash` and `role_ids` are only
/// touched when `Some`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company_id: Option<i64>,
    pub email: String,
    pub telephone: Option<String>,
    pub active: bool,

    /// New password hash; `None` keeps the stored one
    pub password_hash: Option<String>,

    /// Replacement role set; `None` keeps the current roles
    pub role_ids: Option<Vec<i64>>,
}

impl User {
    /// Whether the user holds the named role
    ///
    /// Only meaningful after [`User::load_roles`].
    pub fn has_role(&self, name: &str) -> bool {
        self.roles.iter().any(|r| r == name)
    }

    /// Fills `roles` from the association table
    pub async fn load_roles(mut self, pool: &SqlitePool) -> Result<Self, sqlx::Error> {
        self.roles = Role::names_for_user(pool, self.id).await?;
        Ok(self)
    }

    /// Creates a user together with its role memberships
    ///
    /// Runs in its own transaction (a savepoint when `db` is already a
    /// transaction), so a failed role insert leaves no orphan user.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Email or login already exists (unique constraint violation)
    /// - A company or role id does not exist (foreign key violation)
    pub async fn create<'a, A>(db: A, data: CreateUser) -> Result<Self, sqlx::Error>
    where
        A: Acquire<'a, Database = Sqlite>,
    {
        let mut tx = db.begin().await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (login, first_name, last_name, company_id, email,
                               password_hash, telephone, active, confirmed_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(data.login)
        .bind(data.first_name)
        .bind(data.last_name)
        .bind(data.company_id)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.telephone)
        .bind(data.active)
        .bind(data.confirmed_at)
        .fetch_one(&mut *tx)
        .await?;

        replace_roles(&mut tx, user.id, &data.role_ids).await?;
        tx.commit().await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Finds a user by email address (exact match)
    pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Updates an existing user
    ///
    /// # Returns
    ///
    /// The updated user, or `None` if no user has this id
    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        data: UpdateUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET first_name = ?, last_name = ?, company_id = ?, email = ?,
                telephone = ?, active = ?,
                password_hash = COALESCE(?, password_hash)
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(data.first_name)
        .bind(data.last_name)
        .bind(data.company_id)
        .bind(data.email)
        .bind(data.telephone)
        .bind(data.active)
        .bind(data.password_hash)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(user) = user else {
            return Ok(None);
        };

        if let Some(role_ids) = data.role_ids {
            replace_roles(&mut tx, user.id, &role_ids).await?;
        }

        tx.commit().await?;
        Ok(Some(user))
    }

    /// Replaces the user's role set
    pub async fn set_roles(pool: &SqlitePool, id: i64, role_ids: &[i64]) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        replace_roles(&mut tx, id, role_ids).await?;
        tx.commit().await
    }

    /// Deletes a user by ID
    ///
    /// Role memberships go with the user; tickets and handler assignments that
    /// reference the user make the delete fail.
    ///
    /// # Returns
    ///
    /// True if the user was deleted, false if it didn't exist
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts total number of users
    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.email)
    }
}

async fn replace_roles(
    conn: &mut SqliteConnection,
    user_id: i64,
    role_ids: &[i64],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM roles_users WHERE user_id = ?")
        .bind(user_id)
        .execute(&mut *conn)
        .await?;

    for role_id in role_ids {
        sqlx::query("INSERT OR IGNORE INTO roles_users (user_id, role_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(role_id)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}
