/// Role model and the user/role association
///
/// Users acquire capabilities through role membership. The role named
/// [`SUPERUSER`] gates every administrative view.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE roles (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     name VARCHAR(80) NOT NULL UNIQUE,
///     description VARCHAR(255)
/// );
///
/// CREATE TABLE roles_users (
///     user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     role_id INTEGER NOT NULL REFERENCES roles(id) ON DELETE CASCADE,
///     PRIMARY KEY (user_id, role_id)
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::{Executor, Sqlite, SqlitePool};

/// Role held by every seeded account
pub const USER: &str = "user";

/// Role required by the admin access policy
pub const SUPERUSER: &str = "superuser";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// Input for creating or editing a role
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRole {
    pub name: String,
    pub description: Option<String>,
}

/// One row of the `roles_users` association table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRole {
    pub user_id: i64,
    pub role_id: i64,
}

impl Role {
    pub async fn create<'e, E>(executor: E, data: CreateRole) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Role>(
            "INSERT INTO roles (name, description) VALUES (?, ?) RETURNING *",
        )
        .bind(data.name)
        .bind(data.description)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE name = ?")
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        data: CreateRole,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Role>(
            "UPDATE roles SET name = ?, description = ? WHERE id = ? RETURNING *",
        )
        .bind(data.name)
        .bind(data.description)
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM roles WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Names of every role the user holds, alphabetically
    pub async fn names_for_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT r.name
            FROM roles r
            JOIN roles_users ru ON ru.role_id = r.id
            WHERE ru.user_id = ?
            ORDER BY r.name
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Association rows for one user
    pub async fn memberships(pool: &SqlitePool, user_id: i64) -> Result<Vec<UserRole>, sqlx::Error> {
        sqlx::query_as::<_, UserRole>(
            "SELECT user_id, role_id FROM roles_users WHERE user_id = ? ORDER BY role_id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM roles")
            .fetch_one(pool)
            .await
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
