/// Operating system lookup table
///
/// Products are built for exactly one operating system.

use serde::{Deserialize, Serialize};
use sqlx::{Executor, Sqlite, SqlitePool};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Os {
    pub id: i64,
    pub name: Option<String>,

    /// Short code, e.g. "LNX"
    pub initials: Option<String>,

    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateOs {
    pub name: String,
    pub initials: Option<String>,
    pub version: Option<String>,
}

impl Os {
    pub async fn create<'e, E>(executor: E, data: CreateOs) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Os>(
            "INSERT INTO os (name, initials, version) VALUES (?, ?, ?) RETURNING *",
        )
        .bind(data.name)
        .bind(data.initials)
        .bind(data.version)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Os>("SELECT * FROM os WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn update(pool: &SqlitePool, id: i64, data: CreateOs) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Os>(
            "UPDATE os SET name = ?, initials = ?, version = ? WHERE id = ? RETURNING *",
        )
        .bind(data.name)
        .bind(data.initials)
        .bind(data.version)
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM os WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM os")
            .fetch_one(pool)
            .await
    }
}

impl std::fmt::Display for Os {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}",
            self.name.as_deref().unwrap_or_default(),
            self.version.as_deref().unwrap_or_default()
        )
    }
}
