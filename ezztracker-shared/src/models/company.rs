/// Company model
///
/// A company owns zero or more users and zero or more products. Neither
/// relation implies ownership at the database level: deleting a company that
/// is still referenced fails with a foreign key violation.

use serde::{Deserialize, Serialize};
use sqlx::{Executor, Sqlite, SqlitePool};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Company {
    pub id: i64,
    pub company_name: Option<String>,
    pub description: Option<String>,
}

/// Input for creating or editing a company
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCompany {
    /// Explicit id, used by the bootstrap routine to pin the default company
    pub id: Option<i64>,
    pub company_name: String,
    pub description: Option<String>,
}

impl Company {
    pub async fn create<'e, E>(executor: E, data: CreateCompany) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        // A NULL id lets SQLite assign the next rowid
        sqlx::query_as::<_, Company>(
            "INSERT INTO companies (id, company_name, description) VALUES (?, ?, ?) RETURNING *",
        )
        .bind(data.id)
        .bind(data.company_name)
        .bind(data.description)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        data: CreateCompany,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Company>(
            "UPDATE companies SET company_name = ?, description = ? WHERE id = ? RETURNING *",
        )
        .bind(data.company_name)
        .bind(data.description)
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM companies WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM companies")
            .fetch_one(pool)
            .await
    }
}

impl std::fmt::Display for Company {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.company_name.as_deref().unwrap_or_default())
    }
}
