/// Product model
///
/// A product belongs to one company and targets one operating system.
/// Tickets are always raised against a product.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE products (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     name VARCHAR(50),
///     initials VARCHAR(50),
///     version VARCHAR(50),
///     company_id INTEGER REFERENCES companies(id),
///     os_id INTEGER REFERENCES os(id)
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::{Executor, Sqlite, SqlitePool};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub name: Option<String>,
    pub initials: Option<String>,
    pub version: Option<String>,
    pub company_id: Option<i64>,
    pub os_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateProduct {
    pub name: String,
    pub initials: Option<String>,
    pub version: Option<String>,
    pub company_id: i64,
    pub os_id: i64,
}

impl Product {
    /// Creates a product
    ///
    /// # Errors
    ///
    /// Fails with a foreign key violation if the company or OS does not exist.
    pub async fn create<'e, E>(executor: E, data: CreateProduct) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, initials, version, company_id, os_id)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(data.name)
        .bind(data.initials)
        .bind(data.version)
        .bind(data.company_id)
        .bind(data.os_id)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        data: CreateProduct,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name = ?, initials = ?, version = ?, company_id = ?, os_id = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(data.name)
        .bind(data.initials)
        .bind(data.version)
        .bind(data.company_id)
        .bind(data.os_id)
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Products owned by a company
    pub async fn list_by_company(pool: &SqlitePool, company_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE company_id = ? ORDER BY name")
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(pool)
            .await
    }
}

impl std::fmt::Display for Product {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}",
            self.initials.as_deref().unwrap_or_default(),
            self.version.as_deref().unwrap_or_default()
        )
    }
}
