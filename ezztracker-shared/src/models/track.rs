/// Track (ticket) model
///
/// A track is an issue raised by a requester against a product. It carries a
/// priority and a status, and may be assigned to any number of handlers
/// through [`super::track_handler::TrackHandler`].
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tracks (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     title VARCHAR(100),
///     priority_id INTEGER REFERENCES priorities(id),
///     product_id INTEGER REFERENCES products(id),
///     requester_id INTEGER REFERENCES users(id),
///     status_id INTEGER REFERENCES statuses(id),
///     description TEXT
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::{Executor, Sqlite, SqlitePool};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Track {
    pub id: i64,
    pub title: Option<String>,
    pub priority_id: Option<i64>,
    pub product_id: Option<i64>,

    /// User who raised the ticket
    pub requester_id: Option<i64>,

    pub status_id: Option<i64>,
    pub description: Option<String>,
}

/// Input for creating or editing a track
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTrack {
    pub title: String,
    pub priority_id: i64,
    pub product_id: i64,
    pub requester_id: i64,
    pub status_id: i64,
    pub description: Option<String>,
}

impl Track {
    /// Creates a track
    ///
    /// # Errors
    ///
    /// Fails with a foreign key violation if any referenced priority, product,
    /// requester or status does not exist.
    pub async fn create<'e, E>(executor: E, data: CreateTrack) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Track>(
            r#"
            INSERT INTO tracks (title, priority_id, product_id, requester_id, status_id, description)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(data.title)
        .bind(data.priority_id)
        .bind(data.product_id)
        .bind(data.requester_id)
        .bind(data.status_id)
        .bind(data.description)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Track>("SELECT * FROM tracks WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        data: CreateTrack,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Track>(
            r#"
            UPDATE tracks
            SET title = ?, priority_id = ?, product_id = ?, requester_id = ?,
                status_id = ?, description = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(data.title)
        .bind(data.priority_id)
        .bind(data.product_id)
        .bind(data.requester_id)
        .bind(data.status_id)
        .bind(data.description)
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a track
    ///
    /// Fails while handler assignments still reference it.
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tracks WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Tickets raised by one user, newest first
    pub async fn list_by_requester(
        pool: &SqlitePool,
        requester_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Track>("SELECT * FROM tracks WHERE requester_id = ? ORDER BY id DESC")
            .bind(requester_id)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM tracks")
            .fetch_one(pool)
            .await
    }
}

impl std::fmt::Display for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} - {}", self.id, self.title.as_deref().unwrap_or_default())
    }
}
