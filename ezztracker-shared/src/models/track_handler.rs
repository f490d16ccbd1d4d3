/// Assignment of a user to handle a track
///
/// One track may have many handlers and one user may handle many tracks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, Sqlite, SqlitePool};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TrackHandler {
    pub id: i64,

    /// User handling the ticket
    pub handler_id: Option<i64>,

    /// Ticket being handled
    pub tracker_id: Option<i64>,

    /// When the assignment was made
    pub handle_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTrackHandler {
    pub handler_id: i64,
    pub tracker_id: i64,
    pub handle_at: DateTime<Utc>,
}

impl CreateTrackHandler {
    /// Assignment stamped with the current time
    pub fn now(handler_id: i64, tracker_id: i64) -> Self {
        Self {
            handler_id,
            tracker_id,
            handle_at: Utc::now(),
        }
    }
}

impl TrackHandler {
    pub async fn create<'e, E>(executor: E, data: CreateTrackHandler) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, TrackHandler>(
            "INSERT INTO track_handlers (handler_id, tracker_id, handle_at) VALUES (?, ?, ?) RETURNING *",
        )
        .bind(data.handler_id)
        .bind(data.tracker_id)
        .bind(data.handle_at)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, TrackHandler>("SELECT * FROM track_handlers WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Reassigns handler and track; the assignment time is kept
    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        data: CreateTrackHandler,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, TrackHandler>(
            r#"
            UPDATE track_handlers
            SET handler_id = ?, tracker_id = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(data.handler_id)
        .bind(data.tracker_id)
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM track_handlers WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Every assignment on one track, oldest first
    pub async fn list_by_track(pool: &SqlitePool, tracker_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, TrackHandler>(
            "SELECT * FROM track_handlers WHERE tracker_id = ? ORDER BY handle_at, id",
        )
        .bind(tracker_id)
        .fetch_all(pool)
        .await
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM track_handlers")
            .fetch_one(pool)
            .await
    }
}
