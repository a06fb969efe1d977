//! Repository for the `anime_videos` table.

use dubsite_core::types::DbId;
use sqlx::PgConnection;

use crate::models::video::{CreateVideoEntry, VideoEntry};

/// Column list for `anime_videos` queries.
const COLUMNS: &str = "\
    id, title, description, video_url, thumbnail_url, \
    episode_number, anime_series, created_at, updated_at";

/// Provides list, create and delete for video entries.
pub struct VideoRepo;

impl VideoRepo {
    /// All video entries, newest first.
    pub async fn list(conn: &mut PgConnection) -> Result<Vec<VideoEntry>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM anime_videos ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, VideoEntry>(&query).fetch_all(conn).await
    }

    /// Insert a video entry, returning the full row.
    ///
    /// `description` and `thumbnail_url` default to empty strings;
    /// `episode_number` and `anime_series` stay NULL when omitted.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateVideoEntry,
    ) -> Result<VideoEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO anime_videos \
                (title, description, video_url, thumbnail_url, episode_number, anime_series) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, VideoEntry>(&query)
            .bind(&input.title)
            .bind(input.description.as_deref().unwrap_or_default())
            .bind(&input.video_url)
            .bind(input.thumbnail_url.as_deref().unwrap_or_default())
            .bind(input.episode_number)
            .bind(&input.anime_series)
            .fetch_one(conn)
            .await
    }

    /// Delete a video entry by id. Returns the number of rows removed.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM anime_videos WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }
}
