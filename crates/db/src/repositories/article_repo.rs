//! Repository for the `news` table.

use dubsite_core::types::DbId;
use sqlx::PgConnection;

use crate::models::article::{Article, CreateArticle};

/// Column list for `news` queries.
const COLUMNS: &str = "id, title, content, image_url, created_at, updated_at";

/// Provides list, create and delete for news articles.
pub struct ArticleRepo;

impl ArticleRepo {
    /// All articles, newest first.
    pub async fn list(conn: &mut PgConnection) -> Result<Vec<Article>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM news ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Article>(&query).fetch_all(conn).await
    }

    /// Insert an article, returning the full row.
    ///
    /// A missing `image_url` is stored as an empty string.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateArticle,
    ) -> Result<Article, sqlx::Error> {
        let query = format!(
            "INSERT INTO news (title, content, image_url) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Article>(&query)
            .bind(&input.title)
            .bind(&input.content)
            .bind(input.image_url.as_deref().unwrap_or_default())
            .fetch_one(conn)
            .await
    }

    /// Delete an article by id. Returns the number of rows removed (0 or 1);
    /// a missing id is not an error.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM news WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }
}
