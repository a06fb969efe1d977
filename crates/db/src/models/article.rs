//! News article model and DTOs.

use dubsite_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `news` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Article {
    pub id: DbId,
    pub title: String,
    pub content: String,
    pub image_url: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for publishing an article.
///
/// `title` and `content` are not checked here; a missing value reaches the
/// database as NULL and the table constraints reject it.
#[derive(Debug, Default, Deserialize)]
pub struct CreateArticle {
    pub title: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
}
