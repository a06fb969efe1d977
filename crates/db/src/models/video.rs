//! Dubbed video entry model and DTOs.

use dubsite_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `anime_videos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VideoEntry {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub episode_number: Option<i32>,
    pub anime_series: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for adding a video entry.
#[derive(Debug, Default, Deserialize)]
pub struct CreateVideoEntry {
    pub title: Option<String>,
    pub description: Option<String>,
    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub episode_number: Option<i32>,
    pub anime_series: Option<String>,
}
