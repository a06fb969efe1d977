//! Dubbed videos function.
//!
//! ```text
//! OPTIONS  -> CORS preflight
//! GET      -> { "videos": [VideoEntry, ...] }   newest first
//! POST     -> { "video": VideoEntry }           201, needs admin_password in body
//! DELETE   -> { "success": true }               needs ?password=, deletes ?id=
//! ```

use axum::http::StatusCode;
use dubsite_core::error::CoreError;
use dubsite_db::models::video::CreateVideoEntry;
use dubsite_db::repositories::VideoRepo;
use serde_json::json;
use sqlx::Connection;

use super::{
    body_password, from_body, parse_json_body, query_id, CONTENT_ALLOW_HEADERS,
    CONTENT_ALLOW_METHODS, PASSWORD_QUERY_PARAM,
};
use crate::error::{AppError, AppResult};
use crate::invocation::{HttpMethod, Invocation, InvocationResponse};
use crate::state::AppState;

/// Entry point for the videos function.
pub async fn handle(state: &AppState, invocation: Invocation) -> InvocationResponse {
    let result = match invocation.method() {
        HttpMethod::Options => Ok(InvocationResponse::preflight(
            CONTENT_ALLOW_METHODS,
            CONTENT_ALLOW_HEADERS,
        )),
        HttpMethod::Get => list_videos(state).await,
        HttpMethod::Post => create_video(state, &invocation).await,
        HttpMethod::Delete => delete_video(state, &invocation).await,
        HttpMethod::Other(method) => Err(CoreError::MethodNotAllowed(method).into()),
    };

    result.unwrap_or_else(AppError::into_invocation_response)
}

async fn list_videos(state: &AppState) -> AppResult<InvocationResponse> {
    let videos = state
        .connections
        .scoped(|conn| Box::pin(async move { Ok::<_, AppError>(VideoRepo::list(conn).await?) }))
        .await?;

    Ok(InvocationResponse::json(StatusCode::OK, &json!({ "videos": videos })))
}

async fn create_video(state: &AppState, invocation: &Invocation) -> AppResult<InvocationResponse> {
    let body = parse_json_body(invocation)?;
    state.authorizer.authorize(body_password(&body))?;

    let input: CreateVideoEntry = from_body(body)?;

    let video = state
        .connections
        .scoped(move |conn| {
            Box::pin(async move {
                let mut tx = conn.begin().await?;
                let video = VideoRepo::create(&mut tx, &input).await?;
                tx.commit().await?;
                Ok::<_, AppError>(video)
            })
        })
        .await?;

    tracing::info!(
        video_id = video.id,
        episode = ?video.episode_number,
        series = ?video.anime_series,
        "Video added",
    );

    Ok(InvocationResponse::json(
        StatusCode::CREATED,
        &json!({ "video": video }),
    ))
}

async fn delete_video(state: &AppState, invocation: &Invocation) -> AppResult<InvocationResponse> {
    state
        .authorizer
        .authorize(invocation.query(PASSWORD_QUERY_PARAM))?;

    if let Some(id) = query_id(invocation)? {
        let removed = state
            .connections
            .scoped(move |conn| {
                Box::pin(async move {
                    let mut tx = conn.begin().await?;
                    let removed = VideoRepo::delete(&mut tx, id).await?;
                    tx.commit().await?;
                    Ok::<_, AppError>(removed)
                })
            })
            .await?;

        tracing::info!(video_id = id, removed, "Video deleted");
    }

    Ok(InvocationResponse::json(
        StatusCode::OK,
        &json!({ "success": true }),
    ))
}
