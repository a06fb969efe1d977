//! News articles function.
//!
//! ```text
//! OPTIONS  -> CORS preflight
//! GET      -> { "news": [Article, ...] }        newest first
//! POST     -> { "news": Article }               201, needs admin_password in body
//! DELETE   -> { "success": true }               needs ?password=, deletes ?id=
//! ```

use axum::http::StatusCode;
use dubsite_core::error::CoreError;
use dubsite_db::models::article::CreateArticle;
use dubsite_db::repositories::ArticleRepo;
use serde_json::json;
use sqlx::Connection;

use super::{
    body_password, from_body, parse_json_body, query_id, CONTENT_ALLOW_HEADERS,
    CONTENT_ALLOW_METHODS, PASSWORD_QUERY_PARAM,
};
use crate::error::{AppError, AppResult};
use crate::invocation::{HttpMethod, Invocation, InvocationResponse};
use crate::state::AppState;

/// Entry point for the news function.
pub async fn handle(state: &AppState, invocation: Invocation) -> InvocationResponse {
    let result = match invocation.method() {
        HttpMethod::Options => Ok(InvocationResponse::preflight(
            CONTENT_ALLOW_METHODS,
            CONTENT_ALLOW_HEADERS,
        )),
        HttpMethod::Get => list_news(state).await,
        HttpMethod::Post => create_news(state, &invocation).await,
        HttpMethod::Delete => delete_news(state, &invocation).await,
        HttpMethod::Other(method) => Err(CoreError::MethodNotAllowed(method).into()),
    };

    result.unwrap_or_else(AppError::into_invocation_response)
}

// ---------------------------------------------------------------------------
// GET
// ---------------------------------------------------------------------------

async fn list_news(state: &AppState) -> AppResult<InvocationResponse> {
    let news = state
        .connections
        .scoped(|conn| Box::pin(async move { Ok::<_, AppError>(ArticleRepo::list(conn).await?) }))
        .await?;

    Ok(InvocationResponse::json(StatusCode::OK, &json!({ "news": news })))
}

// ---------------------------------------------------------------------------
// POST
// ---------------------------------------------------------------------------

async fn create_news(state: &AppState, invocation: &Invocation) -> AppResult<InvocationResponse> {
    let body = parse_json_body(invocation)?;
    state.authorizer.authorize(body_password(&body))?;

    let input: CreateArticle = from_body(body)?;

    let article = state
        .connections
        .scoped(move |conn| {
            Box::pin(async move {
                let mut tx = conn.begin().await?;
                let article = ArticleRepo::create(&mut tx, &input).await?;
                tx.commit().await?;
                Ok::<_, AppError>(article)
            })
        })
        .await?;

    tracing::info!(article_id = article.id, title = %article.title, "Article published");

    Ok(InvocationResponse::json(
        StatusCode::CREATED,
        &json!({ "news": article }),
    ))
}

// ---------------------------------------------------------------------------
// DELETE
// ---------------------------------------------------------------------------

async fn delete_news(state: &AppState, invocation: &Invocation) -> AppResult<InvocationResponse> {
    state
        .authorizer
        .authorize(invocation.query(PASSWORD_QUERY_PARAM))?;

    if let Some(id) = query_id(invocation)? {
        let removed = state
            .connections
            .scoped(move |conn| {
                Box::pin(async move {
                    let mut tx = conn.begin().await?;
                    let removed = ArticleRepo::delete(&mut tx, id).await?;
                    tx.commit().await?;
                    Ok::<_, AppError>(removed)
                })
            })
            .await?;

        tracing::info!(article_id = id, removed, "Article deleted");
    }

    Ok(InvocationResponse::json(
        StatusCode::OK,
        &json!({ "success": true }),
    ))
}
