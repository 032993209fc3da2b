//! Feed handlers
//!
//! Endpoints for opening feed sessions and scrolling through them.
//! Supports content negotiation: Accept: application/json for JSON, otherwise text/plain.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::app::{DynFeedController, FeedView, ScrollTrigger, SuppressReason, TriggerResult};
use crate::error::AppError;
use crate::feed::{render_feed, render_trigger};
use crate::AppState;

/// Check if the client wants JSON response
fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("application/json"))
        .unwrap_or(false)
}

fn text_response(status: StatusCode, body: String) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response()
}

/// Resolve a session id from the path
fn find_session(state: &AppState, id: &str) -> Result<Arc<DynFeedController>, AppError> {
    let session_id = Uuid::parse_str(id)
        .map_err(|_| AppError::BadRequest(format!("Invalid session ID: {}", id)))?;

    state
        .sessions
        .get(&session_id)
        .ok_or_else(|| AppError::NotFound(format!("Feed session {} not found", id)))
}

#[derive(Debug, Serialize)]
pub struct OpenFeedResponse {
    pub session_id: Uuid,
    pub feed: FeedView,
}

#[derive(Debug, Serialize)]
pub struct LoadMoreResponse {
    pub triggered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<SuppressReason>,
    pub feed: FeedView,
}

/// POST /feeds
///
/// Opens a feed session and runs its initial load.
/// A failed load still opens the session; the view carries the error.
pub async fn open_feed(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let (session_id, controller) = state.sessions.open().await;
    let feed = controller.view();

    if wants_json(&headers) {
        Ok((StatusCode::CREATED, Json(OpenFeedResponse { session_id, feed })).into_response())
    } else {
        Ok(text_response(
            StatusCode::CREATED,
            format!("Session: {}\n\n{}", session_id, render_feed(&feed)),
        ))
    }
}

/// GET /feeds/:id
pub async fn get_feed(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let feed = find_session(&state, &id)?.view();

    if wants_json(&headers) {
        Ok(Json(feed).into_response())
    } else {
        Ok(text_response(StatusCode::OK, render_feed(&feed)))
    }
}

/// POST /feeds/:id/more
///
/// The client's end-of-list sentinel became visible. Repeated calls while a
/// round is running, or after the feed is exhausted, do nothing.
pub async fn load_more(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let controller = find_session(&state, &id)?;
    let result = ScrollTrigger::new(controller.clone())
        .sentinel_visible()
        .await;
    let feed = controller.view();

    if wants_json(&headers) {
        let reason = match result {
            TriggerResult::Triggered => None,
            TriggerResult::Suppressed(reason) => Some(reason),
        };
        Ok(Json(LoadMoreResponse {
            triggered: reason.is_none(),
            reason,
            feed,
        })
        .into_response())
    } else {
        Ok(text_response(
            StatusCode::OK,
            format!("{}\n\n{}", render_trigger(&result), render_feed(&feed)),
        ))
    }
}

/// POST /feeds/:id/refresh
///
/// Restarts both sources from the beginning and replaces the list.
pub async fn refresh_feed(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let controller = find_session(&state, &id)?;
    controller.refresh().await;
    let feed = controller.view();

    if wants_json(&headers) {
        Ok(Json(feed).into_response())
    } else {
        Ok(text_response(StatusCode::OK, render_feed(&feed)))
    }
}

/// DELETE /feeds/:id
pub async fn close_feed(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let session_id = Uuid::parse_str(&id)
        .map_err(|_| AppError::BadRequest(format!("Invalid session ID: {}", id)))?;

    if state.sessions.close(&session_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Feed session {} not found", id)))
    }
}
