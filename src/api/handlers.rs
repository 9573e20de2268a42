//! Request handlers for the note endpoints

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::error::AppError;
use super::query::{FilterQuery, ListQuery};
use crate::models::is_blank;
use crate::{CreateNote, NoteError, NoteId, NoteService, NoteSummary, NoteView, Page, UpdateNote};

/// Shared server state
pub struct ServerState {
    service: Arc<Mutex<NoteService>>,
}

pub type NotesState = Arc<ServerState>;

impl ServerState {
    pub fn new(service: NoteService) -> NotesState {
        Arc::new(Self {
            service: Arc::new(Mutex::new(service)),
        })
    }

    /// Runs `work` against the service on the blocking pool.
    ///
    /// SQLite calls are synchronous; the lock is held only inside the
    /// blocking task.
    async fn run<T, F>(&self, work: F) -> Result<T, AppError>
    where
        T: Send + 'static,
        F: FnOnce(&NoteService) -> Result<T, NoteError> + Send + 'static,
    {
        let service = self.service.clone();

        let result = tokio::task::spawn_blocking(move || {
            let service = service.blocking_lock();
            work(&service)
        })
        .await
        .context("note service task panicked")?;

        Ok(result?)
    }
}

// ============================================================================
// Health
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ============================================================================
// Notes
// ============================================================================

/// Body of `POST /notes`. Fields are optional here so a missing title or
/// text gets the same 400 as a blank one.
#[derive(Debug, Deserialize)]
pub struct CreateNoteBody {
    pub title: Option<String>,
    pub text: Option<String>,
    pub tags: Option<Vec<String>>,
}

pub async fn create_note(
    State(state): State<NotesState>,
    body: Result<Json<CreateNoteBody>, JsonRejection>,
) -> Result<(StatusCode, Json<NoteView>), AppError> {
    let Json(body) = body?;
    let (Some(title), Some(text)) = (body.title, body.text) else {
        return Err(empty_fields());
    };
    if is_blank(&title) || is_blank(&text) {
        return Err(empty_fields());
    }

    let input = CreateNote::new(title, text).with_tags(body.tags.unwrap_or_default());
    let view = state.run(move |service| service.create(input)).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

fn empty_fields() -> AppError {
    AppError::BadRequest("Title and text must not be empty!".to_string())
}

pub async fn update_note(
    State(state): State<NotesState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateNote>, JsonRejection>,
) -> Result<Json<NoteView>, AppError> {
    let Json(body) = body?;
    let id = NoteId::new(id);
    let view = state.run(move |service| service.update(&id, body)).await?;
    Ok(Json(view))
}

pub async fn delete_note(
    State(state): State<NotesState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = NoteId::new(id);
    state.run(move |service| service.delete(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_note(
    State(state): State<NotesState>,
    Path(id): Path<String>,
) -> Result<Json<NoteView>, AppError> {
    let id = NoteId::new(id);
    let view = state.run(move |service| service.get_by_id(&id)).await?;
    Ok(Json(view))
}

pub async fn list_summaries(
    State(state): State<NotesState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<NoteSummary>>, AppError> {
    let Query(query) = query?;
    let request = query.to_page_request()?;
    let summaries = state
        .run(move |service| service.list_summaries(&request))
        .await?;
    Ok(Json(summaries))
}

/// `GET /notes/filter`. Query pairs are taken raw so `tags` can repeat.
pub async fn filter_notes(
    State(state): State<NotesState>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Page<NoteView>>, AppError> {
    let Query(pairs) = pairs?;
    let query = FilterQuery::from_pairs(pairs)?;
    let tags = query.tag_set()?;
    let request = query.to_page_request()?;

    let page = state
        .run(move |service| service.list_by_tags(&tags, &request))
        .await?;
    Ok(Json(page))
}

pub async fn list_notes(
    State(state): State<NotesState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Page<NoteView>>, AppError> {
    let Query(query) = query?;
    let request = query.to_page_request()?;
    let page = state.run(move |service| service.list(&request)).await?;
    Ok(Json(page))
}
