//! Layout, page and reading-progress handlers

use super::{load_error, parse_id, ApiError};
use crate::state::{AppState, ServerEvent};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use pagemark_core::config::DEFAULT_FONT_SIZE;
use pagemark_core::{
    Chapter, DocumentLoader, EngineConfig, PageMetrics, Progress, ProgressStore, Reader,
};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// Viewport used when the client does not send one
const DEFAULT_HEIGHT: f64 = 800.0;

/// Viewport parameters shared by the layout endpoints
#[derive(Debug, Deserialize)]
pub struct LayoutQuery {
    #[serde(default = "default_font_size")]
    pub font_size: u32,

    /// Available reading height in pixels
    #[serde(default = "default_height")]
    pub height: f64,
}

fn default_font_size() -> u32 {
    DEFAULT_FONT_SIZE
}
fn default_height() -> f64 {
    DEFAULT_HEIGHT
}

impl LayoutQuery {
    fn metrics(&self) -> PageMetrics {
        PageMetrics::new(self.font_size, self.height)
    }
}

#[derive(Debug, Serialize)]
pub struct PageSummary {
    pub index: usize,
    pub start_offset: usize,
    pub end_offset: usize,
}

/// Page boundaries and bound chapters for one viewport
#[derive(Debug, Serialize)]
pub struct LayoutResponse {
    pub font_size: u32,
    pub height: f64,
    pub total_pages: usize,
    pub pages: Vec<PageSummary>,
    pub chapters: Vec<Chapter>,
}

/// Paginate a document for the requested viewport
pub async fn get_layout(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<LayoutQuery>,
) -> Result<Json<LayoutResponse>, ApiError> {
    let id = parse_id(&id)?;
    let document = state.documents().load(id).await.map_err(load_error)?;
    let metrics = query.metrics();

    let reader = Reader::new(document, metrics, &EngineConfig::default());
    let layout = reader.layout();

    Ok(Json(LayoutResponse {
        font_size: metrics.font_size,
        height: metrics.available_height,
        total_pages: layout.total_pages(),
        pages: layout
            .pages
            .iter()
            .map(|page| PageSummary {
                index: page.index,
                start_offset: page.start_offset,
                end_offset: page.end_offset,
            })
            .collect(),
        chapters: layout.chapters.clone(),
    }))
}

/// Query for a single page; `chapter` switches to whole-chapter display
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_font_size")]
    pub font_size: u32,

    #[serde(default = "default_height")]
    pub height: f64,

    pub chapter: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct PageResponse {
    pub index: usize,
    pub total_pages: usize,
    /// Page text, or the whole selected chapter
    pub content: String,
    pub current_chapter: Option<Chapter>,
    pub selected_chapter: Option<Chapter>,
    pub percent: u8,
}

/// Render one page (or one chapter) of a document
pub async fn get_page(
    State(state): State<AppState>,
    Path((id, index)): Path<(String, usize)>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageResponse>, ApiError> {
    let id = parse_id(&id)?;
    let document = state.documents().load(id).await.map_err(load_error)?;

    let mut reader = Reader::new(
        document,
        PageMetrics::new(query.font_size, query.height),
        &EngineConfig::default(),
    );
    let now = Instant::now();
    // Saves scheduled here are dropped; clients persist through the progress routes
    match query.chapter {
        Some(chapter) => {
            reader
                .jump_to_chapter(chapter, now)
                .map_err(|e| (StatusCode::NOT_FOUND, e.to_string()))?;
        }
        None => {
            let target = i64::try_from(index).unwrap_or(i64::MAX);
            reader
                .go_to_page(target, now)
                .map_err(|e| (StatusCode::CONFLICT, e.to_string()))?;
        }
    }

    let view = reader.view();
    Ok(Json(PageResponse {
        index: view.page_index,
        total_pages: view.total_pages,
        content: view.content.to_string(),
        current_chapter: view.current_chapter.cloned(),
        selected_chapter: view.selected_chapter.cloned(),
        percent: Progress::from_position(view.page_index, view.total_pages).percent(),
    }))
}

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub document_id: String,
    pub percent: u8,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Body of a progress write
#[derive(Debug, Deserialize)]
pub struct ProgressUpdate {
    pub percent: u8,
}

/// Read the stored reading progress; unreadable records read as 0%
pub async fn get_progress(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProgressResponse>, ApiError> {
    let id = parse_id(&id)?;
    let (percent, updated_at) = match state.progress().read_record(id).await {
        Ok(Some(record)) => (record.percent, Some(record.updated_at)),
        Ok(None) => (Progress::ZERO, None),
        Err(e) => {
            tracing::warn!(document = %id, "Failed to read progress, reporting 0%: {}", e);
            (Progress::ZERO, None)
        }
    };

    Ok(Json(ProgressResponse {
        document_id: id.to_string(),
        percent: percent.percent(),
        updated_at,
    }))
}

/// Persist reading progress
///
/// Also mounted as POST for page-unload beacons, which cannot set a JSON
/// content type, so the body is parsed regardless of its declared type.
pub async fn save_progress(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<ProgressResponse>, ApiError> {
    let id = parse_id(&id)?;
    let update: ProgressUpdate = serde_json::from_slice(&body)
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Invalid progress body: {}", e)))?;
    if update.percent > 100 {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "percent must be between 0 and 100".to_string(),
        ));
    }

    let exists = state
        .documents()
        .exists(id)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    if !exists {
        return Err((StatusCode::NOT_FOUND, "content unavailable".to_string()));
    }

    let progress = Progress::new(update.percent);
    state
        .progress()
        .write_progress(id, progress)
        .await
        .map_err(|e| {
            tracing::error!(document = %id, "Failed to save progress: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    tracing::debug!(document = %id, percent = progress.percent(), "Progress saved");
    state.broadcast(ServerEvent::ProgressSaved {
        id: id.to_string(),
        percent: progress.percent(),
    });

    Ok(Json(ProgressResponse {
        document_id: id.to_string(),
        percent: progress.percent(),
        updated_at: Some(chrono::Utc::now()),
    }))
}
