//! Document library handlers

use super::{load_error, parse_id, ApiError};
use crate::state::{AppState, DocumentEntry, ServerEvent};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use pagemark_core::{classify, Document, DocumentLoader};
use serde::{Deserialize, Serialize};

/// File extensions accepted as plain-text documents
const TEXT_EXTENSIONS: [&str; 4] = ["txt", "text", "md", "markdown"];

/// Query parameters for listing documents
#[derive(Debug, Deserialize)]
pub struct ListDocumentsQuery {
    /// Page number (1-indexed, 0 treated as 1)
    #[serde(default = "default_page")]
    pub page: u32,

    /// Items per page
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Search query matched against title and author
    pub search: Option<String>,
}

fn default_page() -> u32 {
    1
}
fn default_per_page() -> u32 {
    20
}

/// Document summary for list response
#[derive(Debug, Serialize)]
pub struct DocumentSummary {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    pub chapters: usize,
}

impl From<&DocumentEntry> for DocumentSummary {
    fn from(entry: &DocumentEntry) -> Self {
        Self {
            id: entry.id.clone(),
            title: entry.title.clone(),
            author: entry.author.clone(),
            chapters: entry.chapters,
        }
    }
}

/// List response with pagination
#[derive(Debug, Serialize)]
pub struct ListDocumentsResponse {
    pub documents: Vec<DocumentSummary>,
    pub total: u32,
    pub page: u32,
    pub per_page: u32,
}

/// List all documents
pub async fn list_documents(
    State(state): State<AppState>,
    Query(query): Query<ListDocumentsQuery>,
) -> Json<ListDocumentsResponse> {
    let library = state.library.read().await;
    let search = query.search.as_deref().map(str::to_lowercase);

    let mut documents: Vec<DocumentSummary> = library
        .documents
        .values()
        .filter(|entry| match &search {
            Some(search) => {
                entry.title.to_lowercase().contains(search)
                    || entry
                        .author
                        .as_deref()
                        .is_some_and(|a| a.to_lowercase().contains(search))
            }
            None => true,
        })
        .map(DocumentSummary::from)
        .collect();

    documents.sort_by(|a, b| a.title.cmp(&b.title));

    let total = documents.len() as u32;

    let page = query.page.max(1);
    let start = ((page - 1) as usize).saturating_mul(query.per_page as usize);
    let documents = documents
        .into_iter()
        .skip(start)
        .take(query.per_page as usize)
        .collect();

    Json(ListDocumentsResponse {
        documents,
        total,
        page,
        per_page: query.per_page,
    })
}

/// Document metadata response
#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    /// Length of the raw text in bytes
    pub length: usize,
    pub chapters: Vec<ChapterSummary>,
}

#[derive(Debug, Serialize)]
pub struct ChapterSummary {
    pub index: usize,
    pub title: String,
    pub level: u8,
    pub source_offset: usize,
}

/// Get a single document's metadata and chapter list
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DocumentResponse>, ApiError> {
    let id = parse_id(&id)?;
    let document = state.documents().load(id).await.map_err(load_error)?;

    let chapters = classify(&document.text)
        .into_iter()
        .enumerate()
        .map(|(index, chapter)| ChapterSummary {
            index,
            title: chapter.title,
            level: chapter.level,
            source_offset: chapter.source_offset,
        })
        .collect();

    Ok(Json(DocumentResponse {
        id: document.id.to_string(),
        length: document.text.len(),
        title: document.title,
        author: document.author,
        chapters,
    }))
}

/// Upload response
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub id: String,
    pub title: String,
    pub message: String,
}

/// Upload a new plain-text or markdown document
pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: axum_extra::extract::Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut upload: Option<(String, String)> = None;
    let mut title: Option<String> = None;
    let mut author: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "file" => {
                let filename = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "unknown".to_string());

                let path = std::path::Path::new(&filename);
                let extension = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(str::to_lowercase)
                    .ok_or_else(|| (StatusCode::BAD_REQUEST, "Unknown file type".to_string()))?;
                if !TEXT_EXTENSIONS.contains(&extension.as_str()) {
                    return Err((
                        StatusCode::BAD_REQUEST,
                        format!("Unsupported format: {}", extension),
                    ));
                }
                let stem = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("Untitled")
                    .to_string();

                let data = field
                    .bytes()
                    .await
                    .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
                let text = String::from_utf8(data.to_vec()).map_err(|_| {
                    (
                        StatusCode::BAD_REQUEST,
                        "Document is not valid UTF-8".to_string(),
                    )
                })?;
                upload = Some((stem, text));
            }
            "title" => {
                title = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?,
                );
            }
            "author" => {
                author = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?,
                );
            }
            _ => {}
        }
    }

    let (stem, text) =
        upload.ok_or_else(|| (StatusCode::BAD_REQUEST, "No file provided".to_string()))?;

    let title = title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or(stem);
    let mut document = Document::new(title, text);
    if let Some(author) = author.map(|a| a.trim().to_string()).filter(|a| !a.is_empty()) {
        document = document.with_author(author);
    }

    // Classification is CPU-bound on large texts
    let (document, chapters) = tokio::task::spawn_blocking(move || {
        let chapters = classify(&document.text).len();
        (document, chapters)
    })
    .await
    .map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Task failed: {}", e),
        )
    })?;

    state
        .documents()
        .save(&document)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let id = document.id.to_string();
    {
        let mut library = state.library.write().await;
        library.documents.insert(
            id.clone(),
            DocumentEntry {
                id: id.clone(),
                title: document.title.clone(),
                author: document.author.clone(),
                length: document.text.len(),
                chapters,
                added_at: chrono::Utc::now(),
            },
        );
    }

    state
        .save_library()
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    tracing::info!(document = %id, chapters, "Document uploaded");
    state.broadcast(ServerEvent::DocumentAdded {
        id: id.clone(),
        title: document.title.clone(),
    });

    Ok(Json(UploadResponse {
        id,
        title: document.title,
        message: "Document uploaded successfully".to_string(),
    }))
}

/// Delete a document together with its reading progress
pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    let uuid = parse_id(&id).map_err(|(status, _)| status)?;
    let id = uuid.to_string();

    let entry = {
        let mut library = state.library.write().await;
        library.documents.remove(&id)
    };

    let entry = match entry {
        Some(e) => e,
        None => return Err(StatusCode::NOT_FOUND),
    };

    // Save library index first (before deleting records)
    // If save fails, restore the entry for consistency
    if let Err(e) = state.save_library().await {
        let mut library = state.library.write().await;
        library.documents.insert(id.clone(), entry);
        tracing::error!("Failed to save library after delete: {}", e);
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    if let Err(e) = state.documents().delete(uuid).await {
        tracing::warn!(document = %id, "Failed to remove document record: {}", e);
    }
    if let Err(e) = state.progress().clear(uuid).await {
        tracing::warn!(document = %id, "Failed to remove progress record: {}", e);
    }

    state.broadcast(ServerEvent::DocumentDeleted { id });

    Ok(StatusCode::NO_CONTENT)
}
