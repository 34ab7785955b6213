//! Integration tests for the Pagemark Server API

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use pagemark_core::storage::LocalStorage;
use pagemark_core::Document;
use pagemark_server::routes::create_router;
use pagemark_server::state::{AppState, DocumentEntry, Library, ServerEvent};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

const TWO_CHAPTERS: &str = "# A\nfoo\nbar\n# B\nbaz";

/// Create a test app state with temporary storage
async fn create_test_state() -> (AppState, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let storage_path = temp_dir.path().to_path_buf();

    tokio::fs::create_dir_all(storage_path.join("documents"))
        .await
        .unwrap();
    tokio::fs::create_dir_all(storage_path.join("progress"))
        .await
        .unwrap();

    let storage = Arc::new(LocalStorage::new(&storage_path));
    let state = AppState::with_storage(storage, storage_path, Library::default());

    (state, temp_dir)
}

/// Create a test server
async fn create_test_server() -> (TestServer, AppState, TempDir) {
    let (state, temp_dir) = create_test_state().await;
    let app = create_router(state.clone());
    let server = TestServer::new(app).expect("Failed to create test server");
    (server, state, temp_dir)
}

/// Store a document and index it, bypassing the upload endpoint
async fn seed_document(state: &AppState, title: &str, text: &str) -> String {
    let document = Document::new(title, text);
    state.documents().save(&document).await.unwrap();

    let id = document.id.to_string();
    state.library.write().await.documents.insert(
        id.clone(),
        DocumentEntry {
            id: id.clone(),
            title: document.title.clone(),
            author: None,
            length: text.len(),
            chapters: pagemark_core::classify(text).len(),
            added_at: chrono::Utc::now(),
        },
    );
    id
}

#[tokio::test]
async fn test_health_check() {
    let (server, _state, _temp_dir) = create_test_server().await;

    let response = server.get("/health").await;

    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_list_documents_empty() {
    let (server, _state, _temp_dir) = create_test_server().await;

    let response = server.get("/api/v1/documents").await;

    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["documents"].as_array().unwrap().len(), 0);
    assert_eq!(body["total"], 0);
    assert_eq!(body["page"], 1);
    assert_eq!(body["per_page"], 20);
}

#[tokio::test]
async fn test_list_documents_page_zero_treated_as_one() {
    let (server, state, _temp_dir) = create_test_server().await;
    seed_document(&state, "Only", "text").await;

    let response = server
        .get("/api/v1/documents")
        .add_query_param("page", "0")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["page"], 1);
    assert_eq!(body["documents"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_documents_with_search() {
    let (server, state, _temp_dir) = create_test_server().await;
    seed_document(&state, "Moby Dick", "Call me Ishmael.").await;
    seed_document(&state, "Walden", "I went to the woods.").await;

    let response = server
        .get("/api/v1/documents")
        .add_query_param("search", "moby")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["documents"][0]["title"], "Moby Dick");
}

#[tokio::test]
async fn test_upload_markdown_document() {
    let (server, _state, _temp_dir) = create_test_server().await;

    let form = MultipartForm::new()
        .add_text("author", "Anon")
        .add_part(
            "file",
            Part::bytes(TWO_CHAPTERS.as_bytes().to_vec())
                .file_name("notes.md")
                .mime_type("text/markdown"),
        );
    let response = server.post("/api/v1/documents").multipart(form).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["title"], "notes");
    let id = body["id"].as_str().unwrap().to_string();

    let response = server.get(&format!("/api/v1/documents/{id}")).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["author"], "Anon");
    assert_eq!(body["length"], TWO_CHAPTERS.len());
    let chapters = body["chapters"].as_array().unwrap();
    assert_eq!(chapters.len(), 2);
    assert_eq!(chapters[1]["title"], "B");
    assert_eq!(chapters[1]["source_offset"], 12);

    let response = server.get("/api/v1/documents").await;
    let body: Value = response.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["documents"][0]["chapters"], 2);
}

#[tokio::test]
async fn test_upload_uses_title_field() {
    let (server, _state, _temp_dir) = create_test_server().await;

    let form = MultipartForm::new().add_text("title", "Field Title").add_part(
        "file",
        Part::bytes(b"plain text".to_vec()).file_name("ignored.txt"),
    );
    let response = server.post("/api/v1/documents").multipart(form).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["title"], "Field Title");
}

#[tokio::test]
async fn test_upload_unsupported_format() {
    let (server, _state, _temp_dir) = create_test_server().await;

    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(b"%PDF-1.7".to_vec()).file_name("book.pdf"),
    );
    let response = server.post("/api/v1/documents").multipart(form).await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_upload_rejects_invalid_utf8() {
    let (server, _state, _temp_dir) = create_test_server().await;

    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(vec![0xff, 0xfe, 0x00]).file_name("broken.txt"),
    );
    let response = server.post("/api/v1/documents").multipart(form).await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_upload_no_file() {
    let (server, _state, _temp_dir) = create_test_server().await;

    // POST with no file should fail
    let response = server.post("/api/v1/documents").await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_get_document_invalid_uuid() {
    let (server, _state, _temp_dir) = create_test_server().await;

    let response = server.get("/api/v1/documents/not-a-uuid").await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_get_document_not_found_is_content_unavailable() {
    let (server, _state, _temp_dir) = create_test_server().await;

    let response = server
        .get("/api/v1/documents/00000000-0000-0000-0000-000000000000")
        .await;

    response.assert_status_not_found();
    assert_eq!(response.text(), "content unavailable");
}

#[tokio::test]
async fn test_layout_binds_chapters_to_pages() {
    let (server, state, _temp_dir) = create_test_server().await;
    let id = seed_document(&state, "Two", TWO_CHAPTERS).await;

    let response = server
        .get(&format!("/api/v1/documents/{id}/layout"))
        .add_query_param("font_size", "16")
        .add_query_param("height", "60")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total_pages"], 3);
    assert_eq!(body["pages"][1]["start_offset"], 8);
    assert_eq!(body["pages"][2]["end_offset"], TWO_CHAPTERS.len());
    assert_eq!(body["chapters"][0]["page_index"], 0);
    assert_eq!(body["chapters"][1]["page_index"], 1);
}

#[tokio::test]
async fn test_layout_clamps_font_size() {
    let (server, state, _temp_dir) = create_test_server().await;
    let id = seed_document(&state, "Two", TWO_CHAPTERS).await;

    let response = server
        .get(&format!("/api/v1/documents/{id}/layout"))
        .add_query_param("font_size", "200")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["font_size"], 24);
    assert_eq!(body["height"], 800.0);
    assert_eq!(body["total_pages"], 1);
}

#[tokio::test]
async fn test_get_page_content_and_chapter() {
    let (server, state, _temp_dir) = create_test_server().await;
    let id = seed_document(&state, "Two", TWO_CHAPTERS).await;

    let response = server
        .get(&format!("/api/v1/documents/{id}/pages/1"))
        .add_query_param("height", "60")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["index"], 1);
    assert_eq!(body["content"], "bar\n# B");
    assert_eq!(body["current_chapter"]["title"], "B");
    assert!(body["selected_chapter"].is_null());
    assert_eq!(body["percent"], 67);
}

#[tokio::test]
async fn test_get_page_out_of_range_clamps() {
    let (server, state, _temp_dir) = create_test_server().await;
    let id = seed_document(&state, "Two", TWO_CHAPTERS).await;

    let response = server
        .get(&format!("/api/v1/documents/{id}/pages/99"))
        .add_query_param("height", "60")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["index"], 2);
    assert_eq!(body["total_pages"], 3);
}

#[tokio::test]
async fn test_get_page_with_chapter_shows_whole_chapter() {
    let (server, state, _temp_dir) = create_test_server().await;
    let id = seed_document(&state, "Two", TWO_CHAPTERS).await;

    let response = server
        .get(&format!("/api/v1/documents/{id}/pages/1"))
        .add_query_param("height", "60")
        .add_query_param("chapter", "0")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["index"], 0);
    assert_eq!(body["selected_chapter"]["title"], "A");
    assert!(body["content"].as_str().unwrap().starts_with("# A\nfoo"));
}

#[tokio::test]
async fn test_get_page_unknown_chapter() {
    let (server, state, _temp_dir) = create_test_server().await;
    let id = seed_document(&state, "Two", TWO_CHAPTERS).await;

    let response = server
        .get(&format!("/api/v1/documents/{id}/pages/0"))
        .add_query_param("chapter", "7")
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_progress_defaults_to_zero() {
    let (server, state, _temp_dir) = create_test_server().await;
    let id = seed_document(&state, "Fresh", "text").await;

    let response = server.get(&format!("/api/v1/documents/{id}/progress")).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["percent"], 0);
    assert!(body["updated_at"].is_null());
}

#[tokio::test]
async fn test_save_and_read_progress() {
    let (server, state, _temp_dir) = create_test_server().await;
    let id = seed_document(&state, "Saved", "text").await;
    let mut events = state.subscribe();

    let response = server
        .put(&format!("/api/v1/documents/{id}/progress"))
        .json(&json!({ "percent": 40 }))
        .await;
    response.assert_status_ok();

    let response = server.get(&format!("/api/v1/documents/{id}/progress")).await;
    let body: Value = response.json();
    assert_eq!(body["percent"], 40);
    assert!(body["updated_at"].is_string());

    match events.try_recv() {
        Ok(ServerEvent::ProgressSaved { id: event_id, percent }) => {
            assert_eq!(event_id, id);
            assert_eq!(percent, 40);
        }
        other => panic!("expected progress event, got {other:?}"),
    }
}

#[tokio::test]
async fn test_beacon_progress_accepts_text_body() {
    let (server, state, _temp_dir) = create_test_server().await;
    let id = seed_document(&state, "Beacon", "text").await;

    let response = server
        .post(&format!("/api/v1/documents/{id}/progress"))
        .text(r#"{"percent":75}"#)
        .await;
    response.assert_status_ok();

    let response = server.get(&format!("/api/v1/documents/{id}/progress")).await;
    let body: Value = response.json();
    assert_eq!(body["percent"], 75);
}

#[tokio::test]
async fn test_save_progress_out_of_range() {
    let (server, state, _temp_dir) = create_test_server().await;
    let id = seed_document(&state, "Range", "text").await;

    let response = server
        .put(&format!("/api/v1/documents/{id}/progress"))
        .json(&json!({ "percent": 150 }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_save_progress_malformed_body() {
    let (server, state, _temp_dir) = create_test_server().await;
    let id = seed_document(&state, "Body", "text").await;

    let response = server
        .put(&format!("/api/v1/documents/{id}/progress"))
        .text("forty")
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_save_progress_unknown_document() {
    let (server, _state, _temp_dir) = create_test_server().await;

    let response = server
        .put("/api/v1/documents/00000000-0000-0000-0000-000000000000/progress")
        .json(&json!({ "percent": 10 }))
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_delete_document_removes_progress() {
    let (server, state, _temp_dir) = create_test_server().await;
    let id = seed_document(&state, "Doomed", "text").await;
    server
        .put(&format!("/api/v1/documents/{id}/progress"))
        .json(&json!({ "percent": 55 }))
        .await
        .assert_status_ok();

    let response = server.delete(&format!("/api/v1/documents/{id}")).await;
    response.assert_status(StatusCode::NO_CONTENT);

    server
        .get(&format!("/api/v1/documents/{id}"))
        .await
        .assert_status_not_found();
    let body: Value = server
        .get(&format!("/api/v1/documents/{id}/progress"))
        .await
        .json();
    assert_eq!(body["percent"], 0);
}

#[tokio::test]
async fn test_delete_document_invalid_uuid() {
    let (server, _state, _temp_dir) = create_test_server().await;

    let response = server.delete("/api/v1/documents/not-a-uuid").await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_delete_document_not_found() {
    let (server, _state, _temp_dir) = create_test_server().await;

    let response = server
        .delete("/api/v1/documents/00000000-0000-0000-0000-000000000000")
        .await;

    response.assert_status_not_found();
}
