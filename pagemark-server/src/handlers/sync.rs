//! Server-Sent Events handler for real-time updates

use crate::state::{AppState, ServerEvent};
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::Stream;
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

impl ServerEvent {
    /// SSE event name and JSON payload
    pub fn to_sse_parts(&self) -> (&'static str, serde_json::Value) {
        match self {
            ServerEvent::DocumentAdded { id, title } => (
                "document_added",
                serde_json::json!({ "id": id, "title": title }),
            ),
            ServerEvent::DocumentDeleted { id } => {
                ("document_deleted", serde_json::json!({ "id": id }))
            }
            ServerEvent::ProgressSaved { id, percent } => (
                "progress_saved",
                serde_json::json!({ "id": id, "percent": percent }),
            ),
        }
    }
}

/// SSE endpoint for real-time updates
pub async fn sync_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.subscribe();
    let stream = BroadcastStream::new(rx);

    let event_stream = stream.filter_map(|result| match result {
        Ok(event) => {
            let (event_type, data) = event.to_sse_parts();
            Some(Ok(Event::default().event(event_type).data(data.to_string())))
        }
        Err(_) => None, // Lagged, skip
    });

    Sse::new(event_stream).keep_alive(KeepAlive::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_event_payload() {
        let event = ServerEvent::ProgressSaved {
            id: "abc".to_string(),
            percent: 42,
        };
        let (name, data) = event.to_sse_parts();
        assert_eq!(name, "progress_saved");
        assert_eq!(data["percent"], 42);
        assert_eq!(data["id"], "abc");
    }

    #[test]
    fn test_document_events_are_named() {
        let added = ServerEvent::DocumentAdded {
            id: "1".to_string(),
            title: "T".to_string(),
        };
        let deleted = ServerEvent::DocumentDeleted { id: "1".to_string() };
        assert_eq!(added.to_sse_parts().0, "document_added");
        assert_eq!(deleted.to_sse_parts().0, "document_deleted");
    }
}
