//! Async driver that runs a [`Reader`] and pushes its saves to a progress store
//!
//! All transitions run on one task, one command at a time. The task sleeps until
//! the debounce deadline alongside the command channel; when a debounced or
//! immediate save comes due it is written on a detached task. Failed writes are
//! logged and dropped: the reading position is never rolled back.

use crate::config::EngineConfig;
use crate::controller::SaveRequest;
use crate::error::{NavigationError, PagemarkError, Result};
use crate::reader::Reader;
use crate::store::{read_progress_or_default, ProgressStore};
use crate::types::{Chapter, Document, PageMetrics, ProgressDisplay, ReadingPosition};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use uuid::Uuid;

/// Writes save requests for one document without blocking navigation
#[derive(Clone)]
pub struct ProgressWriter {
    store: Arc<dyn ProgressStore>,
    document_id: Uuid,
}

impl ProgressWriter {
    pub fn new(store: Arc<dyn ProgressStore>, document_id: Uuid) -> Self {
        Self { store, document_id }
    }

    /// Send a save on its own task; the handle may be ignored
    pub fn dispatch(&self, request: SaveRequest) -> JoinHandle<()> {
        let store = Arc::clone(&self.store);
        let document_id = self.document_id;
        tokio::spawn(async move {
            match store.write_progress(document_id, request.progress).await {
                Ok(()) => tracing::debug!(
                    %document_id,
                    percent = request.progress.percent(),
                    trigger = ?request.trigger,
                    "progress saved"
                ),
                Err(e) => tracing::warn!(
                    %document_id,
                    percent = request.progress.percent(),
                    trigger = ?request.trigger,
                    "failed to save progress: {}",
                    e
                ),
            }
        })
    }
}

/// Owned copy of the reader state, for callers outside the session task
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub position: ReadingPosition,
    pub total_pages: usize,
    pub content: String,
    pub current_chapter: Option<Chapter>,
    pub progress: ProgressDisplay,
}

impl SessionSnapshot {
    fn of(reader: &Reader) -> Self {
        let view = reader.view();
        Self {
            position: reader.controller().position(),
            total_pages: view.total_pages,
            content: view.content.to_string(),
            current_chapter: view.current_chapter.cloned(),
            progress: view.progress,
        }
    }
}

enum Command {
    GoToPage(i64),
    NextPage,
    PrevPage,
    JumpToChapter(usize, oneshot::Sender<std::result::Result<(), NavigationError>>),
    ClearSelection,
    Resize(PageMetrics),
    PageHide,
    Snapshot(oneshot::Sender<SessionSnapshot>),
    Close(oneshot::Sender<()>),
}

/// Handle to a running reading session
pub struct SessionHandle {
    tx: mpsc::Sender<Command>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    async fn send(&self, command: Command) -> Result<()> {
        self.tx
            .send(command)
            .await
            .map_err(|_| PagemarkError::from(NavigationError::SessionClosed))
    }

    pub async fn go_to_page(&self, page: i64) -> Result<()> {
        self.send(Command::GoToPage(page)).await
    }

    pub async fn next_page(&self) -> Result<()> {
        self.send(Command::NextPage).await
    }

    pub async fn prev_page(&self) -> Result<()> {
        self.send(Command::PrevPage).await
    }

    pub async fn jump_to_chapter(&self, index: usize) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::JumpToChapter(index, reply)).await?;
        rx.await
            .map_err(|_| PagemarkError::from(NavigationError::SessionClosed))?
            .map_err(PagemarkError::from)
    }

    pub async fn clear_chapter_selection(&self) -> Result<()> {
        self.send(Command::ClearSelection).await
    }

    pub async fn resize(&self, metrics: PageMetrics) -> Result<()> {
        self.send(Command::Resize(metrics)).await
    }

    /// Flush progress now because the host page is going away
    pub async fn page_hide(&self) -> Result<()> {
        self.send(Command::PageHide).await
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Snapshot(reply)).await?;
        rx.await
            .map_err(|_| PagemarkError::from(NavigationError::SessionClosed))
    }

    /// Tear the session down, flushing the current progress before returning
    pub async fn close(self) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Close(reply)).await?;
        let _ = rx.await;
        let _ = self.task.await;
        Ok(())
    }
}

/// Start a session task for `reader`
pub fn spawn_session(reader: Reader, store: Arc<dyn ProgressStore>) -> SessionHandle {
    let writer = ProgressWriter::new(store, reader.document().id);
    let (tx, rx) = mpsc::channel(64);
    let task = tokio::spawn(run(reader, writer, rx));
    SessionHandle { tx, task }
}

/// Build a reader, restore it from the store, and start its session
pub async fn open_session(
    document: Document,
    metrics: PageMetrics,
    store: Arc<dyn ProgressStore>,
    config: &EngineConfig,
) -> SessionHandle {
    let saved = read_progress_or_default(store.as_ref(), document.id).await;
    let mut reader = Reader::new(document, metrics, config);
    reader.restore_initial_position(saved);
    spawn_session(reader, store)
}

async fn sleep_until_due(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

async fn run(mut reader: Reader, writer: ProgressWriter, mut rx: mpsc::Receiver<Command>) {
    loop {
        let deadline = reader.save_deadline();
        let command = tokio::select! {
            command = rx.recv() => command,
            _ = sleep_until_due(deadline) => {
                if let Some(request) = reader.poll_save(Instant::now()) {
                    writer.dispatch(request);
                }
                continue;
            }
        };

        let Some(command) = command else {
            // Every handle is gone: treat as teardown
            flush_on_close(&mut reader, &writer).await;
            break;
        };

        let now = Instant::now();
        match command {
            Command::GoToPage(page) => log_navigation(reader.go_to_page(page, now)),
            Command::NextPage => log_navigation(reader.next_page(now)),
            Command::PrevPage => log_navigation(reader.prev_page(now)),
            Command::JumpToChapter(index, reply) => {
                let result = reader.jump_to_chapter(index, now).map(|request| {
                    writer.dispatch(request);
                });
                let _ = reply.send(result);
            }
            Command::ClearSelection => reader.clear_chapter_selection(),
            Command::Resize(metrics) => {
                reader.resize(metrics);
            }
            Command::PageHide => {
                if let Some(request) = reader.page_hide() {
                    writer.dispatch(request);
                }
            }
            Command::Snapshot(reply) => {
                let _ = reply.send(SessionSnapshot::of(&reader));
            }
            Command::Close(reply) => {
                flush_on_close(&mut reader, &writer).await;
                let _ = reply.send(());
                break;
            }
        }
    }
}

async fn flush_on_close(reader: &mut Reader, writer: &ProgressWriter) {
    if let Some(request) = reader.teardown() {
        let _ = writer.dispatch(request).await;
    }
}

fn log_navigation(result: std::result::Result<bool, NavigationError>) {
    if let Err(e) = result {
        tracing::warn!("navigation rejected: {}", e);
    }
}
