//! The sync engine: owns the store, both debouncers, both surface
//! attachments and the persistence codec, and exposes the entry points the
//! surrounding UI calls.
//!
//! Every entry point takes the current `Instant`; nothing in here reads the
//! clock itself, so the host decides what time it is (wall clock, or tokio's
//! paused clock in tests).

use crate::kernel::persist::{PersistError, PersistenceCodec, SessionArchive, Snapshot};
use crate::kernel::services::ports::{BlobStore, CanvasSurface, SyncConfig, TextSurface};
use crate::kernel::sync::{Debouncer, Restorer};
use crate::kernel::{CanvasContent, CodeContent, DocumentKind, Store, Workspace};

mod bridge;
mod interaction;
mod tick;

pub struct Workbench {
    store: Store,
    config: SyncConfig,
    blobs: Box<dyn BlobStore>,
    codec: PersistenceCodec,
    archive: SessionArchive,
    session: Option<Snapshot>,
    code_saves: Debouncer<CodeContent>,
    canvas_saves: Debouncer<CanvasContent>,
    text_restore: Restorer,
    canvas_restore: Restorer,
    text_surface: Option<Box<dyn TextSurface>>,
    canvas_surface: Option<Box<dyn CanvasSurface>>,
    last_persist_error: Option<PersistError>,
}

impl Workbench {
    pub fn new(workspace: Workspace, config: SyncConfig, blobs: Box<dyn BlobStore>) -> Self {
        Self {
            store: Store::new(workspace),
            codec: PersistenceCodec::new(config.storage_key.clone()),
            archive: SessionArchive::new(config.archive_key.clone()),
            session: None,
            code_saves: Debouncer::new(config.debounce_delay()),
            canvas_saves: Debouncer::new(config.debounce_delay()),
            text_restore: Restorer::new(DocumentKind::Code, config.settle_delay()),
            canvas_restore: Restorer::new(DocumentKind::Canvas, config.settle_delay()),
            text_surface: None,
            canvas_surface: None,
            last_persist_error: None,
            config,
            blobs,
        }
    }

    /// Start from whatever the blob store holds, or a fresh workspace when
    /// nothing usable is stored. Only a failing blob store is an error.
    pub fn open(config: SyncConfig, blobs: Box<dyn BlobStore>) -> Result<Self, PersistError> {
        let mut codec = PersistenceCodec::new(config.storage_key.clone());
        let workspace = match codec.load(&*blobs)? {
            Some(workspace) => {
                tracing::info!(
                    code_files = workspace.code.files.len(),
                    canvases = workspace.canvas.files.len(),
                    "restored persisted workspace"
                );
                workspace
            }
            None => {
                tracing::info!("no persisted workspace, starting fresh");
                Workspace::new()
            }
        };
        let mut workbench = Self::new(workspace, config, blobs);
        workbench.codec = codec;
        Ok(workbench)
    }

    pub fn workspace(&self) -> &Workspace {
        self.store.state()
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn code_saves(&self) -> &Debouncer<CodeContent> {
        &self.code_saves
    }

    pub fn canvas_saves(&self) -> &Debouncer<CanvasContent> {
        &self.canvas_saves
    }

    pub fn text_restore(&self) -> &Restorer {
        &self.text_restore
    }

    pub fn canvas_restore(&self) -> &Restorer {
        &self.canvas_restore
    }

    /// The error of the most recent automatic persist, cleared by the next
    /// successful one.
    pub fn last_persist_error(&self) -> Option<&PersistError> {
        self.last_persist_error.as_ref()
    }

    pub fn session(&self) -> Option<&Snapshot> {
        self.session.as_ref()
    }
}
