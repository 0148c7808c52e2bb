use super::Workbench;
use crate::kernel::document::{Asset, ViewState};
use crate::kernel::persist::{import_snapshot, Snapshot, SnapshotError};
use crate::kernel::services::ports::{CanvasSurface, TextSurface};
use crate::kernel::{Action, CanvasContent, CodeContent, DocumentId, DocumentKind, Workspace};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Instant;

impl Workbench {
    /// Apply a user action. Anything other than a content commit may move an
    /// active selection, so pending saves are committed first.
    pub fn dispatch(&mut self, action: Action, now: Instant) -> bool {
        let mut changed = false;
        if !action.is_commit() {
            changed |= self.flush_pending(now);
        }
        changed |= self.dispatch_kernel(action, now);
        changed
    }

    pub fn add_code(&mut self, name: Option<String>, now: Instant) -> Option<DocumentId> {
        self.dispatch(
            Action::AddCode {
                name,
                language: None,
            },
            now,
        );
        self.workspace().code.files.active_id()
    }

    pub fn add_canvas(&mut self, name: Option<String>, now: Instant) -> Option<DocumentId> {
        self.dispatch(Action::AddCanvas { name }, now);
        self.workspace().canvas.files.active_id()
    }

    pub fn select(&mut self, kind: DocumentKind, id: DocumentId, now: Instant) -> bool {
        let action = match kind {
            DocumentKind::Code => Action::SelectCode(id),
            DocumentKind::Canvas => Action::SelectCanvas(id),
        };
        self.dispatch(action, now)
    }

    /// Deleting the last code file replaces it with an empty untitled one in
    /// the same language, so the editor always has a document to write to.
    pub fn delete(&mut self, kind: DocumentKind, id: DocumentId, now: Instant) -> bool {
        let action = match kind {
            DocumentKind::Code => Action::DeleteCode(id),
            DocumentKind::Canvas => Action::DeleteCanvas(id),
        };
        let language = self
            .store
            .state()
            .code
            .files
            .get(id)
            .map(|doc| doc.content.language);
        let mut changed = self.dispatch(action, now);

        if kind == DocumentKind::Code && self.store.state().code.files.is_empty() {
            tracing::debug!(deleted = %id, "last code file deleted, adding a replacement");
            changed |= self.dispatch_kernel(
                Action::AddCode {
                    name: None,
                    language,
                },
                now,
            );
        }
        changed
    }

    /// Text reported by the editor surface for the active code document.
    /// Returns whether a save was scheduled.
    pub fn on_editor_change(&mut self, text: String, now: Instant) -> bool {
        if !self.text_restore.accepts_changes() {
            tracing::debug!(phase = ?self.text_restore.phase(), "dropping editor echo");
            return false;
        }
        let Some(doc) = self.store.state().code.files.active() else {
            return false;
        };
        let id = doc.id;
        let content = CodeContent::new(text, doc.content.language);
        if doc.content == content && !self.code_saves.is_pending(id) {
            tracing::trace!(document = %id, "editor change matches stored content");
            return false;
        }
        self.code_saves.schedule(id, content, now);
        true
    }

    /// Scene reported by the canvas surface for the active canvas.
    /// Returns whether a save was scheduled.
    pub fn on_canvas_change(
        &mut self,
        shapes: Vec<Value>,
        view: ViewState,
        assets: BTreeMap<String, Asset>,
        now: Instant,
    ) -> bool {
        if !self.canvas_restore.accepts_changes() {
            tracing::debug!(phase = ?self.canvas_restore.phase(), "dropping canvas echo");
            return false;
        }
        let Some(doc) = self.store.state().canvas.files.active() else {
            return false;
        };
        let id = doc.id;
        let content = CanvasContent {
            shapes,
            view,
            assets,
        };
        if doc.content == content && !self.canvas_saves.is_pending(id) {
            tracing::trace!(document = %id, "canvas change matches stored content");
            return false;
        }
        self.canvas_saves.schedule(id, content, now);
        true
    }

    /// The asset library is shared by every canvas and committed at once.
    pub fn on_library_change(&mut self, items: Vec<Value>, now: Instant) -> bool {
        self.dispatch_kernel(Action::SetLibrary(items), now)
    }

    pub fn attach_editor(&mut self, surface: Box<dyn TextSurface>, now: Instant) {
        self.text_surface = Some(surface);
        self.text_restore.attach();
        match self.store.state().code.files.active_id() {
            Some(id) => self.begin_restore(DocumentKind::Code, id, now),
            None => self.pump_text_restore(now),
        }
    }

    pub fn attach_canvas(&mut self, surface: Box<dyn CanvasSurface>, now: Instant) {
        self.canvas_surface = Some(surface);
        self.canvas_restore.attach();
        match self.store.state().canvas.files.active_id() {
            Some(id) => self.begin_restore(DocumentKind::Canvas, id, now),
            None => self.pump_canvas_restore(now),
        }
    }

    /// Pending edits are committed before the surface goes away.
    pub fn detach_editor(&mut self, now: Instant) -> Option<Box<dyn TextSurface>> {
        self.flush_pending(now);
        self.text_restore.detach();
        self.text_surface.take()
    }

    pub fn detach_canvas(&mut self, now: Instant) -> Option<Box<dyn CanvasSurface>> {
        self.flush_pending(now);
        self.canvas_restore.detach();
        self.canvas_surface.take()
    }

    /// Commit everything pending, e.g. before shutdown.
    pub fn flush(&mut self, now: Instant) -> bool {
        self.flush_pending(now)
    }

    /// Manual save: commit pending edits, record the workspace in the
    /// current session, archive it and return the portable document.
    pub fn save(&mut self, now: Instant) -> Result<String, SnapshotError> {
        self.flush_pending(now);
        let workspace = self.store.state().clone();
        let session = self
            .session
            .get_or_insert_with(|| Snapshot::new(Workspace::default()));
        session.touch(workspace);
        if let Err(e) = self.archive.upsert(&mut *self.blobs, session) {
            tracing::warn!(error = %e, "failed to archive session");
            return Err(e);
        }
        tracing::info!(id = %session.id, "session saved");
        session.to_document()
    }

    /// Manual open: replace the workspace with the one in `document`.
    pub fn load(&mut self, document: &str, now: Instant) -> Result<(), SnapshotError> {
        let snapshot = import_snapshot(document).map_err(|e| {
            tracing::warn!(error = %e, "failed to import session");
            e
        })?;
        tracing::info!(id = %snapshot.id, name = %snapshot.name, "session loaded");
        self.dispatch(Action::Replace(Box::new(snapshot.workspace.clone())), now);
        self.session = Some(snapshot);
        Ok(())
    }

    /// Start a new session with a first-run workspace.
    pub fn new_session(&mut self, now: Instant) {
        let workspace = Workspace::new();
        self.dispatch(Action::Replace(Box::new(workspace.clone())), now);
        self.session = Some(Snapshot::new(workspace));
    }

    pub fn sessions(&self) -> Result<Vec<Snapshot>, SnapshotError> {
        self.archive.list(&*self.blobs)
    }
}
