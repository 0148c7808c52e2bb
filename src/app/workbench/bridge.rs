use super::Workbench;
use crate::kernel::sync::RestoreStep;
use crate::kernel::{Action, DocumentId, DocumentKind, Effect};
use std::time::Instant;

impl Workbench {
    /// Reduce `action` and run its effects. Callers that may move the active
    /// selection go through `dispatch`, which flushes first.
    pub(super) fn dispatch_kernel(&mut self, action: Action, now: Instant) -> bool {
        let result = self.store.dispatch(action);
        let mut persist = false;
        for effect in result.effects {
            match effect {
                Effect::Persist => persist = true,
                Effect::Restore { kind, id } => self.begin_restore(kind, id, now),
            }
        }
        if persist {
            self.persist();
        }
        result.state_changed
    }

    fn persist(&mut self) {
        match self.codec.save(&mut *self.blobs, self.store.state()) {
            Ok(_) => self.last_persist_error = None,
            Err(e) => self.last_persist_error = Some(e),
        }
    }

    /// Commit every pending save to the document it was captured for.
    pub(super) fn flush_pending(&mut self, now: Instant) -> bool {
        let mut changed = false;
        for pending in self.code_saves.drain() {
            tracing::debug!(document = %pending.document_id, "flushing code save");
            changed |= self.dispatch_kernel(
                Action::CommitCode {
                    id: pending.document_id,
                    content: pending.content,
                },
                now,
            );
        }
        for pending in self.canvas_saves.drain() {
            tracing::debug!(document = %pending.document_id, "flushing canvas save");
            changed |= self.dispatch_kernel(
                Action::CommitCanvas {
                    id: pending.document_id,
                    content: pending.content,
                },
                now,
            );
        }
        changed
    }

    pub(super) fn begin_restore(&mut self, kind: DocumentKind, id: DocumentId, now: Instant) {
        match kind {
            DocumentKind::Code => {
                if self
                    .text_restore
                    .begin(id, [RestoreStep::PushText])
                    .is_some()
                {
                    self.pump_text_restore(now);
                }
            }
            DocumentKind::Canvas => {
                let Some(doc) = self.store.state().canvas.files.get(id) else {
                    return;
                };
                let mut steps = vec![RestoreStep::PushShapes];
                steps.extend(doc.content.assets.keys().cloned().map(RestoreStep::RegisterAsset));
                steps.push(RestoreStep::RestoreView);
                if self.canvas_restore.begin(id, steps).is_some() {
                    self.pump_canvas_restore(now);
                }
            }
        }
    }

    pub(super) fn pump_text_restore(&mut self, now: Instant) {
        let active = self.store.state().code.files.active_id();
        while let Some((token, step)) = self.text_restore.next_step(active) {
            let (Some(surface), Some(doc)) = (
                self.text_surface.as_mut(),
                self.store.state().code.files.get(token.target),
            ) else {
                continue;
            };
            match step {
                RestoreStep::PushText => {
                    if let Err(e) = surface.push(&doc.content.text, doc.content.language) {
                        tracing::warn!(document = %token.target, error = %e, "text push failed");
                    }
                }
                other => {
                    tracing::debug!(step = ?other, "step does not apply to a text surface");
                }
            }
        }
        self.text_restore.pushes_done(now);
    }

    pub(super) fn pump_canvas_restore(&mut self, now: Instant) {
        let active = self.store.state().canvas.files.active_id();
        while let Some((token, step)) = self.canvas_restore.next_step(active) {
            let (Some(surface), Some(doc)) = (
                self.canvas_surface.as_mut(),
                self.store.state().canvas.files.get(token.target),
            ) else {
                continue;
            };
            let result = match &step {
                RestoreStep::PushShapes => surface.push_shapes(&doc.content.shapes),
                RestoreStep::RegisterAsset(asset_id) => match doc.content.assets.get(asset_id) {
                    Some(asset) => surface.register_asset(asset),
                    None => Ok(()),
                },
                RestoreStep::RestoreView => surface.restore_view(&doc.content.view),
                RestoreStep::PushText => Ok(()),
            };
            if let Err(e) = result {
                tracing::warn!(
                    document = %token.target,
                    step = ?step,
                    error = %e,
                    "canvas restore step failed, continuing"
                );
            }
        }
        self.canvas_restore.pushes_done(now);
    }
}
