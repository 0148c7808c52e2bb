use super::Workbench;
use crate::kernel::Action;
use std::time::Instant;

impl Workbench {
    /// Run everything whose deadline has passed (called by the event loop).
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        changed |= self.poll_code_saves(now);
        changed |= self.poll_canvas_saves(now);
        changed |= self.poll_settle(now);
        changed
    }

    /// Earliest instant at which `tick` has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.code_saves.next_deadline(),
            self.canvas_saves.next_deadline(),
            self.text_restore.next_deadline(),
            self.canvas_restore.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    fn poll_code_saves(&mut self, now: Instant) -> bool {
        let mut changed = false;
        for due in self.code_saves.take_due(now) {
            let waited = now.saturating_duration_since(due.scheduled_at);
            tracing::debug!(
                document = %due.document_id,
                waited_ms = waited.as_millis() as u64,
                "committing debounced code save"
            );
            changed |= self.dispatch_kernel(
                Action::CommitCode {
                    id: due.document_id,
                    content: due.content,
                },
                now,
            );
        }
        changed
    }

    fn poll_canvas_saves(&mut self, now: Instant) -> bool {
        let mut changed = false;
        for due in self.canvas_saves.take_due(now) {
            let waited = now.saturating_duration_since(due.scheduled_at);
            tracing::debug!(
                document = %due.document_id,
                waited_ms = waited.as_millis() as u64,
                "committing debounced canvas save"
            );
            changed |= self.dispatch_kernel(
                Action::CommitCanvas {
                    id: due.document_id,
                    content: due.content,
                },
                now,
            );
        }
        changed
    }

    fn poll_settle(&mut self, now: Instant) -> bool {
        let mut changed = false;
        changed |= self.text_restore.poll_settle(now);
        changed |= self.canvas_restore.poll_settle(now);
        changed
    }
}
