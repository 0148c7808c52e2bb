use rustc_hash::FxHashMap;
use std::time::{Duration, Instant};

use crate::kernel::ids::DocumentId;

/// A debounced write that has not reached the collection yet.
///
/// The target id is captured when the edit arrives and never re-read later,
/// so a commit can only ever land on the document it was typed into.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingSave<T> {
    pub document_id: DocumentId,
    pub content: T,
    pub scheduled_at: Instant,
    pub deadline: Instant,
}

/// Coalesces rapid content changes into one commit per document.
///
/// At most one record exists per document: a newer edit replaces the older
/// one and pushes its deadline out. Time is supplied by the caller.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: FxHashMap<DocumentId, PendingSave<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: FxHashMap::default(),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn is_pending(&self, id: DocumentId) -> bool {
        self.pending.contains_key(&id)
    }

    pub fn pending(&self, id: DocumentId) -> Option<&PendingSave<T>> {
        self.pending.get(&id)
    }

    /// Record `content` for `id`, replacing any earlier record, and restart the
    /// window. Returns `true` when an earlier record was replaced.
    pub fn schedule(&mut self, id: DocumentId, content: T, now: Instant) -> bool {
        let record = PendingSave {
            document_id: id,
            content,
            scheduled_at: now,
            deadline: now + self.delay,
        };
        let replaced = self.pending.insert(id, record).is_some();
        tracing::trace!(document = %id, replaced, "debounced save scheduled");
        replaced
    }

    /// Take the record for `id` regardless of its deadline.
    pub fn flush(&mut self, id: DocumentId) -> Option<PendingSave<T>> {
        self.pending.remove(&id)
    }

    /// Drop the record for `id` without committing it.
    pub fn cancel(&mut self, id: DocumentId) -> bool {
        self.pending.remove(&id).is_some()
    }

    /// Remove and return every record whose deadline is at or before `now`,
    /// oldest deadline first.
    pub fn take_due(&mut self, now: Instant) -> Vec<PendingSave<T>> {
        let due: Vec<DocumentId> = self
            .pending
            .values()
            .filter(|p| p.deadline <= now)
            .map(|p| p.document_id)
            .collect();

        let mut records: Vec<PendingSave<T>> = due
            .into_iter()
            .filter_map(|id| self.pending.remove(&id))
            .collect();
        records.sort_by_key(|p| p.deadline);
        records
    }

    /// Remove every record, due or not, oldest deadline first.
    pub fn drain(&mut self) -> Vec<PendingSave<T>> {
        let mut records: Vec<PendingSave<T>> = self.pending.drain().map(|(_, p)| p).collect();
        records.sort_by_key(|p| p.deadline);
        records
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|p| p.deadline).min()
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/sync/debounce.rs"]
mod tests;
