//! Ordered, id-addressed document list with a single active selection.
//!
//! Every operation is total: an id that is not a member turns the call into a
//! no-op and the return value reports whether anything changed.

use serde::Deserialize;

use super::document::Document;
use super::ids::{DocumentId, IdAllocator};

#[derive(Clone, Debug, PartialEq)]
pub struct Collection<C> {
    documents: Vec<Document<C>>,
    active: Option<DocumentId>,
    ids: IdAllocator,
}

impl<C> Default for Collection<C> {
    fn default() -> Self {
        Self {
            documents: Vec::new(),
            active: None,
            ids: IdAllocator::default(),
        }
    }
}

impl<C> Collection<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from stored parts. Duplicate ids keep their first occurrence,
    /// a dangling active id falls back to the first document and the id
    /// counter is raised past every loaded id.
    pub fn from_parts(
        documents: Vec<Document<C>>,
        active: Option<DocumentId>,
        next_id: Option<u64>,
    ) -> Self {
        let mut ids = IdAllocator::starting_at(next_id.unwrap_or(1).max(1));
        let mut kept: Vec<Document<C>> = Vec::with_capacity(documents.len());
        for doc in documents {
            if kept.iter().any(|d| d.id == doc.id) {
                tracing::warn!(id = %doc.id, "dropping document with duplicate id");
                continue;
            }
            ids.observe(doc.id);
            kept.push(doc);
        }

        let active = active
            .filter(|id| kept.iter().any(|d| d.id == *id))
            .or_else(|| kept.first().map(|d| d.id));

        Self {
            documents: kept,
            active,
            ids,
        }
    }

    pub fn documents(&self) -> &[Document<C>] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn active_id(&self) -> Option<DocumentId> {
        self.active
    }

    pub fn next_id(&self) -> u64 {
        self.ids.peek()
    }

    pub fn contains(&self, id: DocumentId) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: DocumentId) -> Option<&Document<C>> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn get_mut(&mut self, id: DocumentId) -> Option<&mut Document<C>> {
        self.documents.iter_mut().find(|d| d.id == id)
    }

    pub fn active(&self) -> Option<&Document<C>> {
        self.active.and_then(|id| self.get(id))
    }

    fn position(&self, id: DocumentId) -> Option<usize> {
        self.documents.iter().position(|d| d.id == id)
    }

    /// Append a document with a fresh id and make it active.
    pub fn add(&mut self, name: impl Into<String>, content: C) -> DocumentId {
        let id = self.ids.next_id();
        self.documents.push(Document {
            id,
            name: name.into(),
            content,
        });
        self.active = Some(id);
        id
    }

    pub fn select(&mut self, id: DocumentId) -> bool {
        if self.active == Some(id) || !self.contains(id) {
            return false;
        }
        self.active = Some(id);
        true
    }

    pub fn rename(&mut self, id: DocumentId, name: impl Into<String>) -> bool {
        let name = name.into();
        let Some(doc) = self.get_mut(id) else {
            return false;
        };
        if doc.name == name {
            return false;
        }
        doc.name = name;
        true
    }

    /// Remove `id`. When it was active, the first survivor becomes active, or
    /// nothing when the collection is now empty.
    pub fn remove(&mut self, id: DocumentId) -> bool {
        let Some(idx) = self.position(id) else {
            return false;
        };
        self.documents.remove(idx);
        if self.active == Some(id) {
            self.active = self.documents.first().map(|d| d.id);
        }
        true
    }
}

impl<C: PartialEq> Collection<C> {
    /// Replace the content payload of `id`.
    pub fn mutate(&mut self, id: DocumentId, content: C) -> bool {
        let Some(doc) = self.get_mut(id) else {
            return false;
        };
        if doc.content == content {
            return false;
        }
        doc.content = content;
        true
    }
}

/// On-disk form of a collection: `{ "files": [...], "currentFileId": ..,
/// "nextId": .. }`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StoredCollection<C> {
    #[serde(default = "Vec::new")]
    pub files: Vec<Document<C>>,
    #[serde(default)]
    pub current_file_id: Option<DocumentId>,
    #[serde(default)]
    pub next_id: Option<u64>,
}

impl<C> From<StoredCollection<C>> for Collection<C> {
    fn from(stored: StoredCollection<C>) -> Self {
        Collection::from_parts(stored.files, stored.current_file_id, stored.next_id)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/collection.rs"]
mod tests;
