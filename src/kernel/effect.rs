use super::document::DocumentKind;
use super::ids::DocumentId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// The workspace changed and should reach the blob store.
    Persist,
    /// The active document of `kind` is now `id` (or its presentation changed)
    /// and the attached surface must be restored from the store.
    Restore { kind: DocumentKind, id: DocumentId },
}
