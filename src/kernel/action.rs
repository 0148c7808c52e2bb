use serde_json::Value;

use super::document::{CanvasContent, CodeContent, Language};
use super::ids::DocumentId;
use super::state::{EditorTheme, Workspace};

#[derive(Debug, Clone)]
pub enum Action {
    /// `None` name picks the next `untitled{n}` name; `None` language reuses
    /// the active file's language.
    AddCode {
        name: Option<String>,
        language: Option<Language>,
    },
    SelectCode(DocumentId),
    RenameCode {
        id: DocumentId,
        name: String,
    },
    SetCodeLanguage {
        id: DocumentId,
        language: Language,
    },
    DeleteCode(DocumentId),
    CommitCode {
        id: DocumentId,
        content: CodeContent,
    },
    AddCanvas {
        name: Option<String>,
    },
    SelectCanvas(DocumentId),
    RenameCanvas {
        id: DocumentId,
        name: String,
    },
    DeleteCanvas(DocumentId),
    CommitCanvas {
        id: DocumentId,
        content: CanvasContent,
    },
    SetLibrary(Vec<Value>),
    SetEditorTheme(EditorTheme),
    ZoomIn,
    ZoomOut,
    SetUi {
        key: String,
        value: Value,
    },
    Replace(Box<Workspace>),
}

impl Action {
    /// Content commits coming from the debouncer. Everything else may move the
    /// active selection and must be preceded by a flush.
    pub fn is_commit(&self) -> bool {
        matches!(self, Action::CommitCode { .. } | Action::CommitCanvas { .. })
    }
}
