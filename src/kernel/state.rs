use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::collection::{Collection, StoredCollection};
use super::document::{CanvasContent, CodeContent, Document, DocumentKind, Language, WELCOME_CODE};
use super::ids::DocumentId;

/// Shape generation written by this crate. Data without a `version` field is
/// sniffed by structure, see `persist::migrate`.
pub const WORKSPACE_VERSION: u32 = 2;

pub const MIN_FONT_SIZE: u8 = 10;
pub const MAX_FONT_SIZE: u8 = 32;
pub const FONT_SIZE_STEP: u8 = 2;
pub const DEFAULT_FONT_SIZE: u8 = 14;

/// Top-level keys owned by the workspace and session serializers. UI state
/// under these names is never written and is dropped on read.
pub const RESERVED_UI_KEYS: [&str; 7] = [
    "version",
    "codeEditor",
    "drawing",
    "id",
    "name",
    "createdAt",
    "updatedAt",
];

pub fn is_reserved_ui_key(key: &str) -> bool {
    RESERVED_UI_KEYS.contains(&key)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditorTheme {
    #[default]
    #[serde(rename = "vs-dark")]
    Dark,
    #[serde(rename = "light")]
    Light,
    #[serde(rename = "hc-black")]
    HighContrast,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EditorPrefs {
    pub theme: EditorTheme,
    pub font_size: u8,
}

impl Default for EditorPrefs {
    fn default() -> Self {
        Self {
            theme: EditorTheme::default(),
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

impl EditorPrefs {
    pub fn zoom_in(&mut self) -> bool {
        self.set_font_size(self.font_size.saturating_add(FONT_SIZE_STEP))
    }

    pub fn zoom_out(&mut self) -> bool {
        self.set_font_size(self.font_size.saturating_sub(FONT_SIZE_STEP))
    }

    pub fn set_font_size(&mut self, size: u8) -> bool {
        let size = size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        let changed = size != self.font_size;
        self.font_size = size;
        changed
    }
}

/// Code documents plus the editor preferences shared by all of them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CodeFiles {
    pub files: Collection<CodeContent>,
    pub prefs: EditorPrefs,
}

impl CodeFiles {
    /// Next `untitled{n}` name for `language`.
    pub fn untitled_name(&self, language: Language) -> String {
        let n = self
            .files
            .documents()
            .iter()
            .filter(|d| d.name.starts_with("untitled"))
            .count()
            + 1;
        format!("untitled{n}{}", language.extension())
    }
}

/// Canvas documents plus the asset library shared by all of them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Canvases {
    pub files: Collection<CanvasContent>,
    pub library: Vec<Value>,
}

impl Canvases {
    pub fn next_name(&self) -> String {
        format!("Canvas{}", self.files.len() + 1)
    }

    /// Lifecycle guard: the canvas collection is never observed empty.
    /// Returns the id of the document created to fill the gap.
    pub fn heal(&mut self) -> Option<DocumentId> {
        if !self.files.is_empty() {
            return None;
        }
        let id = self.files.add(self.next_name(), CanvasContent::default());
        tracing::debug!(%id, "canvas collection was empty, created replacement");
        Some(id)
    }
}

/// Everything the studio persists: both collections plus UI state this crate
/// does not interpret (layout mode, timer, tracker progress, credentials).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Workspace {
    pub code: CodeFiles,
    pub canvas: Canvases,
    pub ui: Map<String, Value>,
}

impl Workspace {
    /// A first-run workspace: one welcome code file and one empty canvas.
    pub fn new() -> Self {
        let mut workspace = Self::default();
        workspace
            .code
            .files
            .add("main.js", CodeContent::new(WELCOME_CODE, Language::JavaScript));
        workspace.canvas.heal();
        workspace
    }

    pub fn active_id(&self, kind: DocumentKind) -> Option<DocumentId> {
        match kind {
            DocumentKind::Code => self.code.files.active_id(),
            DocumentKind::Canvas => self.canvas.files.active_id(),
        }
    }

    pub fn contains(&self, kind: DocumentKind, id: DocumentId) -> bool {
        match kind {
            DocumentKind::Code => self.code.files.contains(id),
            DocumentKind::Canvas => self.canvas.files.contains(id),
        }
    }

    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CollectionRef<'a, C> {
    files: &'a [Document<C>],
    current_file_id: Option<DocumentId>,
    next_id: u64,
}

impl<'a, C> CollectionRef<'a, C> {
    fn new(collection: &'a Collection<C>) -> Self {
        Self {
            files: collection.documents(),
            current_file_id: collection.active_id(),
            next_id: collection.next_id(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CodeFilesRef<'a> {
    #[serde(flatten)]
    collection: CollectionRef<'a, CodeContent>,
    theme: EditorTheme,
    font_size: u8,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CanvasesRef<'a> {
    #[serde(flatten)]
    collection: CollectionRef<'a, CanvasContent>,
    library_items: &'a [Value],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WorkspaceRef<'a> {
    version: u32,
    code_editor: CodeFilesRef<'a>,
    drawing: CanvasesRef<'a>,
    #[serde(flatten)]
    ui: UiRef<'a>,
}

struct UiRef<'a>(&'a Map<String, Value>);

impl Serialize for UiRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().filter(|(key, _)| !is_reserved_ui_key(key)))
    }
}

/// Read a field best effort: a value of the wrong shape becomes the default
/// instead of failing the whole workspace.
fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let raw = Value::deserialize(deserializer)?;
    match serde_json::from_value(raw) {
        Ok(value) => Ok(value),
        Err(e) => {
            tracing::debug!(error = %e, "ignoring malformed workspace field");
            Ok(T::default())
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredCodeFiles {
    #[serde(flatten)]
    collection: StoredCollection<CodeContent>,
    #[serde(default, deserialize_with = "or_default")]
    theme: EditorTheme,
    #[serde(default, deserialize_with = "or_default")]
    font_size: Option<f64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredCanvases {
    #[serde(flatten)]
    collection: StoredCollection<CanvasContent>,
    #[serde(default)]
    library_items: Vec<Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredWorkspace {
    #[serde(default)]
    #[allow(dead_code)]
    version: Option<u32>,
    code_editor: Option<StoredCodeFiles>,
    drawing: Option<StoredCanvases>,
    #[serde(flatten)]
    ui: Map<String, Value>,
}

impl Serialize for Workspace {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WorkspaceRef {
            version: WORKSPACE_VERSION,
            code_editor: CodeFilesRef {
                collection: CollectionRef::new(&self.code.files),
                theme: self.code.prefs.theme,
                font_size: self.code.prefs.font_size,
            },
            drawing: CanvasesRef {
                collection: CollectionRef::new(&self.canvas.files),
                library_items: &self.canvas.library,
            },
            ui: UiRef(&self.ui),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Workspace {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let stored = StoredWorkspace::deserialize(deserializer)?;

        let code = match stored.code_editor {
            Some(code) => CodeFiles {
                files: code.collection.into(),
                prefs: EditorPrefs {
                    theme: code.theme,
                    font_size: code
                        .font_size
                        .filter(|size| size.is_finite())
                        .map(|size| {
                            size.round()
                                .clamp(f64::from(MIN_FONT_SIZE), f64::from(MAX_FONT_SIZE))
                                as u8
                        })
                        .unwrap_or(DEFAULT_FONT_SIZE),
                },
            },
            None => CodeFiles::default(),
        };
        let mut canvas = match stored.drawing {
            Some(drawing) => Canvases {
                files: drawing.collection.into(),
                library: drawing.library_items,
            },
            None => Canvases::default(),
        };
        canvas.heal();

        let ui = stored
            .ui
            .into_iter()
            .filter(|(key, _)| {
                let reserved = is_reserved_ui_key(key);
                if reserved {
                    tracing::debug!(%key, "dropping reserved ui key");
                }
                !reserved
            })
            .collect();

        Ok(Workspace { code, canvas, ui })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/state.rs"]
mod tests;
