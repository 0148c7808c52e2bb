use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::ids::DocumentId;

pub const WELCOME_CODE: &str = "// Welcome to DSA Teaching Studio\n// Start coding here...\n";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Code,
    Canvas,
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentKind::Code => f.write_str("code"),
            DocumentKind::Canvas => f.write_str("canvas"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    JavaScript,
    Python,
    Cpp,
    Java,
    #[serde(other)]
    Plaintext,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::JavaScript,
        Language::Python,
        Language::Cpp,
        Language::Java,
    ];

    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Language::JavaScript => &[".js", ".jsx", ".mjs"],
            Language::Python => &[".py", ".pyw", ".pyi"],
            Language::Cpp => &[".cpp", ".cxx", ".cc", ".c++"],
            Language::Java => &[".java"],
            Language::Plaintext => &[".txt"],
        }
    }

    /// Primary extension, including the leading dot.
    pub fn extension(self) -> &'static str {
        self.extensions()[0]
    }

    pub fn tag(self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::Python => "python",
            Language::Cpp => "cpp",
            Language::Java => "java",
            Language::Plaintext => "plaintext",
        }
    }

    /// Guess the language from a file name suffix. Names without a usable
    /// suffix and unknown suffixes fall back to JavaScript.
    pub fn from_file_name(name: &str) -> Language {
        let Some(ext) = file_extension(name) else {
            return Language::JavaScript;
        };
        Language::ALL
            .into_iter()
            .find(|lang| lang.extensions().contains(&ext))
            .unwrap_or(Language::JavaScript)
    }
}

/// Suffix starting at the last dot. A leading dot (".env") is not a suffix.
pub fn file_extension(name: &str) -> Option<&str> {
    match name.rfind('.') {
        None | Some(0) => None,
        Some(idx) => Some(&name[idx..]),
    }
}

/// Replace the suffix of `name` with `ext`; names without a suffix are kept.
pub fn with_extension(name: &str, ext: &str) -> String {
    match name.rfind('.') {
        None | Some(0) => name.to_string(),
        Some(idx) => format!("{}{}", &name[..idx], ext),
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeContent {
    #[serde(rename = "code", default)]
    pub text: String,
    #[serde(default)]
    pub language: Language,
}

impl CodeContent {
    pub fn new(text: impl Into<String>, language: Language) -> Self {
        Self {
            text: text.into(),
            language,
        }
    }
}

/// Style and viewport record of a canvas. Keys this crate does not know about
/// are carried through untouched. Known keys holding a value of the wrong
/// shape keep their default.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub view_background_color: String,
    pub current_item_stroke_color: String,
    pub current_item_background_color: String,
    pub current_item_fill_style: String,
    pub current_item_stroke_width: f64,
    pub current_item_roughness: f64,
    pub current_item_opacity: f64,
    pub scroll_x: f64,
    pub scroll_y: f64,
    pub zoom: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            view_background_color: "#ffffff".to_string(),
            current_item_stroke_color: "#000000".to_string(),
            current_item_background_color: "#ffffff".to_string(),
            current_item_fill_style: "solid".to_string(),
            current_item_stroke_width: 2.0,
            current_item_roughness: 1.0,
            current_item_opacity: 100.0,
            scroll_x: 0.0,
            scroll_y: 0.0,
            zoom: 1.0,
            extra: Map::new(),
        }
    }
}

impl<'de> Deserialize<'de> for ViewState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = Map::<String, Value>::deserialize(deserializer)?;
        let mut view = ViewState::default();

        take_text(&mut fields, "viewBackgroundColor", &mut view.view_background_color);
        take_text(&mut fields, "currentItemStrokeColor", &mut view.current_item_stroke_color);
        take_text(
            &mut fields,
            "currentItemBackgroundColor",
            &mut view.current_item_background_color,
        );
        take_text(&mut fields, "currentItemFillStyle", &mut view.current_item_fill_style);
        take_number(&mut fields, "currentItemStrokeWidth", &mut view.current_item_stroke_width);
        take_number(&mut fields, "currentItemRoughness", &mut view.current_item_roughness);
        take_number(&mut fields, "currentItemOpacity", &mut view.current_item_opacity);
        take_number(&mut fields, "scrollX", &mut view.scroll_x);
        take_number(&mut fields, "scrollY", &mut view.scroll_y);
        take_number(&mut fields, "zoom", &mut view.zoom);

        view.extra = fields;
        Ok(view)
    }
}

fn take_text(fields: &mut Map<String, Value>, key: &str, slot: &mut String) {
    match fields.remove(key) {
        None => {}
        Some(Value::String(text)) => *slot = text,
        Some(other) => tracing::debug!(key, value = %other, "ignoring malformed view field"),
    }
}

fn take_number(fields: &mut Map<String, Value>, key: &str, slot: &mut f64) {
    let Some(raw) = fields.remove(key) else {
        return;
    };
    // Excalidraw writes zoom as `{ "value": n }`.
    let number = match &raw {
        Value::Object(inner) => inner.get("value").and_then(Value::as_f64),
        other => other.as_f64(),
    };
    match number {
        Some(n) if n.is_finite() => *slot = n,
        _ => tracing::debug!(key, value = %raw, "ignoring malformed view field"),
    }
}

/// Asset map read entry by entry; malformed assets are dropped.
fn lenient_assets<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, Asset>, D::Error> {
    let raw = Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|(key, value)| match serde_json::from_value::<Asset>(value) {
            Ok(asset) => Some((key, asset)),
            Err(e) => {
                tracing::debug!(%key, error = %e, "dropping malformed asset");
                None
            }
        })
        .collect())
}

/// An embedded binary (usually an image) stored as a data URL.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(rename = "dataURL")]
    pub data_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
}

impl Asset {
    pub fn is_well_formed(&self) -> bool {
        !self.id.is_empty() && self.data_url.starts_with("data:")
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasContent {
    #[serde(rename = "elements", default)]
    pub shapes: Vec<Value>,
    #[serde(rename = "appState", default)]
    pub view: ViewState,
    #[serde(default, deserialize_with = "lenient_assets")]
    pub assets: BTreeMap<String, Asset>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document<C> {
    pub id: DocumentId,
    pub name: String,
    #[serde(flatten)]
    pub content: C,
}

pub type CodeDocument = Document<CodeContent>;
pub type CanvasDocument = Document<CanvasContent>;
