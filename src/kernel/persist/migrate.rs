//! Forward migration of stored workspace shapes.
//!
//! Data stamped with the current `version` is returned untouched. Unstamped
//! data predates the field and is recognised by structure:
//!
//! - a drawing holding `elements` directly instead of a `files` array is a
//!   single flat canvas, wrapped into a one-document collection;
//! - a code editor without documents but with a `code` string is a single
//!   flat buffer, wrapped into one `main{ext}` document;
//! - canvas documents carrying an excalidraw-style `files` map get it moved
//!   to `assets`.
//!
//! Every rule only fires on the legacy shape, so running the migration on its
//! own output changes nothing.

use serde_json::{json, Map, Value};

use crate::kernel::document::Language;
use crate::kernel::state::WORKSPACE_VERSION;

const LEGACY_DOCUMENT_ID: &str = "1";
const LEGACY_CANVAS_NAME: &str = "Canvas1";

pub fn migrate(value: Value) -> Value {
    let Value::Object(mut root) = value else {
        return value;
    };

    match root.get("version").and_then(Value::as_u64) {
        Some(version) if version == u64::from(WORKSPACE_VERSION) => {
            return Value::Object(root);
        }
        Some(version) if version > u64::from(WORKSPACE_VERSION) => {
            tracing::warn!(
                version,
                current = WORKSPACE_VERSION,
                "workspace written by a newer version, reading it as current"
            );
            return Value::Object(root);
        }
        _ => {}
    }

    let mut upgraded = false;
    if let Some(Value::Object(drawing)) = root.get_mut("drawing") {
        upgraded |= wrap_flat_canvas(drawing);
        if let Some(Value::Array(files)) = drawing.get_mut("files") {
            for doc in files.iter_mut().filter_map(Value::as_object_mut) {
                upgraded |= move_legacy_assets(doc);
            }
        }
    }
    if let Some(Value::Object(code)) = root.get_mut("codeEditor") {
        upgraded |= wrap_flat_code(code);
    }

    if upgraded {
        tracing::debug!("upgraded legacy workspace shape");
    }
    Value::Object(root)
}

fn wrap_flat_canvas(drawing: &mut Map<String, Value>) -> bool {
    if !drawing.contains_key("elements") || drawing.get("files").is_some_and(Value::is_array) {
        return false;
    }

    let elements = drawing
        .remove("elements")
        .filter(Value::is_array)
        .unwrap_or_else(|| Value::Array(Vec::new()));
    let view = drawing
        .remove("appState")
        .filter(Value::is_object)
        .unwrap_or_else(|| Value::Object(Map::new()));
    let assets = drawing
        .remove("files")
        .map(assets_from_file_map)
        .unwrap_or_default();

    drawing.insert(
        "files".to_string(),
        json!([{
            "id": LEGACY_DOCUMENT_ID,
            "name": LEGACY_CANVAS_NAME,
            "elements": elements,
            "appState": view,
            "assets": assets,
        }]),
    );
    drawing.insert("currentFileId".to_string(), json!(LEGACY_DOCUMENT_ID));
    true
}

fn move_legacy_assets(doc: &mut Map<String, Value>) -> bool {
    if doc.contains_key("assets") || !doc.get("files").is_some_and(Value::is_object) {
        return false;
    }
    let assets = doc
        .remove("files")
        .map(assets_from_file_map)
        .unwrap_or_default();
    doc.insert("assets".to_string(), Value::Object(assets));
    true
}

/// An excalidraw file map is keyed by file id; entries missing their own
/// `id` take it from the key. Non-object entries are dropped.
fn assets_from_file_map(files: Value) -> Map<String, Value> {
    let Value::Object(files) = files else {
        return Map::new();
    };
    files
        .into_iter()
        .filter_map(|(key, entry)| {
            let Value::Object(mut asset) = entry else {
                return None;
            };
            asset
                .entry("id")
                .or_insert_with(|| Value::String(key.clone()));
            Some((key, Value::Object(asset)))
        })
        .collect()
}

fn wrap_flat_code(code: &mut Map<String, Value>) -> bool {
    let has_documents = code
        .get("files")
        .and_then(Value::as_array)
        .is_some_and(|files| !files.is_empty());
    if has_documents {
        return false;
    }
    let Some(text) = code.get("code").and_then(Value::as_str).map(str::to_owned) else {
        return false;
    };
    code.remove("code");

    let language = code
        .get("language")
        .cloned()
        .and_then(|tag| serde_json::from_value::<Language>(tag).ok())
        .unwrap_or_default();
    code.insert(
        "files".to_string(),
        json!([{
            "id": LEGACY_DOCUMENT_ID,
            "name": format!("main{}", language.extension()),
            "code": text,
            "language": language,
        }]),
    );
    code.insert("currentFileId".to_string(), json!(LEGACY_DOCUMENT_ID));
    true
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/persist/migrate.rs"]
mod tests;
