use super::*;
use crate::kernel::document::{Asset, CanvasContent, CodeContent, Language};
use crate::kernel::state::EditorPrefs;
use crate::kernel::services::adapters::MemoryBlobStore;
use serde_json::json;

const KEY: &str = "dsa-studio-storage";

fn sample_workspace() -> Workspace {
    let mut workspace = Workspace::new();
    workspace
        .code
        .files
        .add("solve.py", CodeContent::new("print(1)\n", Language::Python));
    let canvas = workspace.canvas.files.active_id().unwrap();
    let mut content = CanvasContent {
        shapes: vec![json!({"id": "e1", "type": "ellipse", "x": 3, "y": 4})],
        ..CanvasContent::default()
    };
    content.assets.insert(
        "img-1".to_string(),
        Asset {
            id: "img-1".to_string(),
            mime_type: "image/png".to_string(),
            data_url: "data:image/png;base64,iVBORw0KGgo=".to_string(),
            created: Some(1_700_000_000_000),
        },
    );
    workspace.canvas.files.mutate(canvas, content);
    workspace.ui.insert("viewMode".to_string(), json!("split"));
    workspace
}

#[test]
fn encode_decode_preserves_value() {
    let value = json!({"a": [1, 2, 3], "b": "text"});
    let stored = encode(&value).unwrap();

    assert!(!stored.contains('{'));
    assert_eq!(decode(&stored).unwrap(), value);
}

#[test]
fn decode_falls_back_to_raw_json() {
    let raw = r#"{"codeEditor": {"files": []}}"#;
    assert_eq!(decode(raw).unwrap(), json!({"codeEditor": {"files": []}}));
}

#[test]
fn decode_rejects_garbage() {
    assert!(decode("%%% not a payload").is_err());
}

#[test]
fn save_then_load_round_trips() {
    let mut blobs = MemoryBlobStore::new();
    let mut codec = PersistenceCodec::new(KEY);
    let workspace = sample_workspace();

    assert!(codec.save(&mut blobs, &workspace).unwrap());
    let loaded = PersistenceCodec::new(KEY).load(&blobs).unwrap().unwrap();

    assert_eq!(loaded, workspace);
}

#[test]
fn unchanged_workspace_is_not_rewritten() {
    let mut blobs = MemoryBlobStore::new();
    let mut codec = PersistenceCodec::new(KEY);
    let mut workspace = sample_workspace();

    assert!(codec.save(&mut blobs, &workspace).unwrap());
    assert!(!codec.save(&mut blobs, &workspace).unwrap());
    assert_eq!(blobs.writes(), 1);

    workspace.ui.insert("splitRatio".to_string(), json!(40));
    assert!(codec.save(&mut blobs, &workspace).unwrap());
    assert_eq!(blobs.writes(), 2);
}

#[test]
fn missing_key_loads_nothing() {
    let blobs = MemoryBlobStore::new();
    assert!(PersistenceCodec::new(KEY).load(&blobs).unwrap().is_none());
}

#[test]
fn unreadable_blob_loads_nothing() {
    let mut blobs = MemoryBlobStore::new();
    blobs.set(KEY, "!!corrupt!!").unwrap();

    assert!(PersistenceCodec::new(KEY).load(&blobs).unwrap().is_none());
}

#[test]
fn uncompressed_legacy_blob_is_read_and_migrated() {
    let mut blobs = MemoryBlobStore::new();
    let legacy = json!({
        "viewMode": "code",
        "codeEditor": {
            "files": [{"id": "1", "name": "main.js", "code": "let a;", "language": "javascript"}],
            "currentFileId": "1",
            "theme": "light",
            "fontSize": 18
        },
        "drawing": {
            "elements": [{"id": "r1", "type": "rectangle"}],
            "appState": {"viewBackgroundColor": "#fafafa"}
        }
    });
    blobs.set(KEY, &legacy.to_string()).unwrap();

    let workspace = PersistenceCodec::new(KEY).load(&blobs).unwrap().unwrap();

    assert_eq!(workspace.code.files.active().unwrap().content.text, "let a;");
    assert_eq!(workspace.code.prefs.font_size, 18);
    let canvas = workspace.canvas.files.active().unwrap();
    assert_eq!(canvas.name, "Canvas1");
    assert_eq!(canvas.content.shapes.len(), 1);
    assert_eq!(canvas.content.view.view_background_color, "#fafafa");
}

#[test]
fn unknown_theme_keeps_the_rest_of_the_workspace() {
    let mut blobs = MemoryBlobStore::new();
    let stored = json!({
        "version": 2,
        "codeEditor": {
            "files": [{"id": "1", "name": "solve.py", "code": "pass", "language": "python"}],
            "currentFileId": "1",
            "theme": "vs",
            "fontSize": "huge"
        }
    });
    blobs.set(KEY, &encode(&stored).unwrap()).unwrap();

    let workspace = PersistenceCodec::new(KEY).load(&blobs).unwrap().unwrap();

    let file = workspace.code.files.active().unwrap();
    assert_eq!(file.name, "solve.py");
    assert_eq!(file.content.text, "pass");
    assert_eq!(workspace.code.prefs, EditorPrefs::default());
}

#[test]
fn legacy_canvas_with_object_zoom_loads() {
    let mut blobs = MemoryBlobStore::new();
    let legacy = json!({
        "codeEditor": {
            "files": [{"id": "1", "name": "solve.py", "code": "pass", "language": "python"}],
            "currentFileId": "1"
        },
        "drawing": {
            "elements": [{"id": "r1", "type": "rectangle"}],
            "appState": {"zoom": {"value": 1}, "scrollX": null}
        }
    });
    blobs.set(KEY, &legacy.to_string()).unwrap();

    let workspace = PersistenceCodec::new(KEY).load(&blobs).unwrap().unwrap();

    assert_eq!(workspace.code.files.active().unwrap().content.text, "pass");
    let canvas = workspace.canvas.files.active().unwrap();
    assert_eq!(canvas.content.shapes.len(), 1);
    assert_eq!(canvas.content.view.zoom, 1.0);
    assert_eq!(canvas.content.view.scroll_x, 0.0);
}
