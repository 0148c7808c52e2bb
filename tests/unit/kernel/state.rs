use super::*;
use serde_json::json;

#[test]
fn new_workspace_has_welcome_file_and_one_canvas() {
    let workspace = Workspace::new();

    let main = workspace.code.files.active().unwrap();
    assert_eq!(main.name, "main.js");
    assert_eq!(main.content.text, WELCOME_CODE);
    assert_eq!(workspace.canvas.files.len(), 1);
    assert_eq!(workspace.canvas.files.active().unwrap().name, "Canvas1");
}

#[test]
fn untitled_names_count_existing_untitled_files() {
    let mut workspace = Workspace::new();
    assert_eq!(workspace.code.untitled_name(Language::Python), "untitled1.py");

    workspace
        .code
        .files
        .add("untitled1.js", CodeContent::default());
    assert_eq!(workspace.code.untitled_name(Language::Java), "untitled2.java");
}

#[test]
fn font_size_is_clamped() {
    let mut prefs = EditorPrefs::default();
    for _ in 0..20 {
        prefs.zoom_in();
    }
    assert_eq!(prefs.font_size, MAX_FONT_SIZE);
    assert!(!prefs.zoom_in());
    for _ in 0..20 {
        prefs.zoom_out();
    }
    assert_eq!(prefs.font_size, MIN_FONT_SIZE);
}

#[test]
fn serialized_shape_uses_collection_layout_and_version() {
    let mut workspace = Workspace::new();
    workspace.ui.insert("viewMode".to_string(), json!("split"));

    let value = workspace.to_value().unwrap();

    assert_eq!(value["version"], WORKSPACE_VERSION);
    assert_eq!(value["viewMode"], "split");
    assert_eq!(value["codeEditor"]["files"][0]["name"], "main.js");
    assert_eq!(value["codeEditor"]["files"][0]["language"], "javascript");
    assert_eq!(value["codeEditor"]["theme"], "vs-dark");
    assert!(value["drawing"]["files"].is_array());
    assert!(value["drawing"]["libraryItems"].is_array());
}

#[test]
fn value_round_trip_is_content_equal() {
    let mut workspace = Workspace::new();
    let canvas_id = workspace.canvas.files.active_id().unwrap();
    workspace.canvas.files.mutate(
        canvas_id,
        CanvasContent {
            shapes: vec![json!({"id": "r1", "type": "rectangle", "x": 10.5})],
            ..CanvasContent::default()
        },
    );
    workspace.canvas.library.push(json!({"id": "lib-1"}));
    workspace.ui.insert("splitRatio".to_string(), json!(50));

    let back = Workspace::from_value(workspace.to_value().unwrap()).unwrap();

    assert_eq!(back, workspace);
}

#[test]
fn deserializing_without_canvases_heals() {
    let value = json!({
        "version": WORKSPACE_VERSION,
        "codeEditor": { "files": [], "currentFileId": null },
        "drawing": { "files": [] }
    });

    let workspace = Workspace::from_value(value).unwrap();

    assert!(workspace.code.files.is_empty());
    assert_eq!(workspace.canvas.files.len(), 1);
}

#[test]
fn reserved_ui_keys_are_not_written() {
    let mut workspace = Workspace::new();
    workspace.ui.insert("name".to_string(), json!("tracker-profile"));
    workspace.ui.insert("version".to_string(), json!(99));
    workspace.ui.insert("viewMode".to_string(), json!("code"));

    let value = workspace.to_value().unwrap();

    assert!(value.get("name").is_none());
    assert_eq!(value["version"], WORKSPACE_VERSION);
    assert_eq!(value["viewMode"], "code");
}

#[test]
fn reserved_ui_keys_are_dropped_on_read() {
    let value = json!({
        "version": WORKSPACE_VERSION,
        "codeEditor": { "files": [] },
        "createdAt": 1_700_000_000_000i64,
        "timerSetMinutes": 25
    });

    let workspace = Workspace::from_value(value).unwrap();

    assert!(!workspace.ui.contains_key("createdAt"));
    assert_eq!(workspace.ui["timerSetMinutes"], 25);
}
