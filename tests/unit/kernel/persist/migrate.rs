use super::*;
use crate::kernel::state::Workspace;

#[test]
fn current_version_is_returned_untouched() {
    let workspace = Workspace::new().to_value().unwrap();
    assert_eq!(migrate(workspace.clone()), workspace);
}

#[test]
fn current_unversioned_shape_is_stable() {
    let value = json!({
        "codeEditor": {
            "files": [{"id": "1", "name": "a.js", "code": "", "language": "javascript"}],
            "currentFileId": "1"
        },
        "drawing": {
            "files": [{"id": "4", "name": "Board", "elements": [], "appState": {}, "assets": {}}],
            "currentFileId": "4"
        }
    });
    assert_eq!(migrate(value.clone()), value);
}

#[test]
fn migration_is_idempotent_on_legacy_input() {
    let legacy = json!({
        "codeEditor": {"code": "x = 1", "language": "python", "files": []},
        "drawing": {"elements": [{"id": "a"}], "appState": {"zoom": 2}}
    });
    let once = migrate(legacy);
    assert_eq!(migrate(once.clone()), once);
}

#[test]
fn flat_canvas_becomes_single_named_document() {
    let legacy = json!({
        "drawing": {
            "elements": [{"id": "r1", "type": "rectangle"}, {"id": "t1", "type": "text"}],
            "appState": {"viewBackgroundColor": "#123456", "gridSize": 20},
            "files": {
                "f1": {"mimeType": "image/png", "dataURL": "data:image/png;base64,AAAA"}
            },
            "libraryItems": [{"id": "lib"}]
        }
    });

    let migrated = migrate(legacy);
    let drawing = &migrated["drawing"];

    assert_eq!(drawing["currentFileId"], "1");
    assert_eq!(drawing["libraryItems"][0]["id"], "lib");
    let files = drawing["files"].as_array().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["name"], "Canvas1");
    assert_eq!(files[0]["elements"].as_array().unwrap().len(), 2);
    assert_eq!(files[0]["appState"]["gridSize"], 20);
    assert_eq!(files[0]["assets"]["f1"]["id"], "f1");

    let workspace = Workspace::from_value(migrated).unwrap();
    let canvas = workspace.canvas.files.active().unwrap();
    assert_eq!(canvas.content.shapes.len(), 2);
    assert!(canvas.content.assets["f1"].is_well_formed());
}

#[test]
fn flat_code_buffer_becomes_main_document() {
    let legacy = json!({
        "codeEditor": {"code": "int main() {}", "language": "cpp", "theme": "vs-dark"}
    });

    let workspace = Workspace::from_value(migrate(legacy)).unwrap();

    let main = workspace.code.files.active().unwrap();
    assert_eq!(main.name, "main.cpp");
    assert_eq!(main.content.text, "int main() {}");
    assert_eq!(main.content.language, Language::Cpp);
}

#[test]
fn per_document_file_maps_move_to_assets() {
    let legacy = json!({
        "drawing": {
            "files": [{
                "id": "2",
                "name": "Graph",
                "elements": [],
                "files": {"img": {"id": "img", "dataURL": "data:image/gif;base64,R0lG"}}
            }]
        }
    });

    let migrated = migrate(legacy);

    let doc = &migrated["drawing"]["files"][0];
    assert!(doc.get("files").is_none());
    assert_eq!(doc["assets"]["img"]["dataURL"], "data:image/gif;base64,R0lG");
}

#[test]
fn newer_versions_are_read_as_current() {
    let future = json!({
        "version": 99,
        "drawing": {"elements": []}
    });
    assert_eq!(migrate(future.clone()), future);
}

#[test]
fn non_objects_pass_through() {
    assert_eq!(migrate(json!([1, 2])), json!([1, 2]));
}
