use super::*;
use crate::kernel::state::EditorTheme;
use serde_json::json;

fn new_store() -> Store {
    Store::new(Workspace::new())
}

fn restore_effects(result: &DispatchResult) -> Vec<(DocumentKind, DocumentId)> {
    result
        .effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Restore { kind, id } => Some((*kind, *id)),
            Effect::Persist => None,
        })
        .collect()
}

fn persists(result: &DispatchResult) -> bool {
    result.effects.contains(&Effect::Persist)
}

#[test]
fn add_code_without_name_uses_untitled_and_active_language() {
    let mut store = new_store();
    let main = store.state().code.files.active_id().unwrap();
    store.dispatch(Action::SetCodeLanguage {
        id: main,
        language: Language::Python,
    });

    let result = store.dispatch(Action::AddCode {
        name: None,
        language: None,
    });

    let active = store.state().code.files.active().unwrap();
    assert_eq!(active.name, "untitled1.py");
    assert_eq!(active.content.language, Language::Python);
    assert_eq!(
        restore_effects(&result),
        vec![(DocumentKind::Code, active.id)]
    );
    assert!(persists(&result));
}

#[test]
fn select_emits_restore_only_on_change() {
    let mut store = new_store();
    let main = store.state().code.files.active_id().unwrap();
    store.dispatch(Action::AddCode {
        name: Some("b.js".to_string()),
        language: None,
    });

    let result = store.dispatch(Action::SelectCode(main));
    assert_eq!(restore_effects(&result), vec![(DocumentKind::Code, main)]);

    let result = store.dispatch(Action::SelectCode(main));
    assert!(result.effects.is_empty());
    assert!(!result.state_changed);
}

#[test]
fn missing_ids_are_silent_noops() {
    let mut store = new_store();
    let missing = DocumentId::new(4242);

    for action in [
        Action::SelectCode(missing),
        Action::DeleteCode(missing),
        Action::RenameCanvas {
            id: missing,
            name: "x".to_string(),
        },
        Action::CommitCode {
            id: missing,
            content: CodeContent::new("lost", Language::JavaScript),
        },
        Action::CommitCanvas {
            id: missing,
            content: CanvasContent::default(),
        },
    ] {
        let result = store.dispatch(action);
        assert!(!result.state_changed);
        assert!(result.effects.is_empty());
    }
}

#[test]
fn rename_detects_language_from_suffix() {
    let mut store = new_store();
    let main = store.state().code.files.active_id().unwrap();

    let result = store.dispatch(Action::RenameCode {
        id: main,
        name: " solve.py ".to_string(),
    });

    let doc = store.state().code.files.get(main).unwrap();
    assert_eq!(doc.name, "solve.py");
    assert_eq!(doc.content.language, Language::Python);
    assert_eq!(restore_effects(&result), vec![(DocumentKind::Code, main)]);
}

#[test]
fn rename_to_blank_is_ignored() {
    let mut store = new_store();
    let main = store.state().code.files.active_id().unwrap();

    let result = store.dispatch(Action::RenameCode {
        id: main,
        name: "   ".to_string(),
    });

    assert!(!result.state_changed);
    assert_eq!(store.state().code.files.get(main).unwrap().name, "main.js");
}

#[test]
fn language_change_rewrites_suffix() {
    let mut store = new_store();
    let main = store.state().code.files.active_id().unwrap();

    store.dispatch(Action::SetCodeLanguage {
        id: main,
        language: Language::Java,
    });

    let doc = store.state().code.files.get(main).unwrap();
    assert_eq!(doc.name, "main.java");
    assert_eq!(doc.content.language, Language::Java);
}

#[test]
fn deleting_only_canvas_heals_before_next_observation() {
    let mut store = new_store();
    let only = store.state().canvas.files.active_id().unwrap();

    let result = store.dispatch(Action::DeleteCanvas(only));

    let canvases = &store.state().canvas.files;
    assert_eq!(canvases.len(), 1);
    let replacement = canvases.active().unwrap();
    assert_ne!(replacement.id, only);
    assert_eq!(replacement.content, CanvasContent::default());
    assert_eq!(
        restore_effects(&result),
        vec![(DocumentKind::Canvas, replacement.id)]
    );
    assert!(persists(&result));
}

#[test]
fn deleting_last_code_file_leaves_collection_empty() {
    let mut store = new_store();
    let main = store.state().code.files.active_id().unwrap();

    let result = store.dispatch(Action::DeleteCode(main));

    assert!(store.state().code.files.is_empty());
    assert!(restore_effects(&result).is_empty());
    assert!(persists(&result));
}

#[test]
fn library_and_prefs_changes_persist() {
    let mut store = new_store();

    let result = store.dispatch(Action::SetLibrary(vec![json!({"id": "lib"})]));
    assert!(persists(&result));
    let result = store.dispatch(Action::SetLibrary(vec![json!({"id": "lib"})]));
    assert!(!result.state_changed);

    let result = store.dispatch(Action::SetEditorTheme(EditorTheme::Light));
    assert!(persists(&result));
    store.dispatch(Action::ZoomIn);
    assert_eq!(store.state().code.prefs.font_size, 16);
}

#[test]
fn replace_restores_both_surfaces() {
    let mut store = new_store();
    let mut other = Workspace::new();
    other.code.files.add("other.py", CodeContent::new("pass", Language::Python));
    let code_id = other.code.files.active_id().unwrap();
    let canvas_id = other.canvas.files.active_id().unwrap();

    let result = store.dispatch(Action::Replace(Box::new(other)));

    assert_eq!(
        restore_effects(&result),
        vec![
            (DocumentKind::Code, code_id),
            (DocumentKind::Canvas, canvas_id)
        ]
    );
}

#[test]
fn ui_keys_cannot_shadow_workspace_fields() {
    let mut store = new_store();

    let result = store.dispatch(Action::SetUi {
        key: "drawing".to_string(),
        value: json!({}),
    });
    assert!(!result.state_changed);
    assert!(store.state().ui.is_empty());

    let result = store.dispatch(Action::SetUi {
        key: "name".to_string(),
        value: json!("tracker-profile"),
    });
    assert!(!result.state_changed);
    assert!(store.state().ui.is_empty());

    let result = store.dispatch(Action::SetUi {
        key: "laserMode".to_string(),
        value: json!(true),
    });
    assert!(persists(&result));
}
