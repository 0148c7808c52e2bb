use super::document::{with_extension, CanvasContent, CodeContent, DocumentKind, Language};
use super::ids::DocumentId;
use super::state::is_reserved_ui_key;
use super::{Action, Effect, Workspace};

pub struct DispatchResult {
    pub effects: Vec<Effect>,
    pub state_changed: bool,
}

/// Single source of truth for the workspace. All mutation goes through
/// [`Store::dispatch`].
pub struct Store {
    state: Workspace,
}

impl Store {
    pub fn new(mut state: Workspace) -> Self {
        state.canvas.heal();
        Self { state }
    }

    pub fn state(&self) -> &Workspace {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) -> DispatchResult {
        let before_code = self.state.code.files.active_id();
        let before_canvas = self.state.canvas.files.active_id();
        let replaced = matches!(action, Action::Replace(_));

        let (state_changed, mut effects) = match action {
            Action::AddCode { name, language } => self.add_code(name, language),
            Action::SelectCode(id) => (self.state.code.files.select(id), Vec::new()),
            Action::RenameCode { id, name } => self.rename_code(id, name),
            Action::SetCodeLanguage { id, language } => self.set_code_language(id, language),
            Action::DeleteCode(id) => (self.state.code.files.remove(id), Vec::new()),
            Action::CommitCode { id, content } => {
                (self.state.code.files.mutate(id, content), Vec::new())
            }
            Action::AddCanvas { name } => {
                let name = name.unwrap_or_else(|| self.state.canvas.next_name());
                self.state.canvas.files.add(name, CanvasContent::default());
                (true, Vec::new())
            }
            Action::SelectCanvas(id) => (self.state.canvas.files.select(id), Vec::new()),
            Action::RenameCanvas { id, name } => {
                (self.state.canvas.files.rename(id, name), Vec::new())
            }
            Action::DeleteCanvas(id) => (self.state.canvas.files.remove(id), Vec::new()),
            Action::CommitCanvas { id, content } => {
                (self.state.canvas.files.mutate(id, content), Vec::new())
            }
            Action::SetLibrary(items) => {
                let changed = self.state.canvas.library != items;
                self.state.canvas.library = items;
                (changed, Vec::new())
            }
            Action::SetEditorTheme(theme) => {
                let changed = self.state.code.prefs.theme != theme;
                self.state.code.prefs.theme = theme;
                (changed, Vec::new())
            }
            Action::ZoomIn => (self.state.code.prefs.zoom_in(), Vec::new()),
            Action::ZoomOut => (self.state.code.prefs.zoom_out(), Vec::new()),
            Action::SetUi { key, value } => {
                if is_reserved_ui_key(&key) {
                    tracing::warn!(%key, "ignoring ui key that shadows workspace data");
                    return DispatchResult {
                        effects: Vec::new(),
                        state_changed: false,
                    };
                }
                let changed = self.state.ui.get(&key) != Some(&value);
                self.state.ui.insert(key, value);
                (changed, Vec::new())
            }
            Action::Replace(workspace) => {
                self.state = *workspace;
                (true, Vec::new())
            }
        };

        let healed = self.state.canvas.heal().is_some();

        let after_code = self.state.code.files.active_id();
        if after_code != before_code || replaced {
            if let Some(id) = after_code {
                push_restore(&mut effects, DocumentKind::Code, id);
            }
        }
        let after_canvas = self.state.canvas.files.active_id();
        if after_canvas != before_canvas || healed || replaced {
            if let Some(id) = after_canvas {
                push_restore(&mut effects, DocumentKind::Canvas, id);
            }
        }

        let state_changed = state_changed || healed;
        if state_changed {
            effects.push(Effect::Persist);
        }

        DispatchResult {
            effects,
            state_changed,
        }
    }

    fn add_code(
        &mut self,
        name: Option<String>,
        language: Option<Language>,
    ) -> (bool, Vec<Effect>) {
        let language = language
            .or_else(|| self.state.code.files.active().map(|d| d.content.language))
            .unwrap_or_default();
        let name = name.unwrap_or_else(|| self.state.code.untitled_name(language));
        self.state
            .code
            .files
            .add(name, CodeContent::new(String::new(), language));
        (true, Vec::new())
    }

    /// Renaming re-detects the language from the new suffix.
    fn rename_code(&mut self, id: DocumentId, name: String) -> (bool, Vec<Effect>) {
        let name = name.trim().to_string();
        if name.is_empty() {
            return (false, Vec::new());
        }
        let detected = Language::from_file_name(&name);
        let files = &mut self.state.code.files;
        let is_active = files.active_id() == Some(id);
        let renamed = files.rename(id, name);

        let mut effects = Vec::new();
        let Some(doc) = files.get_mut(id) else {
            return (renamed, effects);
        };
        let relanguaged = doc.content.language != detected;
        if relanguaged {
            doc.content.language = detected;
            if is_active {
                effects.push(Effect::Restore {
                    kind: DocumentKind::Code,
                    id,
                });
            }
        }
        (renamed || relanguaged, effects)
    }

    /// Changing the language rewrites the file name suffix to match.
    fn set_code_language(&mut self, id: DocumentId, language: Language) -> (bool, Vec<Effect>) {
        let files = &mut self.state.code.files;
        let is_active = files.active_id() == Some(id);
        let Some(doc) = files.get_mut(id) else {
            return (false, Vec::new());
        };
        if doc.content.language == language {
            return (false, Vec::new());
        }
        doc.content.language = language;
        doc.name = with_extension(&doc.name, language.extension());

        let effects = if is_active {
            vec![Effect::Restore {
                kind: DocumentKind::Code,
                id,
            }]
        } else {
            Vec::new()
        };
        (true, effects)
    }
}

fn push_restore(effects: &mut Vec<Effect>, kind: DocumentKind, id: DocumentId) {
    let effect = Effect::Restore { kind, id };
    if !effects.contains(&effect) {
        effects.push(effect);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/store.rs"]
mod tests;
