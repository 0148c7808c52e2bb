//! Headless sync core (state/action/effect).

pub mod action;
pub mod collection;
pub mod document;
pub mod effect;
pub mod ids;
pub mod persist;
pub mod services;
pub mod state;
pub mod store;
pub mod sync;

pub use action::Action;
pub use collection::Collection;
pub use document::{
    Asset, CanvasContent, CanvasDocument, CodeContent, CodeDocument, Document, DocumentKind,
    Language, ViewState,
};
pub use effect::Effect;
pub use ids::DocumentId;
pub use state::{Canvases, CodeFiles, EditorPrefs, EditorTheme, Workspace};
pub use store::{DispatchResult, Store};
