use serde_json::Value;

use crate::kernel::document::{Asset, Language, ViewState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    MalformedAsset { id: String },
    Rejected(String),
}

impl std::fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SurfaceError::MalformedAsset { id } => write!(f, "Malformed asset: {}", id),
            SurfaceError::Rejected(reason) => write!(f, "Surface rejected update: {}", reason),
        }
    }
}

impl std::error::Error for SurfaceError {}

/// The text editor the active code document is shown in.
///
/// Changes typed by the user come back through
/// `Workbench::on_editor_change`; anything reported while a push is settling
/// is treated as an echo.
pub trait TextSurface {
    fn push(&mut self, text: &str, language: Language) -> Result<(), SurfaceError>;
}

/// The drawing surface the active canvas is shown in.
pub trait CanvasSurface {
    fn push_shapes(&mut self, shapes: &[Value]) -> Result<(), SurfaceError>;
    fn register_asset(&mut self, asset: &Asset) -> Result<(), SurfaceError>;
    fn restore_view(&mut self, view: &ViewState) -> Result<(), SurfaceError>;
}
