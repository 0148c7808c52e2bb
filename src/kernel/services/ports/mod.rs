//! Service ports: traits + data contracts.

pub mod blob;
pub mod config;
pub mod settings;
pub mod surface;

pub use blob::{BlobStore, BlobStoreError};
pub use config::SyncConfig;
pub use settings::Settings;
pub use surface::{CanvasSurface, SurfaceError, TextSurface};
