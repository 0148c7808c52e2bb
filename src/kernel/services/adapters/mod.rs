//! Service adapters: filesystem and OS specific implementations.

pub mod blob;
pub mod paths;
pub mod settings;

pub use blob::{FileBlobStore, MemoryBlobStore};
pub use paths::{ensure_log_dir, ensure_store_dir, get_log_dir, get_store_dir};
pub use settings::{ensure_settings_file, get_settings_path, load_settings, load_settings_from};
