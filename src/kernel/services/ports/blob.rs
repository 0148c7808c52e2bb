use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, BlobStoreError>;

#[derive(Debug)]
pub enum BlobStoreError {
    Io { path: PathBuf, source: io::Error },
    InvalidKey(String),
}

impl std::fmt::Display for BlobStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlobStoreError::Io { path, source } => {
                write!(f, "IO error at {}: {}", path.display(), source)
            }
            BlobStoreError::InvalidKey(key) => write!(f, "Invalid blob key: {:?}", key),
        }
    }
}

impl std::error::Error for BlobStoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BlobStoreError::Io { source, .. } => Some(source),
            BlobStoreError::InvalidKey(_) => None,
        }
    }
}

/// Durable string key-value storage.
pub trait BlobStore {
    /// `Ok(None)` when the key has never been written.
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}
