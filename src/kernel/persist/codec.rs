use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use rustc_hash::FxHasher;
use serde_json::Value;
use std::hash::{Hash, Hasher};
use std::io::{self, Read, Write};

use super::migrate::migrate;
use crate::kernel::services::ports::{BlobStore, BlobStoreError};
use crate::kernel::state::Workspace;

#[derive(Debug)]
pub enum CodecError {
    Json(serde_json::Error),
    Compress(io::Error),
}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecError::Json(e) => write!(f, "JSON error: {}", e),
            CodecError::Compress(e) => write!(f, "Compression error: {}", e),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CodecError::Json(e) => Some(e),
            CodecError::Compress(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(e: serde_json::Error) -> Self {
        CodecError::Json(e)
    }
}

#[derive(Debug)]
pub enum PersistError {
    Store(BlobStoreError),
    Codec(CodecError),
}

impl std::fmt::Display for PersistError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersistError::Store(e) => write!(f, "Blob store error: {}", e),
            PersistError::Codec(e) => write!(f, "Codec error: {}", e),
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistError::Store(e) => Some(e),
            PersistError::Codec(e) => Some(e),
        }
    }
}

impl From<BlobStoreError> for PersistError {
    fn from(e: BlobStoreError) -> Self {
        PersistError::Store(e)
    }
}

impl From<CodecError> for PersistError {
    fn from(e: CodecError) -> Self {
        PersistError::Codec(e)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(e: serde_json::Error) -> Self {
        PersistError::Codec(CodecError::Json(e))
    }
}

/// JSON -> zlib -> base64.
pub fn encode(value: &Value) -> Result<String, CodecError> {
    let json = serde_json::to_vec(value)?;
    compress(&json)
}

fn compress(json: &[u8]) -> Result<String, CodecError> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(json.len() / 2), Compression::default());
    encoder.write_all(json).map_err(CodecError::Compress)?;
    let bytes = encoder.finish().map_err(CodecError::Compress)?;
    Ok(STANDARD.encode(bytes))
}

fn decompress(stored: &str) -> Option<Vec<u8>> {
    let bytes = STANDARD.decode(stored.trim()).ok()?;
    let mut json = Vec::new();
    ZlibDecoder::new(bytes.as_slice())
        .read_to_end(&mut json)
        .ok()?;
    Some(json)
}

/// Inverse of [`encode`]. Stored text that does not decompress is read as
/// plain JSON, which is how data written before compression looks.
pub fn decode(stored: &str) -> Result<Value, CodecError> {
    if let Some(json) = decompress(stored) {
        match serde_json::from_slice(&json) {
            Ok(value) => return Ok(value),
            Err(e) => tracing::debug!(error = %e, "decompressed payload is not JSON, trying raw"),
        }
    }
    Ok(serde_json::from_str(stored.trim())?)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Fingerprint {
    len: usize,
    hash: u64,
}

impl Fingerprint {
    fn of(bytes: &[u8]) -> Self {
        let mut hasher = FxHasher::default();
        bytes.hash(&mut hasher);
        Self {
            len: bytes.len(),
            hash: hasher.finish(),
        }
    }
}

/// Continuous persistence of the workspace under one blob key.
#[derive(Debug)]
pub struct PersistenceCodec {
    key: String,
    last_written: Option<Fingerprint>,
}

impl PersistenceCodec {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            last_written: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Write `workspace` unless it serialises to exactly what was last
    /// written. Returns whether the blob store was touched.
    pub fn save(
        &mut self,
        blobs: &mut dyn BlobStore,
        workspace: &Workspace,
    ) -> Result<bool, PersistError> {
        let json = serde_json::to_vec(workspace)?;
        let fingerprint = Fingerprint::of(&json);
        if self.last_written == Some(fingerprint) {
            tracing::trace!(key = %self.key, "workspace unchanged, skipping write");
            return Ok(false);
        }

        let payload = compress(&json)?;
        if let Err(e) = blobs.set(&self.key, &payload) {
            tracing::warn!(key = %self.key, error = %e, "failed to persist workspace");
            return Err(e.into());
        }
        self.last_written = Some(fingerprint);
        tracing::debug!(
            key = %self.key,
            json_bytes = json.len(),
            stored_bytes = payload.len(),
            "workspace persisted"
        );
        Ok(true)
    }

    /// `Ok(None)` when nothing usable is stored; only blob store failures are
    /// errors.
    pub fn load(&mut self, blobs: &dyn BlobStore) -> Result<Option<Workspace>, PersistError> {
        let stored = match blobs.get(&self.key) {
            Ok(Some(stored)) => stored,
            Ok(None) => return Ok(None),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "failed to read persisted workspace");
                return Err(e.into());
            }
        };

        let value = match decode(&stored) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "discarding unreadable workspace");
                return Ok(None);
            }
        };

        match Workspace::from_value(migrate(value)) {
            Ok(workspace) => Ok(Some(workspace)),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "discarding malformed workspace");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/persist/codec.rs"]
mod tests;
