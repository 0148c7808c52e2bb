use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::migrate::migrate;
use crate::kernel::services::ports::{BlobStore, BlobStoreError};
use crate::kernel::state::Workspace;

#[derive(Debug)]
pub enum SnapshotError {
    Json(serde_json::Error),
    NotAnObject,
    MalformedArchive,
    Store(BlobStoreError),
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotError::Json(e) => write!(f, "Invalid session document: {}", e),
            SnapshotError::NotAnObject => write!(f, "Session document is not a JSON object"),
            SnapshotError::MalformedArchive => write!(f, "Session archive is not a JSON array"),
            SnapshotError::Store(e) => write!(f, "Session archive error: {}", e),
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotError::Json(e) => Some(e),
            SnapshotError::NotAnObject | SnapshotError::MalformedArchive => None,
            SnapshotError::Store(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(e: serde_json::Error) -> Self {
        SnapshotError::Json(e)
    }
}

impl From<BlobStoreError> for SnapshotError {
    fn from(e: BlobStoreError) -> Self {
        SnapshotError::Store(e)
    }
}

pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// A named, timestamped copy of the whole workspace.
///
/// On disk the metadata sits next to the workspace fields in one flat
/// object, which is also what older session files look like.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub id: String,
    pub name: String,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
    pub updated_at: i64,
    pub workspace: Workspace,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotRef<'a> {
    id: &'a str,
    name: &'a str,
    created_at: i64,
    updated_at: i64,
    #[serde(flatten)]
    workspace: &'a Workspace,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotHeader {
    /// Older session files used a numeric timestamp as id.
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    created_at: Option<i64>,
    #[serde(default)]
    updated_at: Option<i64>,
}

const HEADER_KEYS: [&str; 4] = ["id", "name", "createdAt", "updatedAt"];

impl Snapshot {
    pub fn new(workspace: Workspace) -> Self {
        let now = now_millis();
        Self {
            id: Uuid::new_v4().to_string(),
            name: format!("Session {}", chrono::Local::now().format("%Y-%m-%d")),
            created_at: now,
            updated_at: now,
            workspace,
        }
    }

    /// Replace the captured workspace, keeping identity and creation time.
    pub fn touch(&mut self, workspace: Workspace) {
        self.workspace = workspace;
        self.updated_at = now_millis().max(self.created_at);
    }

    pub fn to_value(&self) -> Result<Value, SnapshotError> {
        Ok(serde_json::to_value(self.borrowed())?)
    }

    pub fn to_document(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(&self.borrowed())?)
    }

    fn borrowed(&self) -> SnapshotRef<'_> {
        SnapshotRef {
            id: &self.id,
            name: &self.name,
            created_at: self.created_at,
            updated_at: self.updated_at,
            workspace: &self.workspace,
        }
    }

    /// Parse a session object, upgrading legacy workspace shapes. Missing
    /// metadata is filled in rather than rejected.
    pub fn from_value(value: Value) -> Result<Self, SnapshotError> {
        let Value::Object(mut fields) = value else {
            return Err(SnapshotError::NotAnObject);
        };

        let header_fields = HEADER_KEYS
            .iter()
            .filter_map(|key| fields.remove(*key).map(|v| (key.to_string(), v)))
            .collect();
        let header: SnapshotHeader = serde_json::from_value(Value::Object(header_fields))?;
        let workspace = Workspace::from_value(migrate(Value::Object(fields)))?;

        let fresh = Snapshot::new(Workspace::default());
        let created_at = header.created_at.unwrap_or(fresh.created_at);
        Ok(Self {
            id: header.id.and_then(id_string).unwrap_or(fresh.id),
            name: header.name.unwrap_or(fresh.name),
            created_at,
            updated_at: header.updated_at.unwrap_or(created_at),
            workspace,
        })
    }
}

fn id_string(id: Value) -> Option<String> {
    match id {
        Value::String(id) if !id.is_empty() => Some(id),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Portable text document for a fresh snapshot of `workspace`.
pub fn export_snapshot(workspace: &Workspace) -> Result<String, SnapshotError> {
    Snapshot::new(workspace.clone()).to_document()
}

pub fn import_snapshot(document: &str) -> Result<Snapshot, SnapshotError> {
    let value: Value = serde_json::from_str(document)?;
    Snapshot::from_value(value)
}

/// Saved sessions, kept as a plain JSON array under one blob key.
#[derive(Debug, Clone)]
pub struct SessionArchive {
    key: String,
}

impl SessionArchive {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn read_entries(&self, blobs: &dyn BlobStore) -> Result<Vec<Value>, SnapshotError> {
        let Some(stored) = blobs.get(&self.key)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Value>(&stored)? {
            Value::Array(entries) => Ok(entries),
            _ => Err(SnapshotError::MalformedArchive),
        }
    }

    /// Every readable session; unreadable entries are skipped.
    pub fn list(&self, blobs: &dyn BlobStore) -> Result<Vec<Snapshot>, SnapshotError> {
        let entries = self.read_entries(blobs)?;
        Ok(entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match Snapshot::from_value(entry) {
                Ok(snapshot) => Some(snapshot),
                Err(e) => {
                    tracing::warn!(index, error = %e, "skipping unreadable archived session");
                    None
                }
            })
            .collect())
    }

    /// Store `snapshot`, replacing an archived session with the same id.
    pub fn upsert(
        &self,
        blobs: &mut dyn BlobStore,
        snapshot: &mut Snapshot,
    ) -> Result<(), SnapshotError> {
        snapshot.updated_at = now_millis().max(snapshot.created_at);
        let value = snapshot.to_value()?;

        let mut entries = self.read_entries(blobs)?;
        let existing = entries
            .iter()
            .position(|entry| entry.get("id").and_then(Value::as_str) == Some(snapshot.id.as_str()));
        match existing {
            Some(index) => entries[index] = value,
            None => entries.push(value),
        }

        blobs.set(&self.key, &serde_json::to_string(&entries)?)?;
        tracing::debug!(id = %snapshot.id, replaced = existing.is_some(), "session archived");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/persist/snapshot.rs"]
mod tests;
