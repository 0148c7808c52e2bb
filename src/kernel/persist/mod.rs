//! Workspace persistence.
//!
//! - `codec`: continuous save/load of the whole workspace through a blob store
//!   as compressed, base64-wrapped JSON.
//! - `migrate`: upgrade of legacy on-disk shapes, shared by both load paths.
//! - `snapshot`: portable, plain-JSON session documents for manual export and
//!   import, plus the session archive.

pub mod codec;
pub mod migrate;
pub mod snapshot;

pub use codec::{decode, encode, CodecError, PersistError, PersistenceCodec};
pub use migrate::migrate;
pub use snapshot::{export_snapshot, import_snapshot, SessionArchive, Snapshot, SnapshotError};
