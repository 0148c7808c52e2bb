//! studio-sync - workspace state sync and persistence engine
//!
//! Module layout:
//! - kernel: documents, collections, store (action/effect), debounce and
//!   restoration state machines, persistence codec, snapshots
//! - kernel::services: ports (blob store, surfaces, config) and adapters
//! - app: the Workbench engine and its tokio driver

pub mod app;
pub mod kernel;
