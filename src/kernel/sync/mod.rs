//! Edit coalescing and surface restoration.
//!
//! - `debounce`: per-document pending saves with caller-driven deadlines.
//! - `restore`: the surface attachment state machine that keeps programmatic
//!   pushes from being mistaken for user edits.

pub mod debounce;
pub mod restore;

pub use debounce::{Debouncer, PendingSave};
pub use restore::{RestoreStep, RestoreToken, Restorer, SurfacePhase};
