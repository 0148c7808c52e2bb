//! Services layer (ports + adapters).
//!
//! - `ports`: contracts the engine is written against (blob store, editing
//!   surfaces, configuration).
//! - `adapters`: blob stores, app paths and the settings file.

pub mod adapters;
pub mod ports;
