//! Data directory layout.
//!
//! - macOS: ~/Library/Application Support/studio-sync/{store,logs}
//! - Linux: $XDG_DATA_HOME/studio-sync or ~/.local/share/studio-sync
//! - Windows: %APPDATA%\studio-sync

use std::path::PathBuf;

const APP_NAME: &str = "studio-sync";
const STORE_DIR: &str = "store";
const LOG_DIR: &str = "logs";

/// Per-platform base directories as `(env var, subpath)` pairs, tried in
/// order. Unset or empty variables are skipped.
type Bases = &'static [(&'static str, &'static str)];

#[cfg(target_os = "macos")]
const DATA_BASES: Bases = &[("HOME", "Library/Application Support")];
#[cfg(target_os = "macos")]
const CACHE_BASES: Bases = &[("HOME", "Library/Caches")];

#[cfg(target_os = "linux")]
const DATA_BASES: Bases = &[("XDG_DATA_HOME", ""), ("HOME", ".local/share")];
#[cfg(target_os = "linux")]
const CACHE_BASES: Bases = &[("XDG_CACHE_HOME", ""), ("HOME", ".cache")];

#[cfg(target_os = "windows")]
const DATA_BASES: Bases = &[("APPDATA", "")];
#[cfg(target_os = "windows")]
const CACHE_BASES: Bases = &[("LOCALAPPDATA", ""), ("APPDATA", "")];

#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
const DATA_BASES: Bases = &[];
#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
const CACHE_BASES: Bases = &[];

fn resolve(bases: Bases, lookup: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    bases.iter().find_map(|&(var, sub)| {
        let root = PathBuf::from(lookup(var).filter(|v| !v.is_empty())?);
        Some(if sub.is_empty() { root } else { root.join(sub) })
    })
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn get_app_data_dir() -> Option<PathBuf> {
    resolve(DATA_BASES, env_var).map(|base| base.join(APP_NAME))
}

/// Base cache directory, without the app name.
pub(crate) fn get_cache_dir() -> Option<PathBuf> {
    resolve(CACHE_BASES, env_var)
}

/// Directory of the default `FileBlobStore`.
pub fn get_store_dir() -> Option<PathBuf> {
    get_app_data_dir().map(|p| p.join(STORE_DIR))
}

pub fn get_log_dir() -> Option<PathBuf> {
    get_app_data_dir().map(|p| p.join(LOG_DIR))
}

fn ensure_dir(dir: Option<PathBuf>, what: &str) -> std::io::Result<PathBuf> {
    let dir = dir.ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Cannot determine {} directory", what),
        )
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
    }

    Ok(dir)
}

pub fn ensure_store_dir() -> std::io::Result<PathBuf> {
    ensure_dir(get_store_dir(), "store")
}

pub fn ensure_log_dir() -> std::io::Result<PathBuf> {
    ensure_dir(get_log_dir(), "log")
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/paths.rs"]
mod tests;
