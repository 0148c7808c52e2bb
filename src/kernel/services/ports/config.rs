use std::time::Duration;

use super::settings::Settings;

pub const DEFAULT_STORAGE_KEY: &str = "dsa-studio-storage";
pub const DEFAULT_ARCHIVE_KEY: &str = "dsa-sessions";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncConfig {
    pub debounce_ms: u64,
    pub settle_ms: u64,
    pub storage_key: String,
    pub archive_key: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            settle_ms: 150,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            archive_key: DEFAULT_ARCHIVE_KEY.to_string(),
        }
    }
}

impl SyncConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        let mut config = Self::default();
        if let Some(ms) = settings.debounce_ms {
            config.debounce_ms = ms;
        }
        if let Some(ms) = settings.settle_ms {
            config.settle_ms = ms;
        }
        config
    }

    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}
