//! Best score and mute flag persistence
//!
//! Backends:
//! - `MemoryStore`: in-process, for tests and throwaway runs
//! - `JsonFileStore`: a small JSON file (native)
//! - `LocalStorageStore`: browser LocalStorage (wasm32)
//!
//! Storage is best effort. Failed loads fall back to defaults and failed
//! saves are logged, never propagated.

use serde::{Deserialize, Serialize};

/// Persistent preferences and records
pub trait Store {
    fn load_best_score(&mut self) -> u32;
    fn save_best_score(&mut self, score: u32);
    fn load_muted(&mut self) -> bool;
    fn save_muted(&mut self, muted: bool);
}

/// Everything a store keeps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveData {
    pub best_score: u32,
    pub muted: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub data: SaveData,
    /// Number of writes performed
    pub writes: u32,
}

impl MemoryStore {
    pub fn with_best_score(best_score: u32) -> Self {
        Self {
            data: SaveData {
                best_score,
                ..Default::default()
            },
            writes: 0,
        }
    }
}

impl Store for MemoryStore {
    fn load_best_score(&mut self) -> u32 {
        self.data.best_score
    }

    fn save_best_score(&mut self, score: u32) {
        self.data.best_score = score;
        self.writes += 1;
    }

    fn load_muted(&mut self) -> bool {
        self.data.muted
    }

    fn save_muted(&mut self, muted: bool) {
        self.data.muted = muted;
        self.writes += 1;
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStore;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::fs;
    use std::path::{Path, PathBuf};

    use super::{SaveData, Store};

    /// JSON save file, written through on every change
    #[derive(Debug, Clone)]
    pub struct JsonFileStore {
        path: PathBuf,
        data: SaveData,
    }

    impl JsonFileStore {
        /// Open (or lazily create) the save file at `path`
        pub fn open(path: impl Into<PathBuf>) -> Self {
            let path = path.into();
            let data = Self::read(&path).unwrap_or_default();
            Self { path, data }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn read(path: &Path) -> Option<SaveData> {
            let json = match fs::read_to_string(path) {
                Ok(json) => json,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
                Err(e) => {
                    log::warn!("Failed to read {}: {e}", path.display());
                    return None;
                }
            };
            match serde_json::from_str(&json) {
                Ok(data) => {
                    log::info!("Loaded save data from {}", path.display());
                    Some(data)
                }
                Err(e) => {
                    log::warn!("Ignoring corrupt save file {}: {e}", path.display());
                    None
                }
            }
        }

        fn write(&self) {
            let json = match serde_json::to_string_pretty(&self.data) {
                Ok(json) => json,
                Err(e) => {
                    log::warn!("Failed to serialize save data: {e}");
                    return;
                }
            };
            if let Err(e) = fs::write(&self.path, json) {
                log::warn!("Failed to write {}: {e}", self.path.display());
            }
        }
    }

    impl Store for JsonFileStore {
        fn load_best_score(&mut self) -> u32 {
            self.data.best_score
        }

        fn save_best_score(&mut self, score: u32) {
            self.data.best_score = score;
            self.write();
        }

        fn load_muted(&mut self) -> bool {
            self.data.muted
        }

        fn save_muted(&mut self, muted: bool) {
            self.data.muted = muted;
            self.write();
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorageStore;

#[cfg(target_arch = "wasm32")]
mod local {
    use web_sys::Storage;

    use super::Store;

    /// Browser LocalStorage, one key per value
    #[derive(Debug, Clone, Copy, Default)]
    pub struct LocalStorageStore;

    impl LocalStorageStore {
        const BEST_KEY: &'static str = "flappy_arcade_best";
        const MUTED_KEY: &'static str = "flappy_arcade_muted";

        fn storage() -> Option<Storage> {
            web_sys::window()
                .and_then(|w| w.local_storage().ok())
                .flatten()
        }

        fn get(key: &str) -> Option<String> {
            Self::storage()?.get_item(key).ok().flatten()
        }

        fn set(key: &str, value: &str) {
            let Some(storage) = Self::storage() else {
                log::warn!("LocalStorage unavailable, {key} not saved");
                return;
            };
            if storage.set_item(key, value).is_err() {
                log::warn!("Failed to save {key} to LocalStorage");
            }
        }
    }

    impl Store for LocalStorageStore {
        fn load_best_score(&mut self) -> u32 {
            Self::get(Self::BEST_KEY)
                .and_then(|v| v.parse().ok())
                .unwrap_or(0)
        }

        fn save_best_score(&mut self, score: u32) {
            Self::set(Self::BEST_KEY, &score.to_string());
        }

        fn load_muted(&mut self) -> bool {
            Self::get(Self::MUTED_KEY).is_some_and(|v| v == "true")
        }

        fn save_muted(&mut self, muted: bool) {
            Self::set(Self::MUTED_KEY, if muted { "true" } else { "false" });
        }
    }
}
