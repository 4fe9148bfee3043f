//! Display preferences that survive reloads: dot size and zoom-to-cursor.
//!
//! Preferences live in a simple string key-value store under fixed keys, the
//! same layout the browser dashboard keeps in `localStorage`. Storage is
//! best-effort: failures are logged and the map carries on with defaults.

#[cfg(test)]
#[path = "prefs_test.rs"]
mod prefs_test;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{DOT_LARGE_PX, DOT_MEDIUM_PX, DOT_SIZE_KEY, DOT_SMALL_PX, ZOOM_TO_CURSOR_KEY};

#[derive(Debug, thiserror::Error)]
pub enum PrefsError {
    #[error("preference file i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("preference file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("preference storage unavailable: {0}")]
    Unavailable(String),
}

/// Rendered marker size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DotSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl DotSize {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    /// Marker diameter in pixels.
    #[must_use]
    pub fn px(self) -> f64 {
        match self {
            Self::Small => DOT_SMALL_PX,
            Self::Medium => DOT_MEDIUM_PX,
            Self::Large => DOT_LARGE_PX,
        }
    }
}

impl fmt::Display for DotSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DotSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            other => Err(format!("unknown dot size '{other}' (expected small, medium or large)")),
        }
    }
}

/// A string key-value store for preferences.
pub trait PrefStore {
    /// Read the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, PrefsError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError>;
}

/// Persisted live map preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapPrefs {
    pub zoom_to_cursor: bool,
    pub dot_size: DotSize,
}

impl Default for MapPrefs {
    fn default() -> Self {
        Self { zoom_to_cursor: true, dot_size: DotSize::Medium }
    }
}

impl MapPrefs {
    /// Read preferences from `store`, keeping defaults for anything missing or unrecognized.
    #[must_use]
    pub fn load(store: &dyn PrefStore) -> Self {
        let mut prefs = Self::default();
        match store.get(DOT_SIZE_KEY) {
            Ok(Some(raw)) => match raw.parse() {
                Ok(size) => prefs.dot_size = size,
                Err(err) => tracing::debug!(%err, "ignoring stored dot size"),
            },
            Ok(None) => {}
            Err(err) => tracing::warn!(%err, key = DOT_SIZE_KEY, "preference read failed"),
        }
        match store.get(ZOOM_TO_CURSOR_KEY) {
            Ok(Some(raw)) => match raw.as_str() {
                "true" => prefs.zoom_to_cursor = true,
                "false" => prefs.zoom_to_cursor = false,
                other => tracing::debug!(value = other, "ignoring stored zoom-to-cursor"),
            },
            Ok(None) => {}
            Err(err) => tracing::warn!(%err, key = ZOOM_TO_CURSOR_KEY, "preference read failed"),
        }
        prefs
    }

    /// Write both preferences to `store`.
    ///
    /// # Errors
    ///
    /// Returns the first storage error encountered.
    pub fn try_save(&self, store: &mut dyn PrefStore) -> Result<(), PrefsError> {
        store.set(DOT_SIZE_KEY, self.dot_size.as_str())?;
        store.set(ZOOM_TO_CURSOR_KEY, if self.zoom_to_cursor { "true" } else { "false" })?;
        Ok(())
    }

    /// Write both preferences, logging instead of failing.
    pub fn save(&self, store: &mut dyn PrefStore) {
        if let Err(err) = self.try_save(store) {
            tracing::warn!(%err, "preference write failed");
        }
    }
}

/// In-process store, lost when dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PrefStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PrefsError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Store backed by a JSON object file on disk.
///
/// The file is re-read on every access so separate instances pointing at the
/// same path see each other's writes.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, PrefsError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(err.into()),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }
}

impl PrefStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PrefsError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
        let mut values = self.read_all()?;
        values.insert(key.to_owned(), value.to_owned());
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&values)?)?;
        Ok(())
    }
}

/// Browser `localStorage`, the store the web dashboard uses.
#[cfg(feature = "web")]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

#[cfg(feature = "web")]
impl LocalStorage {
    /// Open the window's `localStorage`.
    ///
    /// # Errors
    ///
    /// Returns [`PrefsError::Unavailable`] outside a browser or when storage is disabled.
    pub fn open() -> Result<Self, PrefsError> {
        let window = web_sys::window().ok_or_else(|| PrefsError::Unavailable("no window".to_owned()))?;
        match window.local_storage() {
            Ok(Some(storage)) => Ok(Self { storage }),
            Ok(None) => Err(PrefsError::Unavailable("localStorage disabled".to_owned())),
            Err(err) => Err(PrefsError::Unavailable(format!("{err:?}"))),
        }
    }
}

#[cfg(feature = "web")]
impl PrefStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PrefsError> {
        self.storage.get_item(key).map_err(|err| PrefsError::Unavailable(format!("{err:?}")))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.storage.set_item(key, value).map_err(|err| PrefsError::Unavailable(format!("{err:?}")))
    }
}
