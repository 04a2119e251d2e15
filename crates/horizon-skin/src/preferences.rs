//! Preference storage.
//!
//! Windows read preferences when they open (position, size and persisted
//! control values) and write them when they close. The store is a flat map of
//! dotted names to integers, floats and strings.
//!
//! [`FilePreferences`] keeps the map in a TOML file:
//!
//! ```toml
//! "main.x" = 120
//! "main.y" = 80
//! "main.Vol" = 0.7
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use horizon_skin_core::logging::targets;
use serde::{Deserialize, Serialize};

use crate::error::{SkinError, SkinResult};

/// A stored preference value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    Int(i64),
    Float(f64),
    String(String),
}

/// Named get/set of integers, floats and strings.
pub trait Preferences {
    /// Read an integer.
    fn get_int(&self, key: &str) -> Option<i64>;

    /// Write an integer.
    fn set_int(&mut self, key: &str, value: i64);

    /// Read a float. Integers are widened.
    fn get_float(&self, key: &str) -> Option<f64>;

    /// Write a float.
    fn set_float(&mut self, key: &str, value: f64);

    /// Read a string.
    fn get_string(&self, key: &str) -> Option<String>;

    /// Write a string.
    fn set_string(&mut self, key: &str, value: &str);

    /// Persist pending changes.
    fn flush(&mut self) -> SkinResult<()> {
        Ok(())
    }
}

/// Preferences kept in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryPreferences {
    values: BTreeMap<String, PrefValue>,
}

impl MemoryPreferences {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored entries, sorted by key.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &PrefValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Preferences for MemoryPreferences {
    fn get_int(&self, key: &str) -> Option<i64> {
        match self.values.get(key)? {
            PrefValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    fn set_int(&mut self, key: &str, value: i64) {
        self.values.insert(key.to_string(), PrefValue::Int(value));
    }

    fn get_float(&self, key: &str) -> Option<f64> {
        match self.values.get(key)? {
            PrefValue::Float(v) => Some(*v),
            PrefValue::Int(v) => Some(*v as f64),
            PrefValue::String(_) => None,
        }
    }

    fn set_float(&mut self, key: &str, value: f64) {
        self.values.insert(key.to_string(), PrefValue::Float(value));
    }

    fn get_string(&self, key: &str) -> Option<String> {
        match self.values.get(key)? {
            PrefValue::String(v) => Some(v.clone()),
            _ => None,
        }
    }

    fn set_string(&mut self, key: &str, value: &str) {
        self.values
            .insert(key.to_string(), PrefValue::String(value.to_string()));
    }
}

/// Preferences backed by a TOML file.
///
/// The file is read once on [`open`](Self::open) and rewritten on
/// [`flush`](Preferences::flush) when anything changed.
#[derive(Debug, Clone)]
pub struct FilePreferences {
    path: PathBuf,
    values: MemoryPreferences,
    dirty: bool,
}

impl FilePreferences {
    /// Open a preferences file. A missing file yields an empty store.
    pub fn open(path: impl Into<PathBuf>) -> SkinResult<Self> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(text) => MemoryPreferences {
                values: toml::from_str(&text)?,
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => MemoryPreferences::new(),
            Err(source) => {
                return Err(SkinError::Io {
                    path: path.display().to_string(),
                    source,
                });
            }
        };
        tracing::debug!(
            target: targets::SKIN,
            path = %path.display(),
            entries = values.len(),
            "preferences loaded"
        );
        Ok(Self {
            path,
            values,
            dirty: false,
        })
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether there are unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

impl Preferences for FilePreferences {
    fn get_int(&self, key: &str) -> Option<i64> {
        self.values.get_int(key)
    }

    fn set_int(&mut self, key: &str, value: i64) {
        self.values.set_int(key, value);
        self.dirty = true;
    }

    fn get_float(&self, key: &str) -> Option<f64> {
        self.values.get_float(key)
    }

    fn set_float(&mut self, key: &str, value: f64) {
        self.values.set_float(key, value);
        self.dirty = true;
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self.values.get_string(key)
    }

    fn set_string(&mut self, key: &str, value: &str) {
        self.values.set_string(key, value);
        self.dirty = true;
    }

    fn flush(&mut self) -> SkinResult<()> {
        if !self.dirty {
            return Ok(());
        }
        let text = toml::to_string(&self.values.values)?;
        std::fs::write(&self.path, text).map_err(|source| SkinError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        self.dirty = false;
        Ok(())
    }
}
