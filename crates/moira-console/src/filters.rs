//! Stored trigger-list filters.
//!
//! The last trigger-list search is written to a small JSON file. When a
//! location carries no filter, the stored tags and problem flag are used
//! instead. Screens never read the file themselves: the caller loads a
//! [`FilterDefaults`] snapshot once per navigation and passes it in.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConsoleError, Result};
use crate::location::TriggerListSearch;

/// File name of the store inside the data directory.
pub const FILTERS_FILE: &str = "filters.json";

/// Filters applied when a location leaves them unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterDefaults {
    /// Tags to filter by.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Show only triggers with problems.
    #[serde(default)]
    pub only_problems: bool,
}

/// JSON file holding the last trigger-list search.
#[derive(Debug, Clone)]
pub struct FilterStore {
    path: PathBuf,
}

impl FilterStore {
    /// A store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The store in the per-user data directory, if one exists.
    #[must_use]
    pub fn default_location() -> Option<Self> {
        dirs::data_dir().map(|dir| Self::new(dir.join("moira").join(FILTERS_FILE)))
    }

    /// Backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored defaults.
    ///
    /// A missing file yields empty defaults. So does an unreadable or
    /// malformed one, after a warning.
    #[must_use]
    pub fn load(&self) -> FilterDefaults {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return FilterDefaults::default(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read stored filters");
                return FilterDefaults::default();
            }
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "ignoring malformed stored filters");
            FilterDefaults::default()
        })
    }

    /// Stores `search` as the new defaults.
    pub fn save(&self, search: &TriggerListSearch) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(search)
            .map_err(|e| ConsoleError::Format(format!("JSON serialization failed: {e}")))?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_empty_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilterStore::new(dir.path().join("none.json"));
        assert_eq!(store.load(), FilterDefaults::default());
    }

    #[test]
    fn saved_search_becomes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilterStore::new(dir.path().join("nested").join(FILTERS_FILE));
        let search = TriggerListSearch {
            page: 4,
            tags: vec!["prod".into()],
            only_problems: true,
            trigger_name: "cpu".into(),
        };
        store.save(&search).unwrap();

        let defaults = store.load();
        assert_eq!(defaults.tags, vec!["prod"]);
        assert!(defaults.only_problems);
    }

    #[test]
    fn malformed_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILTERS_FILE);
        fs::write(&path, "{not json").unwrap();
        assert_eq!(FilterStore::new(path).load(), FilterDefaults::default());
    }
}
