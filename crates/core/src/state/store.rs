use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};

use super::SelectionState;

/// Directory under the workspace root holding front-end files.
pub const STATE_DIR: &str = ".xcrunner";
const STATE_FILE: &str = "state.json";

/// Persistent selection memory for one workspace root.
///
/// Mutations only mark the store dirty when they change the document, and
/// [`flush`](SelectionStore::flush) writes at most once per batch of
/// changes. Concurrent runs race on the file with a last-writer-wins
/// outcome; the document is small enough that this loses a preference at
/// worst.
#[derive(Debug)]
pub struct SelectionStore {
    path: PathBuf,
    state: SelectionState,
    dirty: bool,
}

impl SelectionStore {
    pub fn state_path(root: &Path) -> PathBuf {
        root.join(STATE_DIR).join(STATE_FILE)
    }

    /// Load the store for a workspace root.
    ///
    /// A missing file is an empty store. A file that exists but does not
    /// parse is [`Error::CorruptState`], so callers can tell a damaged
    /// document from a fresh one.
    pub fn load(root: &Path) -> Result<Self> {
        let path = Self::state_path(root);
        let state = match fs::read_to_string(&path) {
            Ok(contents) => {
                serde_json::from_str(&contents).map_err(|source| Error::CorruptState {
                    path: path.clone(),
                    source,
                })?
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => SelectionState::default(),
            Err(err) => return Err(err.into()),
        };
        debug!(path = %path.display(), "loaded selection state");
        Ok(Self {
            path,
            state,
            dirty: false,
        })
    }

    /// Load, trading a corrupt document for an empty store with a warning.
    pub fn load_or_default(root: &Path) -> Self {
        match Self::load(root) {
            Ok(store) => store,
            Err(err) => {
                warn!("discarding unreadable selection state: {err}");
                Self {
                    path: Self::state_path(root),
                    state: SelectionState::default(),
                    dirty: false,
                }
            }
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.state.get_str(key)
    }

    /// Record a selection. Remembering the value already stored is a
    /// no-op and leaves the store clean.
    pub fn remember(&mut self, key: &str, value: impl Into<Value>) {
        let value = value.into();
        if self.state.get(key) == Some(&value) {
            return;
        }
        self.state = self.state.with(key, value);
        self.dirty = true;
    }

    pub fn forget(&mut self, key: &str) {
        if !self.state.contains(key) {
            return;
        }
        self.state = self.state.without(key);
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Write the document back if anything changed since the last flush.
    pub fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let contents = serde_json::to_string_pretty(&self.state)?;
        fs::write(&self.path, contents)?;
        self.dirty = false;
        debug!(path = %self.path.display(), "flushed selection state");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{DESTINATION_KEY, SCHEME_KEY};
    use tempfile::TempDir;

    #[test]
    fn missing_file_loads_an_empty_store() -> Result<()> {
        let dir = TempDir::new()?;
        let mut store = SelectionStore::load(dir.path())?;
        assert!(store.state().is_empty());
        assert!(!store.is_dirty());

        // A clean store never touches the disk.
        store.flush()?;
        assert!(!SelectionStore::state_path(dir.path()).exists());
        Ok(())
    }

    #[test]
    fn remembered_selections_survive_a_reload() -> Result<()> {
        let dir = TempDir::new()?;

        let mut store = SelectionStore::load(dir.path())?;
        store.remember(SCHEME_KEY, "App");
        store.remember(DESTINATION_KEY, "ABC-123");
        store.flush()?;

        let reloaded = SelectionStore::load(dir.path())?;
        assert_eq!(reloaded.get_str(SCHEME_KEY), Some("App"));
        assert_eq!(reloaded.get_str(DESTINATION_KEY), Some("ABC-123"));
        Ok(())
    }

    #[test]
    fn corrupt_document_is_a_distinct_error() -> Result<()> {
        let dir = TempDir::new()?;
        let path = SelectionStore::state_path(dir.path());
        fs::create_dir_all(path.parent().unwrap())?;
        fs::write(&path, "{not json")?;

        match SelectionStore::load(dir.path()) {
            Err(Error::CorruptState { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected CorruptState, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn load_or_default_recovers_from_corruption() -> Result<()> {
        let dir = TempDir::new()?;
        let path = SelectionStore::state_path(dir.path());
        fs::create_dir_all(path.parent().unwrap())?;
        fs::write(&path, "{not json")?;

        let store = SelectionStore::load_or_default(dir.path());
        assert!(store.state().is_empty());
        Ok(())
    }

    #[test]
    fn rewriting_the_same_value_stays_clean() -> Result<()> {
        let dir = TempDir::new()?;
        let mut store = SelectionStore::load(dir.path())?;

        store.remember(SCHEME_KEY, "App");
        assert!(store.is_dirty());
        store.flush()?;
        assert!(!store.is_dirty());

        store.remember(SCHEME_KEY, "App");
        assert!(!store.is_dirty());
        Ok(())
    }

    #[test]
    fn flush_creates_the_state_directory() -> Result<()> {
        let dir = TempDir::new()?;
        let mut store = SelectionStore::load(dir.path())?;
        store.remember(SCHEME_KEY, "App");
        store.flush()?;

        assert!(SelectionStore::state_path(dir.path()).is_file());
        Ok(())
    }

    #[test]
    fn forgetting_a_key_dirties_the_store() -> Result<()> {
        let dir = TempDir::new()?;
        let mut store = SelectionStore::load(dir.path())?;
        store.remember(SCHEME_KEY, "App");
        store.flush()?;

        store.forget(SCHEME_KEY);
        assert!(store.is_dirty());
        store.flush()?;

        let reloaded = SelectionStore::load(dir.path())?;
        assert_eq!(reloaded.get_str(SCHEME_KEY), None);
        Ok(())
    }

    #[test]
    fn forgetting_an_absent_key_is_a_no_op() -> Result<()> {
        let dir = TempDir::new()?;
        let mut store = SelectionStore::load(dir.path())?;
        store.forget(SCHEME_KEY);
        assert!(!store.is_dirty());
        Ok(())
    }

    #[test]
    fn unknown_keys_survive_a_rewrite() -> Result<()> {
        let dir = TempDir::new()?;
        let path = SelectionStore::state_path(dir.path());
        fs::create_dir_all(path.parent().unwrap())?;
        fs::write(&path, r#"{"future.key": {"nested": true}}"#)?;

        let mut store = SelectionStore::load(dir.path())?;
        store.remember(SCHEME_KEY, "App");
        store.flush()?;

        let reloaded = SelectionStore::load(dir.path())?;
        assert_eq!(reloaded.get_str(SCHEME_KEY), Some("App"));
        assert!(reloaded.state().get("future.key").is_some());
        Ok(())
    }
}
