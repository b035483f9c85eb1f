//! Persistent key/value variable store.
//!
//! Variables are set via the `set name=value` directive and pre-fill
//! matching `{{name}}` placeholders in every command. They persist across
//! sessions in a YAML file; each mutation rewrites the whole mapping through
//! a temporary file followed by an atomic rename, so readers never observe a
//! torn write. A `BTreeMap` keeps the serialized form key-sorted and stable.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use log::{debug, warn};

use crate::error::{Error, Result};

const FILE_DESCRIPTION: &str = "variables";

/// Thread-safe store of user-defined variables, keyed by argument name.
///
/// Reads take a shared lock and never touch disk. Mutations take an
/// exclusive lock, then persist a snapshot taken outside the lock so disk
/// I/O never blocks readers.
pub struct VariableStore {
    inner: RwLock<BTreeMap<String, String>>,
    file_path: Option<PathBuf>,
}

impl VariableStore {
    /// Opens the store backed by `path`, loading any existing mapping.
    ///
    /// A missing file is a fresh install and yields an empty store; an empty
    /// file is valid. An unparsable file is an error: silently discarding it
    /// would lose every accumulated variable on the next save.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let variables = load_file(&path)?;

        if variables.is_empty() {
            debug!("no variables found, starting empty ({})", path.display());
        } else {
            debug!(
                "loaded {} variable(s) from {}",
                variables.len(),
                path.display()
            );
        }

        Ok(Self {
            inner: RwLock::new(variables),
            file_path: Some(path),
        })
    }

    /// Creates a store with persistence disabled.
    ///
    /// Used as a degraded fallback when the config directory cannot be
    /// created or the existing file is unreadable; mutations then only last
    /// for the current session.
    pub fn in_memory() -> Self {
        Self {
            inner: RwLock::new(BTreeMap::new()),
            file_path: None,
        }
    }

    /// Stores or overwrites a variable, then persists the whole mapping.
    ///
    /// On a persistence failure the in-memory value stands and the error is
    /// returned; callers surface it to the user.
    pub fn set(&self, name: &str, value: &str) -> Result<()> {
        let previous = self
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), value.to_string());

        let action = if previous.is_some() { "updated" } else { "set" };
        debug!("{action} variable: {name} = {value}");

        self.persist()
    }

    /// Looks up a variable. Never touches disk.
    pub fn get(&self, name: &str) -> Option<String> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Removes a variable, persisting only if it existed.
    ///
    /// Returns whether the variable existed. A persistence failure after a
    /// successful removal is returned as an error; the in-memory removal
    /// stands.
    pub fn unset(&self, name: &str) -> Result<bool> {
        let existed = self
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)
            .is_some();

        if !existed {
            debug!("attempted to unset non-existent variable: {name}");
            return Ok(false);
        }

        debug!("unset variable: {name}");
        self.persist()?;
        Ok(true)
    }

    /// Returns a snapshot of all variables, safe to iterate without a lock.
    pub fn all(&self) -> BTreeMap<String, String> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Substitutes every stored variable whose `{{name}}` placeholder
    /// literally appears in `command`.
    ///
    /// Returns the resolved string and the names that were applied.
    pub fn apply_to_command(&self, command: &str) -> (String, Vec<String>) {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);

        let mut applied = Vec::new();
        let mut result = command.to_string();

        for (name, value) in guard.iter() {
            let placeholder = format!("{{{{{name}}}}}");
            if result.contains(&placeholder) {
                result = result.replace(&placeholder, value);
                applied.push(name.clone());
            }
        }

        (result, applied)
    }

    /// Path of the backing file, if persistence is enabled.
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Serializes a snapshot of the mapping and writes it atomically.
    ///
    /// The snapshot is taken under the read lock and released before any
    /// I/O. The data goes to `<path>.tmp` first and is renamed over the real
    /// path, so a crash mid-write leaves either the old or the new file.
    fn persist(&self) -> Result<()> {
        let Some(path) = &self.file_path else {
            return Ok(());
        };

        let snapshot = self.all();

        let serialized = serde_yaml::to_string(&snapshot).map_err(|e| {
            Error::yaml_error(
                "writing".to_string(),
                FILE_DESCRIPTION.to_string(),
                path.display().to_string(),
                e,
            )
        })?;

        let tmp_path = tmp_path_for(path);
        fs::write(&tmp_path, serialized).map_err(|e| {
            Error::io_error(
                FILE_DESCRIPTION.to_string(),
                tmp_path.display().to_string(),
                e,
            )
        })?;

        if let Err(e) = fs::rename(&tmp_path, path) {
            if let Err(cleanup) = fs::remove_file(&tmp_path) {
                warn!(
                    "failed to remove stale temp file {}: {cleanup}",
                    tmp_path.display()
                );
            }
            return Err(Error::io_error(
                FILE_DESCRIPTION.to_string(),
                path.display().to_string(),
                e,
            ));
        }

        debug!(
            "saved {} variable(s) to {}",
            snapshot.len(),
            path.display()
        );
        Ok(())
    }
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

fn load_file(path: &Path) -> Result<BTreeMap<String, String>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(e) => {
            return Err(Error::io_error(
                FILE_DESCRIPTION.to_string(),
                path.display().to_string(),
                e,
            ))
        }
    };

    // An empty file is a valid empty mapping
    if contents.trim().is_empty() {
        return Ok(BTreeMap::new());
    }

    serde_yaml::from_str(&contents).map_err(|e| {
        Error::yaml_error(
            "reading".to_string(),
            FILE_DESCRIPTION.to_string(),
            path.display().to_string(),
            e,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty_store() {
        let dir = tempdir().unwrap();
        let store = VariableStore::open(dir.path().join("variables.yml")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_empty_file_is_empty_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("variables.yml");
        fs::File::create(&path).unwrap();

        let store = VariableStore::open(&path).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("variables.yml");
        let mut file = fs::File::create(&path).unwrap();
        write!(file, "ip: [unterminated").unwrap();

        let result = VariableStore::open(&path);
        assert!(matches!(result, Err(Error::Yaml { .. })));
    }

    #[test]
    fn test_set_then_get_same_process() {
        let dir = tempdir().unwrap();
        let store = VariableStore::open(dir.path().join("variables.yml")).unwrap();

        store.set("ip", "10.0.0.1").unwrap();
        assert_eq!(store.get("ip"), Some("10.0.0.1".to_string()));
        assert_eq!(store.get("missing"), None);
    }

    #[test]
    fn test_set_persists_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("variables.yml");

        let store = VariableStore::open(&path).unwrap();
        store.set("ip", "10.0.0.1").unwrap();
        store.set("user", "admin").unwrap();
        drop(store);

        let reopened = VariableStore::open(&path).unwrap();
        assert_eq!(reopened.get("ip"), Some("10.0.0.1".to_string()));
        assert_eq!(reopened.get("user"), Some("admin".to_string()));
        assert_eq!(reopened.len(), 2);
    }

    #[test]
    fn test_set_overwrites_existing_value() {
        let dir = tempdir().unwrap();
        let store = VariableStore::open(dir.path().join("variables.yml")).unwrap();

        store.set("ip", "10.0.0.1").unwrap();
        store.set("ip", "10.0.0.2").unwrap();
        assert_eq!(store.get("ip"), Some("10.0.0.2".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_unset_existing_variable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("variables.yml");
        let store = VariableStore::open(&path).unwrap();

        store.set("ip", "10.0.0.1").unwrap();
        assert!(store.unset("ip").unwrap());
        assert_eq!(store.get("ip"), None);

        let reopened = VariableStore::open(&path).unwrap();
        assert!(reopened.is_empty());
    }

    #[test]
    fn test_unset_missing_variable_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("variables.yml");
        let store = VariableStore::open(&path).unwrap();

        assert!(!store.unset("missing").unwrap());
        // No mutation happened, so the file must not exist yet
        assert!(!path.exists());
    }

    #[test]
    fn test_persisted_file_is_key_sorted_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("variables.yml");
        let store = VariableStore::open(&path).unwrap();

        store.set("zeta", "3").unwrap();
        store.set("alpha", "1").unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let alpha = contents.find("alpha").unwrap();
        let zeta = contents.find("zeta").unwrap();
        assert!(alpha < zeta);
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("variables.yml");
        let store = VariableStore::open(&path).unwrap();

        store.set("ip", "10.0.0.1").unwrap();
        assert!(path.exists());
        assert!(!tmp_path_for(&path).exists());
    }

    #[test]
    fn test_all_returns_defensive_snapshot() {
        let dir = tempdir().unwrap();
        let store = VariableStore::open(dir.path().join("variables.yml")).unwrap();
        store.set("ip", "10.0.0.1").unwrap();

        let snapshot = store.all();
        store.set("port", "443").unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_apply_to_command_substitutes_and_reports() {
        let store = VariableStore::in_memory();
        store.set("ip", "10.0.0.1").unwrap();
        store.set("port", "443").unwrap();
        store.set("unused", "x").unwrap();

        let (resolved, applied) = store.apply_to_command("nmap -p {{port}} {{ip}} # {{ip}}");
        assert_eq!(resolved, "nmap -p 443 10.0.0.1 # 10.0.0.1");
        assert_eq!(applied, vec!["ip".to_string(), "port".to_string()]);
    }

    #[test]
    fn test_apply_to_command_without_matches() {
        let store = VariableStore::in_memory();
        let (resolved, applied) = store.apply_to_command("nmap {{ip}}");
        assert_eq!(resolved, "nmap {{ip}}");
        assert!(applied.is_empty());
    }

    #[test]
    fn test_in_memory_store_never_writes() {
        let store = VariableStore::in_memory();
        store.set("ip", "10.0.0.1").unwrap();
        assert_eq!(store.get("ip"), Some("10.0.0.1".to_string()));
        assert!(store.file_path().is_none());
    }
}
