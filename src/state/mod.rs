//! Persisted one-shot flags, following XDG Base Directory standards.
//!
//! Two notices are only shown once: the welcome message about the missing API
//! key and the "retrieved geolocation" confirmation. Whether they were shown
//! is remembered as empty marker files under
//! `XDG_STATE_HOME/themeflux/{namespace}/flags/`, keeping state separate from
//! configuration.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::common::constants::PACKAGE_NAME;

/// A persisted one-shot gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    /// The first successful location fetch was announced
    FirstFetch,
    /// The welcome message about the missing API key was shown
    Welcome,
}

impl Flag {
    pub const ALL: [Flag; 2] = [Flag::FirstFetch, Flag::Welcome];

    fn file_name(&self) -> &'static str {
        match self {
            Flag::FirstFetch => "first_fetch",
            Flag::Welcome => "welcome",
        }
    }
}

impl std::fmt::Display for Flag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.file_name())
    }
}

/// Storage for [`Flag`]s.
pub trait FlagStore {
    fn is_set(&self, flag: Flag) -> bool;
    fn set(&mut self, flag: Flag) -> Result<()>;
    fn clear(&mut self, flag: Flag) -> Result<()>;
}

/// Get the state directory for a given configuration directory.
///
/// State is stored in XDG_STATE_HOME/themeflux/{namespace} where namespace is:
/// - "default" for the default config directory
/// - "custom_<hash>" for custom config directories (via --config)
pub fn get_state_dir(config_dir: Option<&Path>) -> Result<PathBuf> {
    let state_home = std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("/tmp"))
                .join(".local/state")
        });

    let state_base = state_home.join(PACKAGE_NAME);

    let namespace = match config_dir {
        None => "default".to_string(),
        Some(path) => {
            let default_config = dirs::config_dir()
                .context("Could not determine config directory")?
                .join(PACKAGE_NAME);
            if path == default_config {
                "default".to_string()
            } else {
                get_state_namespace(path)
            }
        }
    };

    Ok(state_base.join(namespace))
}

/// Stable namespace for a custom config directory.
fn get_state_namespace(config_path: &Path) -> String {
    let canonical = config_path
        .canonicalize()
        .unwrap_or_else(|_| config_path.to_path_buf());

    let hash = sha256::digest(canonical.to_string_lossy().as_bytes());
    format!("custom_{}", &hash[..16])
}

/// Flags stored as marker files in a directory.
#[derive(Debug, Clone)]
pub struct FileFlagStore {
    dir: PathBuf,
}

impl FileFlagStore {
    /// Store flags in `dir`, which is created on first write.
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// The store for the active configuration directory.
    pub fn for_config_dir(config_dir: Option<&Path>) -> Result<Self> {
        Ok(Self::new(get_state_dir(config_dir)?.join("flags")))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, flag: Flag) -> PathBuf {
        self.dir.join(flag.file_name())
    }
}

impl FlagStore for FileFlagStore {
    fn is_set(&self, flag: Flag) -> bool {
        self.path(flag).exists()
    }

    fn set(&mut self, flag: Flag) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create state directory {}", self.dir.display()))?;
        let path = self.path(flag);
        fs::write(&path, b"")
            .with_context(|| format!("Failed to write flag file {}", path.display()))
    }

    fn clear(&mut self, flag: Flag) -> Result<()> {
        let path = self.path(flag);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to remove flag file {}", path.display()))
            }
        }
    }
}

/// Flags held in memory. Clones share the same set.
#[derive(Debug, Clone, Default)]
pub struct MemoryFlagStore {
    flags: Arc<Mutex<HashSet<Flag>>>,
}

impl MemoryFlagStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store with the given flags already set.
    pub fn with_flags(flags: &[Flag]) -> Self {
        let store = Self::default();
        if let Ok(mut set) = store.flags.lock() {
            set.extend(flags.iter().copied());
        }
        store
    }
}

impl FlagStore for MemoryFlagStore {
    fn is_set(&self, flag: Flag) -> bool {
        self.flags
            .lock()
            .map(|set| set.contains(&flag))
            .unwrap_or(false)
    }

    fn set(&mut self, flag: Flag) -> Result<()> {
        self.flags
            .lock()
            .map_err(|_| anyhow::anyhow!("flag store lock poisoned"))?
            .insert(flag);
        Ok(())
    }

    fn clear(&mut self, flag: Flag) -> Result<()> {
        self.flags
            .lock()
            .map_err(|_| anyhow::anyhow!("flag store lock poisoned"))?
            .remove(&flag);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempdir().unwrap();
        let mut store = FileFlagStore::new(dir.path().join("flags"));

        assert!(!store.is_set(Flag::Welcome));
        store.set(Flag::Welcome).unwrap();
        assert!(store.is_set(Flag::Welcome));
        assert!(!store.is_set(Flag::FirstFetch));
        assert!(dir.path().join("flags").join("welcome").exists());

        store.clear(Flag::Welcome).unwrap();
        assert!(!store.is_set(Flag::Welcome));
    }

    #[test]
    fn test_clearing_unset_flag_is_ok() {
        let dir = tempdir().unwrap();
        let mut store = FileFlagStore::new(dir.path().to_path_buf());
        assert!(store.clear(Flag::FirstFetch).is_ok());
    }

    #[test]
    fn test_flags_survive_new_store() {
        let dir = tempdir().unwrap();
        FileFlagStore::new(dir.path().to_path_buf())
            .set(Flag::FirstFetch)
            .unwrap();
        assert!(FileFlagStore::new(dir.path().to_path_buf()).is_set(Flag::FirstFetch));
    }

    #[test]
    fn test_memory_store_clones_share_state() {
        let mut store = MemoryFlagStore::new();
        let observer = store.clone();
        store.set(Flag::Welcome).unwrap();
        assert!(observer.is_set(Flag::Welcome));

        let preset = MemoryFlagStore::with_flags(&Flag::ALL);
        assert!(preset.is_set(Flag::FirstFetch));
        assert!(preset.is_set(Flag::Welcome));
    }

    #[test]
    #[serial]
    fn test_state_dir_namespaces() {
        let state_home = tempdir().unwrap();
        let original = std::env::var("XDG_STATE_HOME").ok();
        unsafe {
            std::env::set_var("XDG_STATE_HOME", state_home.path());
        }

        let default_dir = get_state_dir(None).unwrap();
        assert_eq!(default_dir, state_home.path().join("themeflux/default"));

        let custom = tempdir().unwrap();
        let custom_dir = get_state_dir(Some(custom.path())).unwrap();
        let namespace = custom_dir.file_name().unwrap().to_string_lossy().to_string();
        assert!(namespace.starts_with("custom_"));
        assert_eq!(namespace.len(), "custom_".len() + 16);
        // Stable across calls
        assert_eq!(get_state_dir(Some(custom.path())).unwrap(), custom_dir);

        unsafe {
            match original {
                Some(value) => std::env::set_var("XDG_STATE_HOME", value),
                None => std::env::remove_var("XDG_STATE_HOME"),
            }
        }
    }
}
