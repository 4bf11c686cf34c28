//! Whole-file JSON persistence shared by every store
//!
//! Each record set lives in its own file under the data directory and is
//! rewritten in full on every save. There is no partial update.

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::constants::{env as env_vars, paths};

/// Root directory holding todos.json, urls.json and settings.json
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve the data directory
    /// Priority: explicit override > env var > platform data dir > ./data
    pub fn resolve(explicit: Option<PathBuf>) -> Self {
        if let Some(root) = explicit {
            return Self::new(root);
        }
        if let Ok(root) = env::var(env_vars::DATA_DIR)
            && !root.trim().is_empty()
        {
            return Self::new(root);
        }
        let root = dirs::data_dir()
            .map(|p| p.join(paths::APP_DIR))
            .unwrap_or_else(|| PathBuf::from(paths::FALLBACK_DIR));
        Self::new(root)
    }

    /// Create the directory if it does not exist yet
    pub fn ensure(&self) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create data directory {}", self.root.display()))?;
        debug!(path = %self.root.display(), "Data directory ready");
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn todos(&self) -> PathBuf {
        self.root.join(paths::TODOS_FILE)
    }

    pub fn urls(&self) -> PathBuf {
        self.root.join(paths::URLS_FILE)
    }

    pub fn settings(&self) -> PathBuf {
        self.root.join(paths::SETTINGS_FILE)
    }
}

/// Read a JSON file, falling back to `T::default()`
///
/// A missing file is normal on first run. A malformed file is logged and
/// copied to `<name>.json.bak` before the next save can overwrite it.
pub fn load_or_default<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    match fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str::<T>(&contents) {
            Ok(value) => value,
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to parse data file, starting empty");
                back_up(path);
                T::default()
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %path.display(), "No data file yet, starting empty");
            T::default()
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "Failed to read data file, starting empty");
            T::default()
        }
    }
}

fn back_up(path: &Path) {
    let backup = path.with_extension("json.bak");
    match fs::copy(path, &backup) {
        Ok(_) => warn!(backup = %backup.display(), "Kept a copy of the unreadable file"),
        Err(e) => error!(backup = %backup.display(), error = %e, "Failed to back up unreadable file"),
    }
}

/// Rewrite a JSON file in full
///
/// Goes through a sibling `.json.tmp` file renamed over `path`.
pub fn save_json<T>(path: &Path, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let contents = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, contents).with_context(|| format!("Failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("Failed to replace {}", path.display()))?;
    debug!(path = %path.display(), "Saved data file");
    Ok(())
}
