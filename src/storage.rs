//! Storage layer for tdo
//!
//! One durable slot: `state.json` in the data directory, holding the whole
//! task aggregate. Writes are atomic (temp file + rename) so a crash mid-save
//! never corrupts the previous snapshot. Loads degrade gracefully: a missing
//! or malformed snapshot reads as "no data" rather than failing startup.
//!
//! # Directory layout
//!
//! ```text
//! <data dir>/              # platform data dir, or $TDO_DATA_DIR / --data-dir
//!   state.json             # persisted TodosState snapshot
//!   config.toml            # optional configuration
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::task::{TodosState, STATE_SCHEMA_VERSION};

/// File name of the persisted snapshot
pub const STATE_FILE: &str = "state.json";

/// File name of the optional configuration file
pub const CONFIG_FILE: &str = "config.toml";

/// Environment override for the data directory
pub const DATA_DIR_ENV: &str = "TDO_DATA_DIR";

/// On-disk wrapper around the aggregate. The version field lets a decoder
/// refuse snapshots written by an incompatible schema instead of guessing.
#[derive(Debug, Serialize, Deserialize)]
struct StateSnapshot {
    schema_version: String,
    saved_at: DateTime<Utc>,
    #[serde(flatten)]
    state: TodosState,
}

/// Storage manager for tdo state
#[derive(Debug, Clone)]
pub struct Storage {
    data_dir: PathBuf,
}

impl Storage {
    /// Create a storage manager rooted at an explicit directory.
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Resolve the data directory: explicit flag, then `TDO_DATA_DIR`, then
    /// the platform data dir.
    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self> {
        if let Some(dir) = explicit {
            return Ok(Self::new(dir));
        }
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
            let dir = PathBuf::from(dir);
            if !dir.as_os_str().is_empty() {
                return Ok(Self::new(dir));
            }
        }
        let dirs = ProjectDirs::from("dev", "tdo", "tdo").ok_or_else(|| {
            Error::OperationFailed("could not determine a data directory".to_string())
        })?;
        Ok(Self::new(dirs.data_dir().to_path_buf()))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn state_file(&self) -> PathBuf {
        self.data_dir.join(STATE_FILE)
    }

    pub fn config_file(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE)
    }

    /// Load the persisted aggregate.
    ///
    /// Returns `None` when the slot is absent, unreadable, or holds a shape
    /// this version does not understand. A corrupted snapshot must never
    /// crash startup; the caller falls back to an empty store.
    pub fn load_state(&self) -> Option<TodosState> {
        let path = self.state_file();
        if !path.exists() {
            return None;
        }

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "failed to read state file");
                return None;
            }
        };

        let snapshot: StateSnapshot = match serde_json::from_str(&content) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "malformed state file, starting empty");
                return None;
            }
        };

        if snapshot.schema_version != STATE_SCHEMA_VERSION {
            tracing::warn!(
                found = %snapshot.schema_version,
                expected = STATE_SCHEMA_VERSION,
                "state file schema mismatch, starting empty"
            );
            return None;
        }

        Some(snapshot.state)
    }

    /// Mirror the aggregate to the durable slot.
    ///
    /// Errors propagate to the caller; the store layer logs and swallows them
    /// so a failed mirror never breaks an in-memory mutation.
    pub fn save_state(&self, state: &TodosState) -> Result<()> {
        let snapshot = StateSnapshot {
            schema_version: STATE_SCHEMA_VERSION.to_string(),
            saved_at: Utc::now(),
            state: state.clone(),
        };
        let json = serde_json::to_string_pretty(&snapshot)?;
        self.write_atomic(&self.state_file(), json.as_bytes())
    }

    /// Write data atomically using temp file + rename, so readers never see a
    /// partial snapshot.
    pub fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = path.with_extension("tmp");
        let mut file = File::create(&temp_path)?;
        file.write_all(data)?;
        file.sync_all()?;

        fs::rename(&temp_path, path)?;
        Ok(())
    }
}
