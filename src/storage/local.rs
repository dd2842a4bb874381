//! Local filesystem state store.
//!
//! ## Write Protocol
//!
//! 1. Serialize the state to pretty JSON
//! 2. Write it to a fresh temp file next to the target (`O_EXCL`, random name)
//! 3. Flush and `fsync` the temp file
//! 4. Rename the temp file over the target, then `fsync` the directory
//!
//! Steps 1-3 are [`LocalStateStore::stage`], step 4 is
//! [`StagedWrite::commit`]. A [`StagedWrite`] dropped without committing
//! removes its temp file, so the target only ever holds the previous or the
//! new complete document.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{AppError, Result};
use crate::models::CursorState;
use crate::storage::{Recovery, StateLoad, StateStore};

/// JSON state file on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalStateStore {
    path: PathBuf,
}

impl LocalStateStore {
    /// Create a store for the given state file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the state file (`.` for a bare file name).
    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// Write `state` to a synced temp file without touching the target.
    pub fn stage(&self, state: &CursorState) -> Result<StagedWrite> {
        let bytes = serde_json::to_vec_pretty(state)?;
        let dir = self.dir();
        let fail = |e: std::io::Error| AppError::persist(&self.path, e);

        fs::create_dir_all(dir).map_err(fail)?;

        let prefix = format!(
            ".{}.",
            self.path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("state")
        );
        let mut temp = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(fail)?;

        temp.write_all(&bytes).map_err(fail)?;
        temp.flush().map_err(fail)?;
        temp.as_file().sync_all().map_err(fail)?;

        Ok(StagedWrite {
            temp,
            target: self.path.clone(),
        })
    }
}

/// A fully written temp file waiting to replace the state file.
#[derive(Debug)]
pub struct StagedWrite {
    temp: NamedTempFile,
    target: PathBuf,
}

impl StagedWrite {
    pub fn temp_path(&self) -> &Path {
        self.temp.path()
    }

    /// Atomically rename the temp file over the target.
    pub fn commit(self) -> Result<()> {
        let target = self.target;
        self.temp
            .persist(&target)
            .map_err(|e| AppError::persist(&target, e.error))?;

        sync_parent(&target);
        Ok(())
    }
}

/// Make the rename itself durable. The new state is already visible at this
/// point, so a failure here is only logged.
#[cfg(unix)]
fn sync_parent(target: &Path) {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if let Err(e) = fs::File::open(dir).and_then(|d| d.sync_all()) {
        log::warn!("Could not sync directory {}: {}", dir.display(), e);
    }
}

#[cfg(not(unix))]
fn sync_parent(_target: &Path) {}

impl StateStore for LocalStateStore {
    fn load(&self) -> StateLoad {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return StateLoad::recovered(Recovery::Missing);
            }
            Err(e) => return StateLoad::recovered(Recovery::Unreadable(e.to_string())),
        };

        match serde_json::from_str(&content) {
            Ok(state) => StateLoad::Loaded(state),
            Err(e) => StateLoad::recovered(Recovery::Corrupt(e.to_string())),
        }
    }

    fn save(&self, state: &CursorState) -> Result<()> {
        self.stage(state)?.commit()
    }
}
