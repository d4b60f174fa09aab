// Snapshot persistence: the last listing is written to `~/tasks.json` on
// every listing run. The file is never read back.

use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::value::RawValue;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const SNAPSHOT_FILE: &str = "tasks.json";

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TaskSnapshot<'a> {
    /// Unix seconds, serialized as a string.
    pub last_accessed: String,
    pub tasks: &'a RawValue,
}

impl<'a> TaskSnapshot<'a> {
    pub fn new(tasks: &'a RawValue, last_accessed: i64) -> Self {
        TaskSnapshot {
            last_accessed: last_accessed.to_string(),
            tasks,
        }
    }
}

/// `{home}/tasks.json`.
pub fn default_snapshot_path() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or(Error::NoHomeDir)?;
    Ok(home.join(SNAPSHOT_FILE))
}

/// Overwrite `path` with the snapshot, creating the file if needed.
pub fn write_snapshot(path: &Path, snapshot: &TaskSnapshot<'_>) -> Result<()> {
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|e| Error::persistence(path, e))?;

    serde_json::to_writer(&mut file, snapshot)
        .map_err(|e| Error::persistence(path, e.into()))?;
    file.flush().map_err(|e| Error::persistence(path, e))?;

    debug!(path = %path.display(), "wrote snapshot");
    Ok(())
}
