use std::fs;
use std::io;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::util::write_atomic;
use crate::workspace::WorkspaceSnapshot;

/// Persists `WorkspaceSnapshot`s as pretty JSON using atomic writes.
/// 以 JSON 搭配原子寫入方式儲存工作區快照。
#[derive(Debug)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    /// Constructs a store bound to the provided path.
    /// 建立綁定至指定路徑的儲存器。
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads a snapshot from disk, returning `Ok(None)` when the file is absent.
    /// 從磁碟載入快照；若檔案不存在則回傳 `Ok(None)`。
    pub fn load(&self) -> Result<Option<WorkspaceSnapshot>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let snapshot = from_json(&contents)?;
                debug!(path = %self.path.display(), "loaded snapshot");
                Ok(Some(snapshot))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::Io(err)),
        }
    }

    /// Saves the snapshot atomically, creating parent directories as needed.
    /// 將快照以原子方式寫入磁碟。
    pub fn save(&self, snapshot: &WorkspaceSnapshot) -> Result<(), StoreError> {
        let payload = to_json(snapshot)?;
        write_atomic(&self.path, payload.as_bytes())?;
        info!(path = %self.path.display(), tabs = snapshot.tabs.len(), "saved snapshot");
        Ok(())
    }
}

/// Serializes a snapshot to pretty JSON.
pub fn to_json(snapshot: &WorkspaceSnapshot) -> Result<String, StoreError> {
    serde_json::to_string_pretty(snapshot).map_err(invalid)
}

/// Parses a snapshot produced by [`to_json`].
/// 解析由 [`to_json`] 產生的快照。
///
/// Folder nesting is unbounded, so the parser runs without serde_json's
/// recursion limit and grows its stack on demand.
pub fn from_json(contents: &str) -> Result<WorkspaceSnapshot, StoreError> {
    let mut json = serde_json::Deserializer::from_str(contents);
    json.disable_recursion_limit();
    let snapshot = WorkspaceSnapshot::deserialize(serde_stacker::Deserializer::new(&mut json))
        .map_err(invalid)?;
    json.end().map_err(invalid)?;
    Ok(snapshot)
}

fn invalid(err: serde_json::Error) -> StoreError {
    StoreError::Invalid(err.to_string())
}

/// Errors emitted by [`SnapshotStore`].
/// [`SnapshotStore`] 可能拋出的錯誤。
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("snapshot IO error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid snapshot payload: {0}")]
    Invalid(String),
}
