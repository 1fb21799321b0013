use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::id::NodeId;
use crate::tree::FileNode;

/// Snapshot of a note taken when its tab was opened.
/// 開啟分頁時擷取的筆記快照。
///
/// Edits made through the tab never flow back into the tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OpenFile {
    pub id: NodeId,
    pub name: String,
    pub content: String,
}

impl From<&FileNode> for OpenFile {
    fn from(file: &FileNode) -> Self {
        Self {
            id: file.id.clone(),
            name: file.name.clone(),
            content: file.content.clone(),
        }
    }
}

/// Lifecycle state of a tab session.
/// 分頁工作階段的狀態。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    HasActive,
}

/// Result of a tab reorder request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderOutcome {
    Moved { from: usize, to: usize },
    Unchanged,
}

/// Ordered open tabs plus the focused one.
/// 已開啟分頁的順序與目前焦點分頁。
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TabSession {
    #[serde(default, rename = "openFiles")]
    open_files: Vec<OpenFile>,
    #[serde(default, rename = "activeID")]
    active_id: Option<NodeId>,
}

impl TabSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a tab for `file`, or focuses it when it is already open.
    /// 開啟檔案分頁；若已開啟則僅切換焦點。
    pub fn open_file(&mut self, file: &FileNode) {
        if self.position(&file.id).is_none() {
            self.open_files.push(OpenFile::from(file));
            debug!(id = %file.id, tabs = self.open_files.len(), "opened tab");
        }
        self.active_id = Some(file.id.clone());
    }

    /// Closes the tab with `id`, returning the removed entry.
    /// 關閉指定分頁並回傳被移除的項目。
    ///
    /// Closing the active tab focuses its left neighbour, or the new first tab
    /// when the closed one was first.
    pub fn close_file(&mut self, id: &NodeId) -> Option<OpenFile> {
        let index = self.position(id)?;
        let removed = self.open_files.remove(index);

        if self.open_files.is_empty() {
            self.active_id = None;
        } else if self.active_id.as_ref() == Some(id) {
            let neighbour = if index == 0 { 0 } else { index - 1 };
            self.active_id = Some(self.open_files[neighbour].id.clone());
        }
        debug!(%id, active = ?self.active_id, "closed tab");
        Some(removed)
    }

    /// Sets the focused tab without checking that it is open.
    pub fn set_active_id(&mut self, id: Option<NodeId>) {
        self.active_id = id;
    }

    pub fn active_id(&self) -> Option<&NodeId> {
        self.active_id.as_ref()
    }

    /// Returns the focused tab, or `None` when nothing open matches.
    /// 取得目前焦點分頁；若不存在則回傳 `None`。
    pub fn active_file(&self) -> Option<&OpenFile> {
        let active = self.active_id.as_ref()?;
        self.open_files.iter().find(|file| &file.id == active)
    }

    pub fn open_files(&self) -> &[OpenFile] {
        &self.open_files
    }

    pub fn get(&self, id: &NodeId) -> Option<&OpenFile> {
        self.open_files.iter().find(|file| &file.id == id)
    }

    pub fn position(&self, id: &NodeId) -> Option<usize> {
        self.open_files.iter().position(|file| &file.id == id)
    }

    pub fn len(&self) -> usize {
        self.open_files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open_files.is_empty()
    }

    pub fn state(&self) -> SessionState {
        if self.open_files.is_empty() {
            SessionState::Empty
        } else {
            SessionState::HasActive
        }
    }

    /// Replaces the buffered text of an open tab. The tree is left untouched.
    pub fn update_content(&mut self, id: &NodeId, content: impl Into<String>) -> bool {
        match self.open_files.iter_mut().find(|file| &file.id == id) {
            Some(file) => {
                file.content = content.into();
                true
            }
            None => false,
        }
    }

    /// Moves the `dragged` tab next to the `target` tab.
    /// 將拖曳中的分頁移到目標分頁旁。
    ///
    /// A tab dragged leftwards lands immediately before the target; one dragged
    /// rightwards lands immediately after it. Unknown ids or a tab dropped on
    /// itself leave the order unchanged.
    pub fn reorder_tabs(&mut self, dragged: &NodeId, target: &NodeId) -> ReorderOutcome {
        let (Some(dragged_index), Some(drop_index)) =
            (self.position(dragged), self.position(target))
        else {
            return ReorderOutcome::Unchanged;
        };
        if dragged_index == drop_index {
            return ReorderOutcome::Unchanged;
        }

        let moving = self.open_files.remove(dragged_index);
        // Moving left inserts before the target at its index; moving right the
        // target has shifted left by one, so inserting after it lands on the
        // same index.
        self.open_files.insert(drop_index, moving);
        debug!(%dragged, drop_on = %target, from = dragged_index, to = drop_index, "reordered tabs");
        ReorderOutcome::Moved {
            from: dragged_index,
            to: drop_index,
        }
    }
}
