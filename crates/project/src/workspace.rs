use std::fmt;

use notedeck_settings::{IdScheme, Preferences};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::action::{Action, ActionOutcome};
use crate::id::{IdSource, NodeId, SequentialIdSource, UuidIdSource};
use crate::session::{ReorderOutcome, TabSession};
use crate::tree::{NodeRef, NoteTree, TreeError};

/// Current snapshot format version.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Serializable state of a whole workspace.
/// 整個工作區可序列化的狀態。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkspaceSnapshot {
    #[serde(rename = "formatVersion", default = "default_format_version")]
    pub format_version: u32,
    pub tree: NoteTree,
    #[serde(default)]
    pub tabs: TabSession,
}

fn default_format_version() -> u32 {
    SNAPSHOT_FORMAT_VERSION
}

/// The note tree and tab session of one editor window, plus the id source
/// that mints new nodes.
/// 單一編輯視窗的筆記樹與分頁工作階段。
///
/// The tree and the tabs are independent: deleting or renaming a note does not
/// touch tabs already opened from it.
pub struct Workspace {
    tree: NoteTree,
    tabs: TabSession,
    ids: Box<dyn IdSource>,
}

impl fmt::Debug for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workspace")
            .field("tree", &self.tree)
            .field("tabs", &self.tabs)
            .finish_non_exhaustive()
    }
}

impl Workspace {
    pub fn new(tree: NoteTree, ids: Box<dyn IdSource>) -> Self {
        Self {
            tree,
            tabs: TabSession::new(),
            ids,
        }
    }

    /// Builds a fresh workspace as configured by `prefs`.
    /// 依偏好設定建立新的工作區。
    pub fn from_preferences(prefs: &Preferences) -> Self {
        let mut ids = id_source_for(prefs.workspace.id_scheme, None);
        let root_name = prefs.workspace.root_name.as_str();
        let tree = if prefs.workspace.seed_sample_notes {
            NoteTree::sample(root_name, ids.as_mut())
        } else {
            NoteTree::new(root_name, ids.as_mut())
        };
        info!(nodes = tree.node_count(), scheme = ?prefs.workspace.id_scheme, "created workspace");
        Self::new(tree, ids)
    }

    /// Rebuilds a workspace from a snapshot. Tabs are dropped unless
    /// `prefs.tabs.restore_session` is set.
    /// 由快照還原工作區。
    pub fn restore(snapshot: WorkspaceSnapshot, prefs: &Preferences) -> Self {
        let ids = id_source_for(prefs.workspace.id_scheme, Some(&snapshot.tree));
        let tabs = if prefs.tabs.restore_session {
            snapshot.tabs
        } else {
            TabSession::new()
        };
        info!(
            nodes = snapshot.tree.node_count(),
            tabs = tabs.len(),
            "restored workspace"
        );
        Self {
            tree: snapshot.tree,
            tabs,
            ids,
        }
    }

    pub fn snapshot(&self) -> WorkspaceSnapshot {
        WorkspaceSnapshot {
            format_version: SNAPSHOT_FORMAT_VERSION,
            tree: self.tree.clone(),
            tabs: self.tabs.clone(),
        }
    }

    pub fn tree(&self) -> &NoteTree {
        &self.tree
    }

    pub fn tabs(&self) -> &TabSession {
        &self.tabs
    }

    pub fn tabs_mut(&mut self) -> &mut TabSession {
        &mut self.tabs
    }

    /// Looks up a note in the tree and opens a tab for it.
    /// 於樹中找出筆記並開啟分頁。
    pub fn open_node(&mut self, id: &NodeId) -> Result<(), TreeError> {
        match self.tree.find_node(id) {
            Some(NodeRef::File(file)) => {
                self.tabs.open_file(file);
                Ok(())
            }
            Some(NodeRef::Folder(_)) => Err(TreeError::InvalidTarget(id.clone())),
            None => Err(TreeError::NotFound(id.clone())),
        }
    }

    /// Applies one action. Never fails; problems are reported in the outcome.
    /// 套用單一動作；錯誤會反映在結果中而不會中斷。
    pub fn dispatch(&mut self, action: Action) -> ActionOutcome {
        let name = action.name();
        let outcome = match action {
            Action::RenameNode { id, name } => self.tree.rename_node(&id, name).into(),
            Action::DeleteNode { id } => match self.tree.delete_node(&id) {
                Ok(removed) => ActionOutcome::Removed(removed),
                Err(err) => ActionOutcome::Rejected(err),
            },
            Action::CreateFile { name, in_folder } => {
                match self.tree.create_file(&in_folder, name, self.ids.as_mut()) {
                    Ok(id) => ActionOutcome::Created(id),
                    Err(err) => ActionOutcome::Rejected(err),
                }
            }
            Action::CreateFolder { name, in_folder } => {
                match self.tree.create_folder(&in_folder, name, self.ids.as_mut()) {
                    Ok(id) => ActionOutcome::Created(id),
                    Err(err) => ActionOutcome::Rejected(err),
                }
            }
            Action::OpenFile(file) => {
                self.tabs.open_file(&file);
                ActionOutcome::Applied
            }
            Action::CloseFile { id } => match self.tabs.close_file(&id) {
                Some(_) => ActionOutcome::Applied,
                None => ActionOutcome::Unchanged,
            },
            Action::SetActiveId(id) => {
                self.tabs.set_active_id(id);
                ActionOutcome::Applied
            }
            Action::ReorderTabs {
                dragged_id,
                drop_id,
            } => match self.tabs.reorder_tabs(&dragged_id, &drop_id) {
                ReorderOutcome::Moved { from, to } => ActionOutcome::Reordered { from, to },
                ReorderOutcome::Unchanged => ActionOutcome::Unchanged,
            },
        };
        debug!(action = name, outcome = ?outcome, "dispatched");
        outcome
    }
}

/// Picks the id source for `scheme`. Sequential ids resume after the largest
/// numeric id already present in `existing`.
fn id_source_for(scheme: IdScheme, existing: Option<&NoteTree>) -> Box<dyn IdSource> {
    match scheme {
        IdScheme::Uuid => Box::new(UuidIdSource),
        IdScheme::Sequential => {
            let next = existing
                .into_iter()
                .flat_map(NoteTree::ids)
                .filter_map(|id| match id {
                    NodeId::Number(value) => Some(value),
                    NodeId::Text(_) => None,
                })
                .max()
                .map_or(1, |max| max.wrapping_add(1));
            Box::new(SequentialIdSource::starting_at(next))
        }
    }
}
