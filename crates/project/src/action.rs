use serde::{Deserialize, Serialize};

use crate::id::NodeId;
use crate::tree::{FileNode, Node, TreeError};

/// A state change dispatched by the editor shell.
/// 編輯器外殼派送的狀態變更。
///
/// Serialized as `{"type": "...", "payload": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum Action {
    #[serde(rename = "renameNode")]
    RenameNode { id: NodeId, name: String },
    #[serde(rename = "deleteNode")]
    DeleteNode { id: NodeId },
    #[serde(rename = "createFile")]
    CreateFile {
        name: String,
        #[serde(rename = "inFolder")]
        in_folder: NodeId,
    },
    #[serde(rename = "createFolder")]
    CreateFolder {
        name: String,
        #[serde(rename = "inFolder")]
        in_folder: NodeId,
    },
    #[serde(rename = "openFile")]
    OpenFile(FileNode),
    #[serde(rename = "closeFile")]
    CloseFile { id: NodeId },
    #[serde(rename = "setActiveID")]
    SetActiveId(Option<NodeId>),
    #[serde(rename = "reorderTabs")]
    ReorderTabs {
        #[serde(rename = "draggedID")]
        dragged_id: NodeId,
        #[serde(rename = "dropID")]
        drop_id: NodeId,
    },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::RenameNode { .. } => "renameNode",
            Action::DeleteNode { .. } => "deleteNode",
            Action::CreateFile { .. } => "createFile",
            Action::CreateFolder { .. } => "createFolder",
            Action::OpenFile(_) => "openFile",
            Action::CloseFile { .. } => "closeFile",
            Action::SetActiveId(_) => "setActiveID",
            Action::ReorderTabs { .. } => "reorderTabs",
        }
    }
}

/// What a dispatched action did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Applied,
    Created(NodeId),
    /// A node was deleted; carries the detached subtree.
    Removed(Node),
    Reordered { from: usize, to: usize },
    /// The action referenced an id that is not there; nothing changed.
    Unchanged,
    Rejected(TreeError),
}

impl ActionOutcome {
    pub fn changed_state(&self) -> bool {
        matches!(
            self,
            ActionOutcome::Applied
                | ActionOutcome::Created(_)
                | ActionOutcome::Removed(_)
                | ActionOutcome::Reordered { .. }
        )
    }
}

impl From<Result<(), TreeError>> for ActionOutcome {
    fn from(result: Result<(), TreeError>) -> Self {
        match result {
            Ok(()) => ActionOutcome::Applied,
            Err(err) => ActionOutcome::Rejected(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn actions_use_type_and_payload_envelope() {
        let action = Action::CreateFile {
            name: "todo.md".into(),
            in_folder: NodeId::Number(4),
        };
        assert_eq!(
            serde_json::to_value(&action).unwrap(),
            json!({"type": "createFile", "payload": {"name": "todo.md", "inFolder": 4}})
        );

        let parsed: Action = serde_json::from_value(json!({
            "type": "reorderTabs",
            "payload": {"draggedID": "a", "dropID": "c"}
        }))
        .unwrap();
        assert_eq!(
            parsed,
            Action::ReorderTabs {
                dragged_id: NodeId::from("a"),
                drop_id: NodeId::from("c"),
            }
        );
        assert_eq!(parsed.name(), "reorderTabs");
    }

    #[test]
    fn set_active_accepts_null() {
        let parsed: Action =
            serde_json::from_value(json!({"type": "setActiveID", "payload": null})).unwrap();
        assert_eq!(parsed, Action::SetActiveId(None));
    }
}
