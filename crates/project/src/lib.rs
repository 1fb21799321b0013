//! Note tree, tab session and tab drag-reorder state for NoteDeck.
//! NoteDeck 的筆記樹、分頁工作階段與分頁拖放排序狀態。

mod util;

pub mod action;
pub mod drag;
pub mod id;
pub mod session;
pub mod store;
pub mod tree;
pub mod workspace;

pub use action::{Action, ActionOutcome};
pub use drag::{DragReorderController, DragState, DropOutcome};
pub use id::{IdSource, NodeId, SequentialIdSource, UuidIdSource};
pub use session::{OpenFile, ReorderOutcome, SessionState, TabSession};
pub use store::{SnapshotStore, StoreError};
pub use tree::{FileNode, FolderNode, Node, NodeRef, NoteTree, TreeError};
pub use workspace::{Workspace, WorkspaceSnapshot, SNAPSHOT_FORMAT_VERSION};
