use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::id::{IdSource, NodeId};

/// A note leaf carrying its text payload.
/// 帶有筆記內容的檔案節點。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileNode {
    pub id: NodeId,
    pub name: String,
    pub content: String,
}

impl FileNode {
    pub fn new(id: NodeId, name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            content: content.into(),
        }
    }
}

/// A container whose children order is display-significant.
/// 資料夾節點；子節點順序即顯示順序。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FolderNode {
    pub id: NodeId,
    pub name: String,
    pub children: Vec<Node>,
}

impl FolderNode {
    pub fn new(id: NodeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }
}

/// Entry of the note tree.
/// 筆記樹中的節點。
///
/// Serialized untagged: an object with `children` is a folder, one with
/// `content` is a file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Node {
    Folder(FolderNode),
    File(FileNode),
}

impl Node {
    pub fn id(&self) -> &NodeId {
        match self {
            Node::Folder(folder) => &folder.id,
            Node::File(file) => &file.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Node::Folder(folder) => &folder.name,
            Node::File(file) => &file.name,
        }
    }

    fn set_name(&mut self, name: String) {
        match self {
            Node::Folder(folder) => folder.name = name,
            Node::File(file) => file.name = name,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Node::File(_))
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Node::Folder(_))
    }

    pub fn as_file(&self) -> Option<&FileNode> {
        match self {
            Node::File(file) => Some(file),
            Node::Folder(_) => None,
        }
    }

    pub fn as_folder(&self) -> Option<&FolderNode> {
        match self {
            Node::Folder(folder) => Some(folder),
            Node::File(_) => None,
        }
    }

    pub fn as_node_ref(&self) -> NodeRef<'_> {
        match self {
            Node::Folder(folder) => NodeRef::Folder(folder),
            Node::File(file) => NodeRef::File(file),
        }
    }
}

impl From<FileNode> for Node {
    fn from(file: FileNode) -> Self {
        Node::File(file)
    }
}

impl From<FolderNode> for Node {
    fn from(folder: FolderNode) -> Self {
        Node::Folder(folder)
    }
}

/// Borrowed view of a node, the root folder included.
/// 節點的借用檢視（包含根資料夾）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef<'a> {
    Folder(&'a FolderNode),
    File(&'a FileNode),
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> &'a NodeId {
        match *self {
            NodeRef::Folder(folder) => &folder.id,
            NodeRef::File(file) => &file.id,
        }
    }

    pub fn name(&self) -> &'a str {
        match *self {
            NodeRef::Folder(folder) => &folder.name,
            NodeRef::File(file) => &file.name,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, NodeRef::File(_))
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, NodeRef::Folder(_))
    }

    pub fn as_file(&self) -> Option<&'a FileNode> {
        match *self {
            NodeRef::File(file) => Some(file),
            NodeRef::Folder(_) => None,
        }
    }

    pub fn as_folder(&self) -> Option<&'a FolderNode> {
        match *self {
            NodeRef::Folder(folder) => Some(folder),
            NodeRef::File(_) => None,
        }
    }
}

/// The folder hierarchy, owned top-down from a single root folder.
/// 以單一根資料夾為起點的筆記樹。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct NoteTree {
    root: FolderNode,
}

impl NoteTree {
    /// Constructs a tree holding only an empty root folder.
    /// 建立僅含空白根資料夾的筆記樹。
    pub fn new(root_name: impl Into<String>, ids: &mut dyn IdSource) -> Self {
        Self {
            root: FolderNode::new(ids.next_id(), root_name),
        }
    }

    pub fn from_root(root: FolderNode) -> Self {
        Self { root }
    }

    /// Builds the starter tree shown on first launch: two folders with two
    /// notes each.
    /// 建立首次啟動時的範例樹：兩個資料夾，各含兩則筆記。
    pub fn sample(root_name: impl Into<String>, ids: &mut dyn IdSource) -> Self {
        let mut root = FolderNode::new(ids.next_id(), root_name);
        let mut counter = 0;
        for folder_number in 1..=2 {
            let mut folder = FolderNode::new(ids.next_id(), format!("Folder {folder_number}"));
            for _ in 0..2 {
                counter += 1;
                folder.children.push(Node::File(FileNode::new(
                    ids.next_id(),
                    format!("File {counter}"),
                    format!("# File {counter}"),
                )));
            }
            root.children.push(Node::Folder(folder));
        }
        Self { root }
    }

    pub fn root(&self) -> &FolderNode {
        &self.root
    }

    pub fn root_id(&self) -> &NodeId {
        &self.root.id
    }

    /// Finds a node anywhere in the tree.
    /// 依識別碼在整棵樹中尋找節點。
    ///
    /// Iterative preorder walk over an explicit work list.
    pub fn find_node(&self, id: &NodeId) -> Option<NodeRef<'_>> {
        let mut pending = vec![NodeRef::Folder(&self.root)];
        while let Some(node) = pending.pop() {
            if node.id() == id {
                return Some(node);
            }
            if let NodeRef::Folder(folder) = node {
                pending.extend(folder.children.iter().rev().map(Node::as_node_ref));
            }
        }
        None
    }

    /// Returns the file with the given id, or `None` when absent or a folder.
    pub fn find_file(&self, id: &NodeId) -> Option<&FileNode> {
        self.find_node(id).and_then(|node| node.as_file())
    }

    /// Renames a node at any depth, the root included.
    /// 重新命名任意深度的節點（含根節點）。
    pub fn rename_node(&mut self, id: &NodeId, name: impl Into<String>) -> Result<(), TreeError> {
        let name = name.into();
        if self.root.id == *id {
            debug!(%id, new_name = %name, "renamed root folder");
            self.root.name = name;
            return Ok(());
        }
        let (parent, index) = self
            .parent_of_mut(id)
            .ok_or_else(|| TreeError::NotFound(id.clone()))?;
        debug!(%id, new_name = %name, "renamed node");
        parent.children[index].set_name(name);
        Ok(())
    }

    /// Removes a node, and its whole subtree when it is a folder.
    /// 移除節點；若為資料夾則連同整個子樹一併移除。
    ///
    /// The root has no parent and is rejected with [`TreeError::InvalidTarget`].
    pub fn delete_node(&mut self, id: &NodeId) -> Result<Node, TreeError> {
        if self.root.id == *id {
            return Err(TreeError::InvalidTarget(id.clone()));
        }
        let (parent, index) = self
            .parent_of_mut(id)
            .ok_or_else(|| TreeError::NotFound(id.clone()))?;
        let removed = parent.children.remove(index);
        debug!(%id, parent = %parent.id, "deleted node");
        Ok(removed)
    }

    /// Appends an empty note to the target folder and returns its new id.
    /// 在指定資料夾尾端新增空白筆記並回傳新識別碼。
    pub fn create_file(
        &mut self,
        in_folder: &NodeId,
        name: impl Into<String>,
        ids: &mut dyn IdSource,
    ) -> Result<NodeId, TreeError> {
        let folder = self.target_folder_mut(in_folder)?;
        let id = ids.next_id();
        folder
            .children
            .push(Node::File(FileNode::new(id.clone(), name, String::new())));
        debug!(%id, folder = %in_folder, "created file");
        Ok(id)
    }

    /// Appends an empty folder to the target folder and returns its new id.
    /// 在指定資料夾尾端新增空白資料夾並回傳新識別碼。
    pub fn create_folder(
        &mut self,
        in_folder: &NodeId,
        name: impl Into<String>,
        ids: &mut dyn IdSource,
    ) -> Result<NodeId, TreeError> {
        let folder = self.target_folder_mut(in_folder)?;
        let id = ids.next_id();
        folder
            .children
            .push(Node::Folder(FolderNode::new(id.clone(), name)));
        debug!(%id, folder = %in_folder, "created folder");
        Ok(id)
    }

    /// Total number of nodes, the root included.
    pub fn node_count(&self) -> usize {
        self.ids().len()
    }

    /// Whether the root holds anything at all.
    pub fn has_children(&self) -> bool {
        !self.root.children.is_empty()
    }

    /// Every id in preorder.
    pub fn ids(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut pending = vec![NodeRef::Folder(&self.root)];
        while let Some(node) = pending.pop() {
            out.push(node.id().clone());
            if let NodeRef::Folder(folder) = node {
                pending.extend(folder.children.iter().rev().map(Node::as_node_ref));
            }
        }
        out
    }

    fn target_folder_mut(&mut self, id: &NodeId) -> Result<&mut FolderNode, TreeError> {
        match self.find_node(id) {
            None => return Err(TreeError::NotFound(id.clone())),
            Some(NodeRef::File(_)) => return Err(TreeError::InvalidTarget(id.clone())),
            Some(NodeRef::Folder(_)) => {}
        }
        self.folder_mut(id)
            .ok_or_else(|| TreeError::NotFound(id.clone()))
    }

    fn folder_mut(&mut self, id: &NodeId) -> Option<&mut FolderNode> {
        let mut pending: Vec<&mut FolderNode> = vec![&mut self.root];
        while let Some(folder) = pending.pop() {
            if folder.id == *id {
                return Some(folder);
            }
            for child in folder.children.iter_mut().rev() {
                if let Node::Folder(sub) = child {
                    pending.push(sub);
                }
            }
        }
        None
    }

    /// Locates the folder that directly contains `id`, with the child's index.
    fn parent_of_mut(&mut self, id: &NodeId) -> Option<(&mut FolderNode, usize)> {
        let mut pending: Vec<&mut FolderNode> = vec![&mut self.root];
        while let Some(folder) = pending.pop() {
            if let Some(index) = folder.children.iter().position(|child| child.id() == id) {
                return Some((folder, index));
            }
            for child in folder.children.iter_mut().rev() {
                if let Node::Folder(sub) = child {
                    pending.push(sub);
                }
            }
        }
        None
    }
}

/// Tree-manipulation errors.
/// 筆記樹操作錯誤類型。
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("node {0} not found")]
    NotFound(NodeId),
    #[error("node {0} is not a valid target for this operation")]
    InvalidTarget(NodeId),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::SequentialIdSource;

    fn nested_tree() -> (NoteTree, SequentialIdSource, NodeId, NodeId, NodeId) {
        let mut ids = SequentialIdSource::new();
        let mut tree = NoteTree::new("Root", &mut ids);
        let root = tree.root_id().clone();
        let outer = tree.create_folder(&root, "outer", &mut ids).unwrap();
        let inner = tree.create_folder(&outer, "inner", &mut ids).unwrap();
        let deep = tree.create_file(&inner, "deep.md", &mut ids).unwrap();
        (tree, ids, outer, inner, deep)
    }

    #[test]
    fn find_node_reaches_root_and_nested_entries() {
        let (tree, _, outer, inner, deep) = nested_tree();
        for id in [tree.root_id().clone(), outer, inner, deep] {
            let found = tree.find_node(&id).expect("node should be found");
            assert_eq!(found.id(), &id);
        }
        assert!(tree.find_node(&NodeId::Number(999)).is_none());
    }

    #[test]
    fn rename_reaches_files_two_folders_deep() {
        let (mut tree, _, _, _, deep) = nested_tree();
        tree.rename_node(&deep, "renamed.md").unwrap();
        assert_eq!(tree.find_node(&deep).unwrap().name(), "renamed.md");
    }

    #[test]
    fn rename_missing_is_reported() {
        let (mut tree, _, _, _, _) = nested_tree();
        let before = tree.clone();
        let missing = NodeId::from("nope");
        assert_eq!(
            tree.rename_node(&missing, "x"),
            Err(TreeError::NotFound(missing))
        );
        assert_eq!(tree, before);
    }

    #[test]
    fn delete_folder_drops_every_descendant() {
        let (mut tree, _, outer, inner, deep) = nested_tree();
        let removed = tree.delete_node(&outer).unwrap();
        assert!(removed.is_folder());
        for id in [outer, inner, deep] {
            assert!(tree.find_node(&id).is_none());
        }
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn delete_reaches_nested_file() {
        let (mut tree, _, _, inner, deep) = nested_tree();
        tree.delete_node(&deep).unwrap();
        assert!(tree.find_node(&deep).is_none());
        let inner = tree.find_node(&inner).and_then(|n| n.as_folder()).unwrap();
        assert!(inner.children.is_empty());
    }

    #[test]
    fn delete_rejects_root() {
        let (mut tree, _, _, _, _) = nested_tree();
        let root = tree.root_id().clone();
        assert_eq!(
            tree.delete_node(&root),
            Err(TreeError::InvalidTarget(root))
        );
    }

    #[test]
    fn create_appends_in_order() {
        let mut ids = SequentialIdSource::new();
        let mut tree = NoteTree::new("Root", &mut ids);
        let root = tree.root_id().clone();
        let a = tree.create_file(&root, "a", &mut ids).unwrap();
        let b = tree.create_folder(&root, "b", &mut ids).unwrap();
        let order: Vec<_> = tree.root().children.iter().map(|n| n.id().clone()).collect();
        assert_eq!(order, vec![a.clone(), b]);
        assert_eq!(tree.find_file(&a).unwrap().content, "");
    }

    #[test]
    fn create_inside_file_is_invalid_and_consumes_no_id() {
        let (mut tree, mut ids, _, _, deep) = nested_tree();
        assert_eq!(
            tree.create_file(&deep, "child", &mut ids),
            Err(TreeError::InvalidTarget(deep))
        );
        let missing = NodeId::Number(404);
        assert_eq!(
            tree.create_folder(&missing, "child", &mut ids),
            Err(TreeError::NotFound(missing))
        );
        assert_eq!(ids.next_id(), NodeId::Number(5));
    }

    #[test]
    fn node_count_includes_root() {
        let mut ids = SequentialIdSource::new();
        let mut tree = NoteTree::new("Root", &mut ids);
        assert_eq!(tree.node_count(), 1);
        assert!(!tree.has_children());

        let root = tree.root_id().clone();
        tree.create_folder(&root, "only", &mut ids).unwrap();
        assert_eq!(tree.node_count(), 2);
        assert!(tree.has_children());
    }

    #[test]
    fn sample_tree_matches_first_launch_layout() {
        let mut ids = SequentialIdSource::new();
        let tree = NoteTree::sample("Root", &mut ids);
        assert_eq!(tree.node_count(), 7);
        let names: Vec<_> = tree
            .ids()
            .iter()
            .map(|id| tree.find_node(id).unwrap().name().to_string())
            .collect();
        assert_eq!(
            names,
            ["Root", "Folder 1", "File 1", "File 2", "Folder 2", "File 3", "File 4"]
        );
        let file_three = tree.find_node(&NodeId::Number(6)).unwrap();
        assert_eq!(file_three.as_file().unwrap().content, "# File 3");
    }

    #[test]
    fn deep_chains_are_searched_and_mutated() {
        let depth = 1_000;
        let mut current = FolderNode::new(NodeId::Number(depth), "leaf folder")
            .with_children(vec![FileNode::new(NodeId::from("bottom"), "bottom", "").into()]);
        for level in (0..depth).rev() {
            current = FolderNode::new(NodeId::Number(level), format!("level {level}"))
                .with_children(vec![current.into()]);
        }
        let mut tree = NoteTree::from_root(current);
        let bottom = NodeId::from("bottom");

        tree.rename_node(&bottom, "found").unwrap();
        assert_eq!(tree.find_node(&bottom).unwrap().name(), "found");
        tree.delete_node(&NodeId::Number(depth - 1)).unwrap();
        assert!(tree.find_node(&bottom).is_none());
        assert_eq!(tree.node_count(), depth as usize - 1);
    }

    #[test]
    fn untagged_shape_distinguishes_files_and_folders() {
        let json = r#"{"id":"r","name":"Root","children":[
            {"id":1,"name":"note","content":"hi"},
            {"id":"f","name":"folder","children":[]}
        ]}"#;
        let tree: NoteTree = serde_json::from_str(json).unwrap();
        assert!(tree.find_node(&NodeId::Number(1)).unwrap().is_file());
        assert!(tree.find_node(&NodeId::from("f")).unwrap().is_folder());
    }
}
