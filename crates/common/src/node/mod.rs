//! Node model and serialization
//!
//! Nodes are the building blocks of the filesystem tree. Each node is
//! persisted as exactly one remote object. A file node holds an ordered
//! list of sealed block objects plus the salt their nonces derive from; a
//! directory node holds an ordered list of child node IDs. A directory embeds
//! its children's object IDs by value, which is why every mutation
//! re-persists the whole ancestor chain up to the root.
//!
//! The encoding is bincode over serde derives. The `NodeBody` enum tag is
//! the kind discriminator: unknown kinds fail decoding rather than being
//! ignored.

use serde::{Deserialize, Serialize};

use crate::crypto::FileSalt;
use crate::store::ObjectId;

#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error("malformed node object: {0}")]
    Malformed(#[from] bincode::Error),
}

/// The two kinds of node, as surfaced in listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Directory,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::File => write!(f, "file"),
            NodeKind::Directory => write!(f, "dir"),
        }
    }
}

/// File payload: total logical size, the nonce salt, and the ordered block
/// sequence. Block order is byte order; the position of an ID in `blocks`
/// is the index fed to nonce derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileNode {
    size: u64,
    salt: FileSalt,
    blocks: Vec<ObjectId>,
}

impl FileNode {
    pub fn new(salt: FileSalt) -> Self {
        FileNode {
            size: 0,
            salt,
            blocks: Vec::new(),
        }
    }

    pub fn salt(&self) -> &FileSalt {
        &self.salt
    }

    /// Logical byte length; the sum of the plaintext block lengths.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn blocks(&self) -> &[ObjectId] {
        &self.blocks
    }

    /// Append the next block in byte order.
    pub fn push_block(&mut self, id: ObjectId, len: u64) {
        self.blocks.push(id);
        self.size += len;
    }
}

/// Directory payload: the ordered child node IDs. Child names live in the
/// child nodes themselves, so matching a name means fetching children.
/// Directory size is derived (child count), never stored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DirectoryNode {
    children: Vec<ObjectId>,
}

impl DirectoryNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn push_child(&mut self, id: ObjectId) {
        self.children.push(id);
    }

    /// Drop a child reference. Returns false if `id` is not a child.
    pub fn remove_child(&mut self, id: ObjectId) -> bool {
        match self.children.iter().position(|c| *c == id) {
            Some(pos) => {
                self.children.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Swap a child's ID in place, preserving entry order. Used when a
    /// descendant was re-persisted and its ID changed.
    pub fn replace_child(&mut self, old: ObjectId, new: ObjectId) -> bool {
        match self.children.iter().position(|c| *c == old) {
            Some(pos) => {
                self.children[pos] = new;
                true
            }
            None => false,
        }
    }
}

/// Tagged node payload. Closed set of two cases; every consumer matches
/// both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeBody {
    File(FileNode),
    Directory(DirectoryNode),
}

/// A file or directory entry, persisted as one remote object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    name: String,
    // Back-reference to the parent's object ID as of the time this node was
    // written. Advisory: resolution always walks top-down from the root, and
    // propagation does not rewrite descendants to refresh it.
    parent: Option<ObjectId>,
    body: NodeBody,
}

impl Node {
    pub fn new_file(name: impl Into<String>, parent: Option<ObjectId>, salt: FileSalt) -> Self {
        Node {
            name: name.into(),
            parent,
            body: NodeBody::File(FileNode::new(salt)),
        }
    }

    pub fn new_directory(name: impl Into<String>, parent: Option<ObjectId>) -> Self {
        Node {
            name: name.into(),
            parent,
            body: NodeBody::Directory(DirectoryNode::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    pub fn set_parent(&mut self, parent: Option<ObjectId>) {
        self.parent = parent;
    }

    pub fn kind(&self) -> NodeKind {
        match &self.body {
            NodeBody::File(_) => NodeKind::File,
            NodeBody::Directory(_) => NodeKind::Directory,
        }
    }

    /// Logical size: byte length for files, child count for directories.
    pub fn size(&self) -> u64 {
        match &self.body {
            NodeBody::File(file) => file.size(),
            NodeBody::Directory(dir) => dir.len() as u64,
        }
    }

    pub fn body(&self) -> &NodeBody {
        &self.body
    }

    pub fn file(&self) -> Option<&FileNode> {
        match &self.body {
            NodeBody::File(file) => Some(file),
            NodeBody::Directory(_) => None,
        }
    }

    pub fn file_mut(&mut self) -> Option<&mut FileNode> {
        match &mut self.body {
            NodeBody::File(file) => Some(file),
            NodeBody::Directory(_) => None,
        }
    }

    pub fn directory(&self) -> Option<&DirectoryNode> {
        match &self.body {
            NodeBody::Directory(dir) => Some(dir),
            NodeBody::File(_) => None,
        }
    }

    pub fn directory_mut(&mut self) -> Option<&mut DirectoryNode> {
        match &mut self.body {
            NodeBody::Directory(dir) => Some(dir),
            NodeBody::File(_) => None,
        }
    }

    /// Encode this node into its storable form.
    pub fn encode(&self) -> Result<Vec<u8>, NodeError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode a node from its storable form.
    ///
    /// Truncated input, absent fields, and unrecognized kind discriminants
    /// all fail with [`NodeError::Malformed`].
    pub fn decode(bytes: &[u8]) -> Result<Self, NodeError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_file_encode_decode() {
        let mut node = Node::new_file("report.pdf", Some(ObjectId::new(9)), FileSalt::generate());
        let file = node.file_mut().unwrap();
        file.push_block(ObjectId::new(10), 100);
        file.push_block(ObjectId::new(11), 42);

        let decoded = Node::decode(&node.encode().unwrap()).unwrap();
        assert_eq!(decoded, node);
        assert_eq!(decoded.kind(), NodeKind::File);
        assert_eq!(decoded.size(), 142);
        assert_eq!(decoded.file().unwrap().blocks().len(), 2);
    }

    #[test]
    fn test_directory_encode_decode() {
        let mut node = Node::new_directory("docs", None);
        let dir = node.directory_mut().unwrap();
        dir.push_child(ObjectId::new(4));
        dir.push_child(ObjectId::new(5));

        let decoded = Node::decode(&node.encode().unwrap()).unwrap();
        assert_eq!(decoded, node);
        assert_eq!(decoded.kind(), NodeKind::Directory);
        assert_eq!(decoded.size(), 2);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(Node::decode(b"").is_err());
        assert!(Node::decode(&[0xff; 64]).is_err());

        // truncating a valid encoding must not decode
        let node = Node::new_directory("d", None);
        let bytes = node.encode().unwrap();
        assert!(Node::decode(&bytes[..bytes.len() - 1]).is_err());
    }

    #[test]
    fn test_child_order_preserved() {
        let mut node = Node::new_directory("d", None);
        let dir = node.directory_mut().unwrap();
        for id in [3, 1, 2] {
            dir.push_child(ObjectId::new(id));
        }

        let decoded = Node::decode(&node.encode().unwrap()).unwrap();
        let ids: Vec<u64> = decoded
            .directory()
            .unwrap()
            .children()
            .iter()
            .map(|c| c.get())
            .collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_replace_child_keeps_position() {
        let mut dir = DirectoryNode::new();
        dir.push_child(ObjectId::new(1));
        dir.push_child(ObjectId::new(2));
        dir.push_child(ObjectId::new(3));

        assert!(dir.replace_child(ObjectId::new(2), ObjectId::new(9)));
        let ids: Vec<u64> = dir.children().iter().map(|c| c.get()).collect();
        assert_eq!(ids, vec![1, 9, 3]);

        assert!(!dir.replace_child(ObjectId::new(2), ObjectId::new(10)));
    }

    #[test]
    fn test_remove_child() {
        let mut dir = DirectoryNode::new();
        dir.push_child(ObjectId::new(1));
        assert!(dir.remove_child(ObjectId::new(1)));
        assert!(dir.is_empty());
        assert!(!dir.remove_child(ObjectId::new(1)));
    }
}
