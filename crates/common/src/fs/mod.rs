//! Filesystem orchestrator
//!
//! `RelayFs` coordinates the block codec, the crypto layer, and the node
//! model against a remote object store to present a filesystem. It owns no
//! persistent state: every operation starts from a root object ID, fetches
//! what it needs, and (for mutations) returns a *new* root ID.
//!
//! Mutations re-persist the changed node and every ancestor up to the root,
//! because a directory embeds its children's object IDs by value. That write
//! amplification is the price of the design's one invariant worth having:
//! a single root ID, plus the content key, reconstructs the whole tree.
//!
//! The engine assumes a single logical writer. Two processes mutating the
//! same root can interleave ancestor rewrites and end up with divergent
//! roots; the medium offers nothing to lock on, and we do not pretend
//! otherwise.

pub mod path;

use std::collections::BTreeSet;

use anyhow::anyhow;
use bytes::Bytes;
use futures::{stream, StreamExt, TryStreamExt};

use crate::chunk::{self, ChunkError};
use crate::crypto::{ContentKey, CryptoError, FileSalt, SALT_SIZE, TAG_SIZE};
use crate::node::{DirectoryNode, Node, NodeBody, NodeError, NodeKind};
use crate::store::{ObjectId, ObjectStore, StoreError};

// Node objects are sealed under their own fresh salt at a fixed index.
const NODE_NONCE_INDEX: u64 = 0;

#[derive(Debug, thiserror::Error)]
pub enum FsError {
    #[error("default error: {0}")]
    Default(#[from] anyhow::Error),
    #[error("path not found: {0}")]
    NotFound(String),
    #[error("not a directory: {0}")]
    NotADirectory(String),
    #[error("not a file: {0}")]
    NotAFile(String),
    #[error("name already exists: {0}")]
    NameCollision(String),
    #[error("directory not empty: {0}")]
    NotEmpty(String),
    #[error("cannot move a directory beneath itself: {0}")]
    CycleDetected(String),
    #[error("invalid path: {0}")]
    InvalidPath(String),
    #[error("cannot {0} the root directory")]
    RootOperation(&'static str),
    #[error("object of {len} bytes exceeds the medium's object size limit of {max}")]
    SizeLimit { len: usize, max: usize },
    #[error("chunk error: {0}")]
    Chunk(#[from] ChunkError),
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
    #[error("node error: {0}")]
    Node(#[from] NodeError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// One row of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Entry name for [`RelayFs::ls`]; path relative to the listed
    /// directory for [`RelayFs::ls_deep`].
    pub name: String,
    pub kind: NodeKind,
    /// Byte length for files, child count for directories.
    pub size: u64,
}

/// A staged local tree for recursive upload. Built by the caller (the CLI
/// walks the local disk); persisted bottom-up so a parent is only ever
/// written once its children hold assigned IDs.
#[derive(Debug, Clone)]
pub enum TreeSource {
    File(Bytes),
    Directory(Vec<(String, TreeSource)>),
}

/// Engine tunables. Block size is plaintext bytes per block; the sealed
/// object is `TAG_SIZE` bytes larger and must fit the medium's limit.
#[derive(Debug, Clone)]
pub struct FsOptions {
    pub max_block_size: usize,
    /// Concurrent in-flight block transfers per operation.
    pub parallelism: usize,
}

impl Default for FsOptions {
    fn default() -> Self {
        FsOptions {
            max_block_size: 1 << 22,
            parallelism: 8,
        }
    }
}

/// The filesystem engine over a store `S`.
#[derive(Clone)]
pub struct RelayFs<S> {
    store: S,
    key: ContentKey,
    max_block_size: usize,
    parallelism: usize,
}

impl<S: ObjectStore> RelayFs<S> {
    pub fn new(store: S, key: ContentKey, opts: FsOptions) -> Result<Self, FsError> {
        if opts.max_block_size == 0 {
            return Err(FsError::Chunk(ChunkError::SizeLimit(0)));
        }
        let max = store.max_object_size();
        if opts.max_block_size + TAG_SIZE > max {
            return Err(FsError::SizeLimit {
                len: opts.max_block_size + TAG_SIZE,
                max,
            });
        }
        Ok(RelayFs {
            store,
            key,
            max_block_size: opts.max_block_size,
            parallelism: opts.parallelism.max(1),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create an empty filesystem and return its root ID.
    pub async fn init(&self) -> Result<ObjectId, FsError> {
        let root = Node::new_directory("", None);
        let id = self.put_node(&root).await?;
        tracing::debug!("initialized empty filesystem at root {}", id);
        Ok(id)
    }

    /// Upload one file's content to `path`. Returns the new root ID.
    pub async fn upload(
        &self,
        root: ObjectId,
        path_str: &str,
        data: Bytes,
    ) -> Result<ObjectId, FsError> {
        self.upload_tree(root, path_str, TreeSource::File(data)).await
    }

    /// Upload a staged tree (a single file or a whole directory) to `path`.
    ///
    /// The subtree is persisted bottom-up (a parent is only written once
    /// its children hold assigned IDs) and linked into its parent with a
    /// single propagation at the end.
    pub async fn upload_tree(
        &self,
        root: ObjectId,
        path_str: &str,
        source: TreeSource,
    ) -> Result<ObjectId, FsError> {
        let segs = path::segments(path_str)?;
        let Some((name, parent_segs)) = segs.split_last() else {
            return Err(FsError::RootOperation("upload over"));
        };
        tracing::debug!("upload to {}", path_str);

        let mut chain = self.resolve(root, parent_segs).await?;
        let parent_id = self.check_new_entry(&chain, parent_segs, name).await?;

        let staged_id = self.stage_tree(name, Some(parent_id), source).await?;

        if let Some((_, parent)) = chain.last_mut() {
            if let Some(dir) = parent.directory_mut() {
                dir.push_child(staged_id);
            }
        }
        self.persist_chain(chain).await
    }

    /// Read one file's full content.
    pub async fn download(&self, root: ObjectId, path_str: &str) -> Result<Bytes, FsError> {
        let segs = path::segments(path_str)?;
        let chain = self.resolve(root, &segs).await?;
        let (_, node) = self.tail(&chain)?;
        let file = match node.file() {
            Some(file) => file,
            None => return Err(FsError::NotAFile(path::join(&segs))),
        };
        tracing::debug!("download {} ({} blocks)", path_str, file.blocks().len());

        let salt = *file.salt();
        let mut parts: Vec<(u64, Bytes)> = stream::iter(file.blocks().iter().copied().enumerate())
            .map(|(index, id)| self.fetch_block(id, salt, index as u64))
            .buffer_unordered(self.parallelism)
            .try_collect()
            .await?;
        // arrival order is irrelevant; byte order is index order
        parts.sort_by_key(|(index, _)| *index);
        let data = chunk::join(parts.into_iter().map(|(_, bytes)| bytes));

        if data.len() as u64 != file.size() {
            return Err(FsError::Default(anyhow!(
                "{} decodes to {} bytes but its node records {}",
                path::join(&segs),
                data.len(),
                file.size()
            )));
        }
        Ok(data)
    }

    /// List one directory, non-recursively.
    pub async fn ls(&self, root: ObjectId, path_str: &str) -> Result<Vec<Entry>, FsError> {
        let segs = path::segments(path_str)?;
        let chain = self.resolve(root, &segs).await?;
        let (_, node) = self.tail(&chain)?;
        let dir = match node.directory() {
            Some(dir) => dir,
            None => return Err(FsError::NotADirectory(path::join(&segs))),
        };

        let children = self.load_children(dir).await?;
        Ok(children
            .into_iter()
            .map(|(_, child)| Entry {
                name: child.name().to_string(),
                kind: child.kind(),
                size: child.size(),
            })
            .collect())
    }

    /// List a whole subtree depth-first. Entry names are paths relative to
    /// `path_str`.
    pub async fn ls_deep(&self, root: ObjectId, path_str: &str) -> Result<Vec<Entry>, FsError> {
        let segs = path::segments(path_str)?;
        let chain = self.resolve(root, &segs).await?;
        let (_, node) = self.tail(&chain)?;
        let dir = match node.directory() {
            Some(dir) => dir,
            None => return Err(FsError::NotADirectory(path::join(&segs))),
        };

        let mut out = Vec::new();
        self.walk(dir, "", &mut out).await?;
        Ok(out)
    }

    /// Create an empty directory at `path`. The parent must already exist.
    pub async fn mkdir(&self, root: ObjectId, path_str: &str) -> Result<ObjectId, FsError> {
        let segs = path::segments(path_str)?;
        let Some((name, parent_segs)) = segs.split_last() else {
            return Err(FsError::RootOperation("create"));
        };
        tracing::debug!("mkdir {}", path_str);

        let mut chain = self.resolve(root, parent_segs).await?;
        let parent_id = self.check_new_entry(&chain, parent_segs, name).await?;

        let node = Node::new_directory(*name, Some(parent_id));
        let id = self.put_node(&node).await?;

        if let Some((_, parent)) = chain.last_mut() {
            if let Some(dir) = parent.directory_mut() {
                dir.push_child(id);
            }
        }
        self.persist_chain(chain).await
    }

    /// Remove a file or directory. Non-empty directories are rejected with
    /// [`FsError::NotEmpty`] unless `recursive` is set, in which case the
    /// whole subtree goes, depth-first.
    ///
    /// The new root chain is persisted before any object is deleted, so an
    /// interruption can only leak orphans, never break the returned tree.
    pub async fn rm(
        &self,
        root: ObjectId,
        path_str: &str,
        recursive: bool,
    ) -> Result<ObjectId, FsError> {
        let segs = path::segments(path_str)?;
        if segs.is_empty() {
            return Err(FsError::RootOperation("remove"));
        }
        tracing::debug!("rm {} (recursive: {})", path_str, recursive);

        let mut chain = self.resolve(root, &segs).await?;
        let (target_id, target) = self.pop(&mut chain)?;

        // policy checks and subtree discovery happen before any mutation
        if let NodeBody::Directory(dir) = target.body() {
            if !dir.is_empty() && !recursive {
                return Err(FsError::NotEmpty(path::join(&segs)));
            }
        }
        let doomed = self.collect_subtree(target_id, &target).await?;

        if let Some((_, parent)) = chain.last_mut() {
            match parent.directory_mut() {
                Some(dir) => {
                    dir.remove_child(target_id);
                }
                None => return Err(corrupt_ancestry(target_id)),
            }
        }
        let new_root = self.persist_chain(chain).await?;

        stream::iter(doomed)
            .map(|id| async move { self.store.delete(id).await.map_err(FsError::from) })
            .buffer_unordered(self.parallelism)
            .try_collect::<Vec<()>>()
            .await?;

        Ok(new_root)
    }

    /// Rename an entry in place.
    pub async fn rename(
        &self,
        root: ObjectId,
        path_str: &str,
        new_name: &str,
    ) -> Result<ObjectId, FsError> {
        path::validate_name(new_name)?;
        let segs = path::segments(path_str)?;
        if segs.is_empty() {
            return Err(FsError::RootOperation("rename"));
        }
        tracing::debug!("rename {} -> {}", path_str, new_name);

        let mut chain = self.resolve(root, &segs).await?;
        let (old_id, mut node) = self.pop(&mut chain)?;

        {
            let (_, parent) = self.tail(&chain)?;
            let dir = match parent.directory() {
                Some(dir) => dir,
                None => return Err(corrupt_ancestry(old_id)),
            };
            if self.find_child(dir, new_name).await?.is_some() {
                return Err(FsError::NameCollision(new_name.to_string()));
            }
        }

        node.set_name(new_name);
        let new_id = self.put_node(&node).await?;
        self.propagate(chain, old_id, new_id).await
    }

    /// Move an entry into an existing directory, keeping its name.
    ///
    /// Two persisted directory updates (unlink from the old parent, then
    /// link into the new one) with a window in between, not an atomic step.
    pub async fn mv(
        &self,
        root: ObjectId,
        src_str: &str,
        dst_str: &str,
    ) -> Result<ObjectId, FsError> {
        let src_segs = path::segments(src_str)?;
        if src_segs.is_empty() {
            return Err(FsError::RootOperation("move"));
        }
        let dst_segs = path::segments(dst_str)?;
        tracing::debug!("mv {} -> {}", src_str, dst_str);

        let mut src_chain = self.resolve(root, &src_segs).await?;
        let (src_id, src_name) = {
            let (id, node) = self.tail(&src_chain)?;
            (*id, node.name().to_string())
        };

        {
            let dst_chain = self.resolve(root, &dst_segs).await?;
            let (_, dst_node) = self.tail(&dst_chain)?;
            let dst_dir = match dst_node.directory() {
                Some(dir) => dir,
                None => return Err(FsError::NotADirectory(path::join(&dst_segs))),
            };
            // a destination inside the moved subtree would orphan it
            if dst_chain.iter().any(|(id, _)| *id == src_id) {
                return Err(FsError::CycleDetected(path::join(&src_segs)));
            }
            if self.find_child(dst_dir, &src_name).await?.is_some() {
                return Err(FsError::NameCollision(src_name.clone()));
            }
        }

        // update one: unlink from the old parent
        self.pop(&mut src_chain)?;
        if let Some((_, parent)) = src_chain.last_mut() {
            match parent.directory_mut() {
                Some(dir) => {
                    dir.remove_child(src_id);
                }
                None => return Err(corrupt_ancestry(src_id)),
            }
        }
        let mid_root = self.persist_chain(src_chain).await?;

        // update two: link into the new parent, re-resolved against the new
        // root because every ancestor ID may have changed
        let mut dst_chain = self.resolve(mid_root, &dst_segs).await?;
        if let Some((_, dst_node)) = dst_chain.last_mut() {
            match dst_node.directory_mut() {
                Some(dir) => dir.push_child(src_id),
                None => return Err(FsError::NotADirectory(path::join(&dst_segs))),
            }
        }
        self.persist_chain(dst_chain).await
    }

    /// Replace a file's content: remove, then upload.
    pub async fn replace(
        &self,
        root: ObjectId,
        path_str: &str,
        data: Bytes,
    ) -> Result<ObjectId, FsError> {
        let root = self.rm(root, path_str, false).await?;
        self.upload(root, path_str, data).await
    }
}

// private helpers
impl<S: ObjectStore> RelayFs<S> {
    /// Walk `segments` from the root, returning `(id, node)` pairs from the
    /// root down to the target, inclusive.
    async fn resolve(
        &self,
        root: ObjectId,
        segments: &[&str],
    ) -> Result<Vec<(ObjectId, Node)>, FsError> {
        let root_node = self.get_node(root).await?;
        let mut chain = vec![(root, root_node)];

        for depth in 0..segments.len() {
            let found = {
                let (_, node) = self.tail(&chain)?;
                let dir = match node.directory() {
                    Some(dir) => dir,
                    None => {
                        return Err(FsError::NotADirectory(path::join(&segments[..depth])));
                    }
                };
                self.find_child(dir, segments[depth]).await?
            };
            match found {
                Some(pair) => chain.push(pair),
                None => return Err(FsError::NotFound(path::join(&segments[..=depth]))),
            }
        }
        Ok(chain)
    }

    /// Fetch a directory's children in entry order.
    async fn load_children(
        &self,
        dir: &DirectoryNode,
    ) -> Result<Vec<(ObjectId, Node)>, FsError> {
        stream::iter(dir.children().iter().copied())
            .map(|id| async move { Ok::<_, FsError>((id, self.get_node(id).await?)) })
            .buffered(self.parallelism)
            .try_collect()
            .await
    }

    /// Find a child by name. Names live in the child nodes, so this fetches
    /// children until a match; there is no index to consult, by design.
    async fn find_child(
        &self,
        dir: &DirectoryNode,
        name: &str,
    ) -> Result<Option<(ObjectId, Node)>, FsError> {
        let children = self.load_children(dir).await?;
        Ok(children.into_iter().find(|(_, child)| child.name() == name))
    }

    /// Validate that `name` can be added under the directory at the tail of
    /// `chain`; returns the parent's current object ID.
    async fn check_new_entry(
        &self,
        chain: &[(ObjectId, Node)],
        parent_segs: &[&str],
        name: &str,
    ) -> Result<ObjectId, FsError> {
        let (parent_id, parent) = self.tail(chain)?;
        let dir = match parent.directory() {
            Some(dir) => dir,
            None => return Err(FsError::NotADirectory(path::join(parent_segs))),
        };
        if self.find_child(dir, name).await?.is_some() {
            let mut full = parent_segs.to_vec();
            full.push(name);
            return Err(FsError::NameCollision(path::join(&full)));
        }
        Ok(*parent_id)
    }

    /// Persist the tail of `chain` (already mutated by the caller) and
    /// rewrite every ancestor above it. Returns the new root ID.
    async fn persist_chain(&self, mut chain: Vec<(ObjectId, Node)>) -> Result<ObjectId, FsError> {
        let (old_id, node) = self.pop(&mut chain)?;
        let new_id = self.put_node(&node).await?;
        self.propagate(chain, old_id, new_id).await
    }

    /// Rewrite ancestors from the parent of the changed node up to the root:
    /// each one swaps the stale child ID for the fresh one and is
    /// re-persisted, changing its own ID in turn. Superseded objects are
    /// deleted best-effort once the new chain is fully persisted.
    async fn propagate(
        &self,
        mut chain: Vec<(ObjectId, Node)>,
        mut old_id: ObjectId,
        mut new_id: ObjectId,
    ) -> Result<ObjectId, FsError> {
        let mut superseded = vec![old_id];

        while let Some((ancestor_old, mut ancestor)) = chain.pop() {
            match ancestor.directory_mut() {
                Some(dir) => {
                    if !dir.replace_child(old_id, new_id) {
                        return Err(corrupt_ancestry(old_id));
                    }
                }
                None => return Err(corrupt_ancestry(old_id)),
            }
            let persisted = self.put_node(&ancestor).await?;
            superseded.push(ancestor_old);
            old_id = ancestor_old;
            new_id = persisted;
        }
        tracing::debug!("propagated update, new root {}", new_id);

        // the old chain is unreachable from the new root; losing a delete
        // here only leaks an orphan
        for id in superseded {
            if let Err(e) = self.store.delete(id).await {
                tracing::warn!("failed to delete superseded object {}: {}", id, e);
            }
        }
        Ok(new_id)
    }

    /// Persist a staged subtree bottom-up and return its top node's ID.
    async fn stage_tree(
        &self,
        name: &str,
        parent: Option<ObjectId>,
        source: TreeSource,
    ) -> Result<ObjectId, FsError> {
        match source {
            TreeSource::File(data) => self.stage_file(name, parent, data).await,
            TreeSource::Directory(entries) => {
                let mut node = Node::new_directory(name, parent);
                let mut seen = BTreeSet::new();
                for (child_name, child_source) in entries {
                    path::validate_name(&child_name)?;
                    if !seen.insert(child_name.clone()) {
                        return Err(FsError::NameCollision(child_name));
                    }
                    // children cannot know their parent's ID yet; the
                    // back-reference stays empty (it is advisory anyway)
                    let child_id =
                        Box::pin(self.stage_tree(&child_name, None, child_source)).await?;
                    if let Some(dir) = node.directory_mut() {
                        dir.push_child(child_id);
                    }
                }
                self.put_node(&node).await
            }
        }
    }

    /// Split, seal, and persist one file's content, then its node.
    async fn stage_file(
        &self,
        name: &str,
        parent: Option<ObjectId>,
        data: Bytes,
    ) -> Result<ObjectId, FsError> {
        let salt = FileSalt::generate();
        let chunks = chunk::split(data, self.max_block_size)?;
        tracing::debug!("staging file {} as {} blocks", name, chunks.len());

        let mut blocks: Vec<(u64, ObjectId, usize)> =
            stream::iter(chunks.into_iter().enumerate())
                .map(|(index, chunk)| self.put_block(chunk, salt, index as u64))
                .buffer_unordered(self.parallelism)
                .try_collect()
                .await?;
        blocks.sort_by_key(|(index, ..)| *index);

        let mut node = Node::new_file(name, parent, salt);
        if let Some(file) = node.file_mut() {
            for (_, id, len) in blocks {
                file.push_block(id, len as u64);
            }
        }
        self.put_node(&node).await
    }

    async fn put_block(
        &self,
        chunk: Bytes,
        salt: FileSalt,
        index: u64,
    ) -> Result<(u64, ObjectId, usize), FsError> {
        let sealed = self.key.seal_block(&chunk, &salt, index)?;
        let id = self.store.put(Bytes::from(sealed)).await?;
        Ok((index, id, chunk.len()))
    }

    async fn fetch_block(
        &self,
        id: ObjectId,
        salt: FileSalt,
        index: u64,
    ) -> Result<(u64, Bytes), FsError> {
        let sealed = self.store.get(id).await?;
        let plain = self.key.open_block(&sealed, &salt, index)?;
        Ok((index, Bytes::from(plain)))
    }

    /// Every object ID reachable from `node` (blocks and nodes alike),
    /// descendants before the node itself.
    async fn collect_subtree(
        &self,
        id: ObjectId,
        node: &Node,
    ) -> Result<Vec<ObjectId>, FsError> {
        let mut out = Vec::new();
        match node.body() {
            NodeBody::File(file) => out.extend(file.blocks().iter().copied()),
            NodeBody::Directory(dir) => {
                for (child_id, child) in self.load_children(dir).await? {
                    out.extend(Box::pin(self.collect_subtree(child_id, &child)).await?);
                }
            }
        }
        out.push(id);
        Ok(out)
    }

    async fn walk(
        &self,
        dir: &DirectoryNode,
        prefix: &str,
        out: &mut Vec<Entry>,
    ) -> Result<(), FsError> {
        for (_, child) in self.load_children(dir).await? {
            let rel = if prefix.is_empty() {
                child.name().to_string()
            } else {
                format!("{}/{}", prefix, child.name())
            };
            out.push(Entry {
                name: rel.clone(),
                kind: child.kind(),
                size: child.size(),
            });
            if let NodeBody::Directory(sub) = child.body() {
                Box::pin(self.walk(sub, &rel, out)).await?;
            }
        }
        Ok(())
    }

    /// Seal and persist one node object: `salt || sealed(encoded node)`.
    async fn put_node(&self, node: &Node) -> Result<ObjectId, FsError> {
        let encoded = node.encode()?;
        let framed_len = SALT_SIZE + encoded.len() + TAG_SIZE;
        let max = self.store.max_object_size();
        if framed_len > max {
            // reject before any remote write; directories with too many
            // children land here (no sharding)
            return Err(FsError::SizeLimit {
                len: framed_len,
                max,
            });
        }

        let salt = FileSalt::generate();
        let sealed = self.key.seal_block(&encoded, &salt, NODE_NONCE_INDEX)?;
        let mut object = Vec::with_capacity(framed_len);
        object.extend_from_slice(&*salt);
        object.extend_from_slice(&sealed);
        Ok(self.store.put(Bytes::from(object)).await?)
    }

    async fn get_node(&self, id: ObjectId) -> Result<Node, FsError> {
        let object = self.store.get(id).await?;
        if object.len() < SALT_SIZE + TAG_SIZE {
            return Err(FsError::Default(anyhow!("node object {} is too short", id)));
        }
        let mut salt = [0u8; SALT_SIZE];
        salt.copy_from_slice(&object[..SALT_SIZE]);
        let plain = self
            .key
            .open_block(&object[SALT_SIZE..], &FileSalt::from(salt), NODE_NONCE_INDEX)?;
        Ok(Node::decode(&plain)?)
    }

    fn tail<'a>(&self, chain: &'a [(ObjectId, Node)]) -> Result<&'a (ObjectId, Node), FsError> {
        chain
            .last()
            .ok_or_else(|| FsError::Default(anyhow!("empty resolution chain")))
    }

    fn pop(&self, chain: &mut Vec<(ObjectId, Node)>) -> Result<(ObjectId, Node), FsError> {
        chain
            .pop()
            .ok_or_else(|| FsError::Default(anyhow!("empty resolution chain")))
    }
}

fn corrupt_ancestry(child: ObjectId) -> FsError {
    FsError::Default(anyhow!("ancestor chain does not reference child {}", child))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::crypto::KEY_SIZE;
    use crate::store::MemoryStore;

    fn engine(max_object_size: usize, max_block_size: usize) -> RelayFs<MemoryStore> {
        RelayFs::new(
            MemoryStore::new(max_object_size),
            ContentKey::from_slice(&[9u8; KEY_SIZE]).unwrap(),
            FsOptions {
                max_block_size,
                parallelism: 4,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_block_size_must_fit_medium() {
        let store = MemoryStore::new(64);
        let key = ContentKey::from_slice(&[9u8; KEY_SIZE]).unwrap();
        // 64 - TAG_SIZE is the largest viable plaintext block
        assert!(RelayFs::new(
            store.clone(),
            key.clone(),
            FsOptions {
                max_block_size: 64,
                parallelism: 1
            }
        )
        .is_err());
        assert!(RelayFs::new(
            store,
            key,
            FsOptions {
                max_block_size: 64 - TAG_SIZE,
                parallelism: 1
            }
        )
        .is_ok());
    }

    #[tokio::test]
    async fn test_every_mutation_yields_a_new_root() {
        let fs = engine(1 << 16, 1 << 10);
        let r0 = fs.init().await.unwrap();
        let r1 = fs.mkdir(r0, "/a").await.unwrap();
        assert_ne!(r0, r1);
        let r2 = fs
            .upload(r1, "/a/f.bin", Bytes::from_static(b"abc"))
            .await
            .unwrap();
        assert_ne!(r1, r2);
    }

    #[tokio::test]
    async fn test_superseded_objects_are_cleaned_up() {
        let fs = engine(1 << 16, 1 << 10);
        let root = fs.init().await.unwrap();
        let root = fs
            .upload(root, "/f", Bytes::from_static(b"0123456789"))
            .await
            .unwrap();
        // one root dir + one file node + one block
        assert_eq!(fs.store().object_count(), 3);

        let root = fs.rm(root, "/f", false).await.unwrap();
        assert_eq!(fs.store().object_count(), 1);
        assert!(fs.ls(root, "/").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_directory_rejected_before_write() {
        let fs = engine(256, 64);
        let mut root = fs.init().await.unwrap();
        // each child adds an object id to the parent's serialized form;
        // eventually the root node no longer fits a 256-byte object
        let mut failed = false;
        for i in 0..64 {
            match fs.mkdir(root, &format!("/d{:02}", i)).await {
                Ok(new_root) => root = new_root,
                Err(FsError::SizeLimit { .. }) => {
                    failed = true;
                    break;
                }
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert!(failed, "directory growth should hit the object size limit");
        // the tree at the last good root is still fully readable
        assert!(!fs.ls(root, "/").await.unwrap().is_empty());
    }
}
