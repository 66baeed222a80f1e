//! Arena of scanned nodes and the rollup reduction over it.
//!
//! Nodes are stored in insertion order. A node is only accepted once its
//! parent is present, so every child sits at a higher index than its parent
//! and a reverse walk over the arena is a valid post-order.

use std::collections::HashMap;
use std::fs::Metadata;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

use super::entry::Entry;
use super::size::apparent_size;

/// Index of a node inside a [`ScanTree`].
pub type NodeId = usize;

/// Id of the scan root.
pub const ROOT: NodeId = 0;

/// Size and timestamps (unix seconds) of a single inode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileStat {
    pub size: u64,
    pub atime: i64,
    pub mtime: i64,
    pub ctime: i64,
}

impl FileStat {
    pub fn from_metadata(metadata: &Metadata) -> Self {
        Self {
            size: apparent_size(metadata),
            atime: metadata.atime(),
            mtime: metadata.mtime(),
            ctime: metadata.ctime(),
        }
    }
}

/// Totals of a subtree: summed sizes and file counts, most recent timestamps.
///
/// Timestamps stay `None` until at least one file has been folded in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Aggregate {
    pub size: u64,
    pub files: u64,
    pub atime: Option<i64>,
    pub mtime: Option<i64>,
    pub ctime: Option<i64>,
}

fn latest(a: Option<i64>, b: Option<i64>) -> Option<i64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

impl Aggregate {
    /// Fold one file into the totals.
    pub fn add_file(&mut self, stat: &FileStat) {
        self.size += stat.size;
        self.files += 1;
        self.atime = latest(self.atime, Some(stat.atime));
        self.mtime = latest(self.mtime, Some(stat.mtime));
        self.ctime = latest(self.ctime, Some(stat.ctime));
    }

    /// Fold another subtree's totals into these.
    pub fn merge(&mut self, other: &Aggregate) {
        self.size += other.size;
        self.files += other.files;
        self.atime = latest(self.atime, other.atime);
        self.mtime = latest(self.mtime, other.mtime);
        self.ctime = latest(self.ctime, other.ctime);
    }

    /// Resolve the timestamps, falling back to `own` for subtrees without files.
    pub fn times_or(&self, own: &FileStat) -> (i64, i64, i64) {
        (
            self.atime.unwrap_or(own.atime),
            self.mtime.unwrap_or(own.mtime),
            self.ctime.unwrap_or(own.ctime),
        )
    }
}

#[derive(Debug, Clone)]
enum NodeKind {
    /// Anything that is not a directory: regular files, symlinks, special files.
    File(FileStat),
    /// A directory together with its own inode stat.
    Dir(FileStat),
}

#[derive(Debug, Clone)]
struct Node {
    path: PathBuf,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

/// Flat tree of everything found under a scan root.
#[derive(Debug, Clone)]
pub struct ScanTree {
    root: PathBuf,
    nodes: Vec<Node>,
    index: HashMap<PathBuf, NodeId>,
}

impl ScanTree {
    /// Create a tree holding only the root directory.
    pub fn new(root: PathBuf, own: FileStat) -> Self {
        let mut index = HashMap::new();
        index.insert(root.clone(), ROOT);

        Self {
            nodes: vec![Node {
                path: root.clone(),
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Dir(own),
            }],
            root,
            index,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    pub fn insert_file(&mut self, path: PathBuf, stat: FileStat) -> Option<NodeId> {
        self.insert(path, NodeKind::File(stat))
    }

    pub fn insert_dir(&mut self, path: PathBuf, own: FileStat) -> Option<NodeId> {
        self.insert(path, NodeKind::Dir(own))
    }

    /// Attach a node under its parent. Returns `None` when the parent is
    /// unknown or the path was already inserted.
    fn insert(&mut self, path: PathBuf, kind: NodeKind) -> Option<NodeId> {
        if self.index.contains_key(&path) {
            return None;
        }
        let parent = *self.index.get(path.parent()?)?;

        let id = self.nodes.len();
        self.nodes[parent].children.push(id);
        self.index.insert(path.clone(), id);
        self.nodes.push(Node {
            path,
            parent: Some(parent),
            children: Vec::new(),
            kind,
        });

        Some(id)
    }

    /// Look up a node by its path.
    pub fn find(&self, path: &Path) -> Option<NodeId> {
        self.index.get(path).copied()
    }

    /// Post-order reduction: the aggregate of every node, indexed by `NodeId`.
    pub fn rollup(&self) -> Vec<Aggregate> {
        let mut aggregates = vec![Aggregate::default(); self.nodes.len()];

        for id in (0..self.nodes.len()).rev() {
            let node = &self.nodes[id];
            if let NodeKind::File(stat) = &node.kind {
                aggregates[id].add_file(stat);
            }
            if let Some(parent) = node.parent {
                let child = aggregates[id];
                aggregates[parent].merge(&child);
            }
        }

        aggregates
    }

    /// Paths of every non-directory node below `id` (or `id` itself for a file).
    pub fn leaf_paths(&self, id: NodeId) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        let mut stack = vec![id];

        while let Some(current) = stack.pop() {
            let node = &self.nodes[current];
            match node.kind {
                NodeKind::File(_) => paths.push(node.path.clone()),
                // Reversed so the output keeps scan order.
                NodeKind::Dir(_) => stack.extend(node.children.iter().rev()),
            }
        }

        paths
    }

    /// Turn the tree into result rows.
    ///
    /// Children of the root are at depth 0. Directories shallower than
    /// `max_depth` are expanded into their children; directories at
    /// `max_depth`, and empty ones at any depth, become a single rollup row.
    pub fn materialize(&self, max_depth: usize) -> Vec<Entry> {
        let aggregates = self.rollup();
        let mut entries = Vec::new();
        self.materialize_children(ROOT, 0, max_depth, &aggregates, &mut entries);
        entries
    }

    fn materialize_children(
        &self,
        id: NodeId,
        depth: usize,
        max_depth: usize,
        aggregates: &[Aggregate],
        entries: &mut Vec<Entry>,
    ) {
        for &child in &self.nodes[id].children {
            let node = &self.nodes[child];
            match node.kind {
                NodeKind::Dir(_) if depth < max_depth && !node.children.is_empty() => {
                    self.materialize_children(child, depth + 1, max_depth, aggregates, entries);
                }
                _ => entries.push(self.entry_for(child, depth, &aggregates[child])),
            }
        }
    }

    fn entry_for(&self, id: NodeId, depth: usize, aggregate: &Aggregate) -> Entry {
        let node = &self.nodes[id];
        let name = node
            .path
            .strip_prefix(&self.root)
            .unwrap_or(&node.path)
            .to_string_lossy()
            .into_owned();

        match &node.kind {
            NodeKind::File(stat) => Entry::file(name, node.path.clone(), depth, stat),
            NodeKind::Dir(own) => Entry::rollup(
                name,
                node.path.clone(),
                depth,
                aggregate,
                own,
                self.leaf_paths(id),
            ),
        }
    }
}
