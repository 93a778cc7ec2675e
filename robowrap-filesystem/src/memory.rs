use std::collections::HashMap;

use anyhow::{anyhow, bail, Context, Result};
use camino::Utf8Path;

use crate::paths::{self, normalize};

use super::Filesystem;

/// An in-memory representation of a file system
///
/// Paths are normalized before storage, so `E:/Backup/` and `E:\Backup` name the same entry.
#[derive(Debug, Default, Clone)]
pub struct MemoryFilesystem {
    map: HashMap<String, Node>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Node {
    File,
    Directory,
}

impl MemoryFilesystem {
    /// Constructs an empty file system
    pub fn new() -> Self {
        Default::default()
    }

    /// Creates a directory whose parent must already exist (roots such as `C:\` have no parent)
    pub fn create_directory(&mut self, path: impl AsRef<Utf8Path>) -> Result<()> {
        let path = path.as_ref().as_str();
        self.insert_node(path, Node::Directory)
            .with_context(|| format!("Creating directory: {path}"))
    }

    /// Creates a directory and all of its parents
    pub fn create_directory_all(&mut self, path: impl AsRef<Utf8Path>) -> Result<()> {
        let path = path.as_ref().as_str();
        if let Some(parent) = paths::parent(path) {
            self.create_directory_all(parent)?;
        }
        if !self.is_directory(path) {
            self.create_directory(path)?;
        }
        Ok(())
    }

    /// Creates an empty file whose parent directory must already exist
    pub fn create_file(&mut self, path: impl AsRef<Utf8Path>) -> Result<()> {
        let path = path.as_ref().as_str();
        self.insert_node(path, Node::File)
            .with_context(|| format!("Creating file: {path}"))
    }

    fn insert_node(&mut self, path: &str, node: Node) -> Result<()> {
        if let Some(parent) = paths::parent(path) {
            match self.map.get(&normalize(parent)) {
                Some(Node::Directory) => {}
                Some(Node::File) => bail!("Parent is a file: {}", parent),
                None => return Err(anyhow!("No such directory: {}", parent)),
            }
        }
        let key = normalize(path);
        if self.map.contains_key(&key) {
            bail!("Path already exists: {}", key);
        }
        tracing::trace!("Memory filesystem insert {:?} {}", node, key);
        self.map.insert(key, node);
        Ok(())
    }

    fn node(&self, path: &Utf8Path) -> Option<Node> {
        self.map.get(&normalize(path.as_str())).copied()
    }
}

impl Filesystem for MemoryFilesystem {
    fn exists(&self, path: impl AsRef<Utf8Path>) -> bool {
        self.node(path.as_ref()).is_some()
    }

    fn is_directory(&self, path: impl AsRef<Utf8Path>) -> bool {
        self.node(path.as_ref()) == Some(Node::Directory)
    }

    fn is_file(&self, path: impl AsRef<Utf8Path>) -> bool {
        self.node(path.as_ref()) == Some(Node::File)
    }
}
