use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::platform::traits::FileSystem;

/// Mutating call recorded by [`MemoryFileSystem`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    CreateDirAll(PathBuf),
    CreateFile(PathBuf),
    WriteFile(PathBuf),
    Remove(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    File(Vec<u8>),
    Directory,
}

#[derive(Debug, Default)]
struct Inner {
    nodes: BTreeMap<PathBuf, Node>,
    journal: Vec<Operation>,
    deny_creates: bool,
    deny_writes: bool,
    deny_removes: bool,
}

/// In-process [`FileSystem`] that never touches the disk.
///
/// Every mutating call is journaled, and creation, writes and removal can be
/// made to fail on demand to reproduce permission errors.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    inner: Mutex<Inner>,
}

fn key(path: &Path) -> PathBuf {
    path.components().collect()
}

fn is_root(key: &Path) -> bool {
    key.as_os_str().is_empty() || key.parent().is_none()
}

fn denied(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::PermissionDenied,
        format!("permission denied: {}", path.display()),
    )
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Place a file (and its ancestors) without journaling
    pub fn seed_file(&self, path: impl AsRef<Path>, contents: &[u8]) {
        let key = key(path.as_ref());
        let mut inner = self.lock();
        if let Some(parent) = key.parent() {
            Self::insert_dirs(&mut inner.nodes, parent);
        }
        inner.nodes.insert(key, Node::File(contents.to_vec()));
    }

    /// Place a directory (and its ancestors) without journaling
    pub fn seed_dir(&self, path: impl AsRef<Path>) {
        let key = key(path.as_ref());
        Self::insert_dirs(&mut self.lock().nodes, &key);
    }

    fn insert_dirs(nodes: &mut BTreeMap<PathBuf, Node>, key: &Path) {
        for ancestor in key.ancestors().filter(|a| !is_root(a)) {
            nodes.entry(ancestor.to_path_buf()).or_insert(Node::Directory);
        }
    }

    pub fn deny_creates(&self, deny: bool) {
        self.lock().deny_creates = deny;
    }

    pub fn deny_writes(&self, deny: bool) {
        self.lock().deny_writes = deny;
    }

    pub fn deny_removes(&self, deny: bool) {
        self.lock().deny_removes = deny;
    }

    pub fn journal(&self) -> Vec<Operation> {
        self.lock().journal.clone()
    }

    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        match self.lock().nodes.get(&key(path.as_ref())) {
            Some(Node::File(contents)) => Some(contents.clone()),
            _ => None,
        }
    }

    /// Number of entries stored, directories included
    pub fn len(&self) -> usize {
        self.lock().nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FileSystem for MemoryFileSystem {
    fn exists(&self, path: &Path) -> bool {
        let key = key(path);
        if key.as_os_str().is_empty() {
            return false;
        }
        is_root(&key) || self.lock().nodes.contains_key(&key)
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(self.lock().nodes.get(&key(path)), Some(Node::File(_)))
    }

    fn is_dir(&self, path: &Path) -> bool {
        let key = key(path);
        if key.as_os_str().is_empty() {
            return false;
        }
        is_root(&key) || matches!(self.lock().nodes.get(&key), Some(Node::Directory))
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let key = key(path);
        let mut inner = self.lock();
        inner.journal.push(Operation::CreateDirAll(key.clone()));

        if inner.deny_creates {
            return Err(denied(&key));
        }

        let mut ancestors: Vec<&Path> = key.ancestors().filter(|a| !is_root(a)).collect();
        ancestors.reverse();
        for ancestor in ancestors {
            match inner.nodes.get(ancestor) {
                Some(Node::Directory) => continue,
                Some(Node::File(_)) => {
                    return Err(io::Error::other(format!(
                        "not a directory: {}",
                        ancestor.display()
                    )));
                }
                None => {}
            }
            inner.nodes.insert(ancestor.to_path_buf(), Node::Directory);
        }

        Ok(())
    }

    fn create_file(&self, path: &Path) -> io::Result<()> {
        let key = key(path);
        let mut inner = self.lock();
        inner.journal.push(Operation::CreateFile(key.clone()));

        if inner.deny_creates {
            return Err(denied(&key));
        }
        if inner.nodes.contains_key(&key) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("already exists: {}", key.display()),
            ));
        }

        let parent_is_dir = match key.parent() {
            Some(parent) if !is_root(parent) => {
                matches!(inner.nodes.get(parent), Some(Node::Directory))
            }
            _ => true,
        };
        if !parent_is_dir {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("parent directory missing: {}", key.display()),
            ));
        }

        inner.nodes.insert(key, Node::File(Vec::new()));
        Ok(())
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let key = key(path);
        let mut inner = self.lock();
        inner.journal.push(Operation::WriteFile(key.clone()));

        if inner.deny_writes {
            return Err(denied(&key));
        }

        match inner.nodes.get_mut(&key) {
            Some(Node::File(existing)) => {
                *existing = contents.to_vec();
                Ok(())
            }
            Some(Node::Directory) => {
                Err(io::Error::other(format!("is a directory: {}", key.display())))
            }
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", key.display()),
            )),
        }
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        let key = key(path);
        let mut inner = self.lock();
        inner.journal.push(Operation::Remove(key.clone()));

        if inner.deny_removes {
            return Err(denied(&key));
        }

        let is_dir = match inner.nodes.get(&key) {
            None => {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no such entry: {}", key.display()),
                ));
            }
            Some(node) => *node == Node::Directory,
        };
        if is_dir && inner.nodes.keys().any(|k| k.parent() == Some(key.as_path())) {
            return Err(io::Error::other(format!("directory not empty: {}", key.display())));
        }

        inner.nodes.remove(&key);
        Ok(())
    }
}
