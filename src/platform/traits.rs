use std::io;
use std::path::Path;

use crate::core::normalize::{NormalizedPath, PathError};

/// Path canonicalization applied before any filesystem access
pub trait PathNormalizer {
    /// Turn a raw, possibly malformed path into its canonical form
    fn normalize(&self, path: &str) -> Result<NormalizedPath, PathError>;
}

/// Observed state of a path on the host filesystem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Absent,
    File,
    Directory,
    /// Exists but is neither a regular file nor a directory (socket, dangling link, ...)
    Other,
}

/// Host filesystem primitives the provisioner is built on.
///
/// Each call is expected to be atomic for a single entry; nothing composes
/// atomically across calls.
pub trait FileSystem {
    fn exists(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    /// Create a directory and every missing ancestor in one call
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Create an empty file, failing if anything already exists at `path`
    fn create_file(&self, path: &Path) -> io::Result<()>;

    /// Replace the contents of an existing file
    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Remove a single file or an empty directory
    fn remove(&self, path: &Path) -> io::Result<()>;

    fn probe(&self, path: &Path) -> EntryState {
        if !self.exists(path) {
            EntryState::Absent
        } else if self.is_file(path) {
            EntryState::File
        } else if self.is_dir(path) {
            EntryState::Directory
        } else {
            EntryState::Other
        }
    }
}
