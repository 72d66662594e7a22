use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use tracing::debug;

use crate::platform::traits::FileSystem;

/// [`FileSystem`] backed by `std::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct HostFileSystem;

impl HostFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for HostFileSystem {
    fn exists(&self, path: &Path) -> bool {
        // Dangling symlinks still occupy the name
        fs::symlink_metadata(path).is_ok()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        debug!("create_dir_all: {}", path.display());
        fs::create_dir_all(path)
    }

    fn create_file(&self, path: &Path) -> io::Result<()> {
        debug!("create_file: {}", path.display());
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map(|_| ())
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        debug!("write_file: {} ({} bytes)", path.display(), contents.len());
        let mut file = OpenOptions::new().write(true).truncate(true).open(path)?;
        file.write_all(contents)?;
        file.sync_all()
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        debug!("remove: {}", path.display());
        let metadata = fs::symlink_metadata(path)?;
        if metadata.is_dir() {
            fs::remove_dir(path)
        } else {
            fs::remove_file(path)
        }
    }
}
