//! Idempotent creation and removal of files and directories.
//!
//! Every call normalizes its input, observes the current state of the target
//! and performs at most one creating or deleting action (two when a file's
//! parent directory chain has to be created first). Results are reported as
//! [`Outcome`]s; nothing in here returns `Err` or panics for filesystem or
//! normalization failures.
//!
//! The check-then-act sequence is not atomic. Two callers racing to create
//! the same path can both observe it as absent; the loser of a file race gets
//! a `CreationFailed` outcome because files are created with create-new
//! semantics.

use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::config::ProvisionConfig;
use crate::core::normalize::{NormalizedPath, PathError, SeparatorNormalizer};
use crate::core::outcome::{FailureKind, Outcome};
use crate::platform::traits::{EntryState, FileSystem, PathNormalizer};
use crate::platform::HostFileSystem;

pub const FILE_EXISTS: &str = "file already exists";
pub const DIRECTORY_EXISTS: &str = "directory already exists";
pub const FILE_CREATED: &str = "file created";
pub const DIRECTORY_CREATED: &str = "directory created";
pub const REMOVED: &str = "removed";
pub const NOTHING_TO_DELETE: &str = "nothing to delete";

/// Kind of entry a caller wants to exist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    fn noun(self) -> &'static str {
        match self {
            EntryKind::File => "file",
            EntryKind::Directory => "directory",
        }
    }
}

/// How [`Provisioner::remove`] interprets its input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemovePolicy {
    /// Normalize like creation does
    #[default]
    Normalize,

    /// Hand the raw string to the filesystem untouched
    Raw,
}

pub struct Provisioner<F = HostFileSystem, N = SeparatorNormalizer> {
    fs: F,
    normalizer: N,
    remove_policy: RemovePolicy,
}

impl Default for Provisioner {
    fn default() -> Self {
        Self::new()
    }
}

impl Provisioner {
    /// Host filesystem with the default excluded tokens
    pub fn new() -> Self {
        Self::with_parts(HostFileSystem::new(), SeparatorNormalizer::default())
    }

    pub fn from_config(config: &ProvisionConfig) -> Self {
        let normalizer = SeparatorNormalizer::new(config.excluded_tokens.iter().cloned());
        let policy = if config.normalize_on_remove {
            RemovePolicy::Normalize
        } else {
            RemovePolicy::Raw
        };

        Self::with_parts(HostFileSystem::new(), normalizer).with_remove_policy(policy)
    }
}

impl<F, N> Provisioner<F, N>
where
    F: FileSystem,
    N: PathNormalizer,
{
    pub fn with_parts(fs: F, normalizer: N) -> Self {
        Self {
            fs,
            normalizer,
            remove_policy: RemovePolicy::default(),
        }
    }

    pub fn with_remove_policy(mut self, policy: RemovePolicy) -> Self {
        self.remove_policy = policy;
        self
    }

    /// Legacy removal: no normalization of the input
    pub fn with_raw_remove(self) -> Self {
        self.with_remove_policy(RemovePolicy::Raw)
    }

    pub fn filesystem(&self) -> &F {
        &self.fs
    }

    pub fn remove_policy(&self) -> RemovePolicy {
        self.remove_policy
    }

    /// Canonical form of `path` as this provisioner sees it
    pub fn resolve(&self, path: &str) -> Result<NormalizedPath, PathError> {
        self.normalizer.normalize(path)
    }

    pub fn ensure_file(&self, path: &str) -> Outcome<()> {
        self.ensure_exists(path, EntryKind::File)
    }

    pub fn ensure_dir(&self, path: &str) -> Outcome<()> {
        self.ensure_exists(path, EntryKind::Directory)
    }

    /// Make sure an entry of the requested kind exists at `path`.
    ///
    /// | observed  | wanted    | result                      |
    /// |-----------|-----------|-----------------------------|
    /// | file      | file      | success, already exists     |
    /// | directory | directory | success, already exists     |
    /// | directory | file      | `NameCollision`             |
    /// | file      | directory | `NameCollision`             |
    /// | absent    | directory | create with ancestors       |
    /// | absent    | file      | ensure parent, create empty |
    pub fn ensure_exists(&self, path: &str, kind: EntryKind) -> Outcome<()> {
        let target = match self.resolve_for_outcome(path) {
            Ok(target) => target,
            Err(rejected) => return rejected,
        };

        match kind {
            EntryKind::Directory => self.ensure_dir_at(&target),
            EntryKind::File => self.ensure_file_at(&target),
        }
    }

    /// `ensure_file`, handing back the resolved target when it succeeds
    pub(crate) fn ensure_file_resolved(&self, path: &str) -> Result<NormalizedPath, Outcome<()>> {
        let target = self.resolve_for_outcome(path)?;
        let outcome = self.ensure_file_at(&target);
        if outcome.is_failure() {
            return Err(outcome);
        }
        Ok(target)
    }

    fn resolve_for_outcome(&self, path: &str) -> Result<NormalizedPath, Outcome<()>> {
        self.resolve(path).map_err(|e| {
            debug!("Rejected path {:?}: {}", path, e);
            Outcome::failure(e.kind(), e.to_string())
        })
    }

    fn ensure_dir_at(&self, target: &NormalizedPath) -> Outcome<()> {
        let host = target.host_path();

        match self.fs.probe(&host) {
            EntryState::Directory => Outcome::success_msg(DIRECTORY_EXISTS),
            state @ (EntryState::File | EntryState::Other) => {
                collision(target, EntryKind::Directory, state)
            }
            EntryState::Absent => match self.fs.create_dir_all(&host) {
                Ok(()) => {
                    info!("Created directory: {}", target);
                    Outcome::success_msg(DIRECTORY_CREATED)
                }
                Err(e) => {
                    warn!("Failed to create directory {}: {}", target, e);
                    Outcome::failure(FailureKind::CreationFailed, e.to_string())
                }
            },
        }
    }

    fn ensure_file_at(&self, target: &NormalizedPath) -> Outcome<()> {
        let host = target.host_path();

        match self.fs.probe(&host) {
            EntryState::File => Outcome::success_msg(FILE_EXISTS),
            state @ (EntryState::Directory | EntryState::Other) => {
                collision(target, EntryKind::File, state)
            }
            EntryState::Absent => {
                // The directory branch never recurses, so this is the only step up
                if let Some(parent) = target.parent() {
                    let prepared = self.ensure_dir_at(&parent);
                    if prepared.is_failure() {
                        return prepared;
                    }
                }

                match self.fs.create_file(&host) {
                    Ok(()) => {
                        info!("Created file: {}", target);
                        Outcome::success_msg(FILE_CREATED)
                    }
                    Err(e) => {
                        warn!("Failed to create file {}: {}", target, e);
                        Outcome::failure(FailureKind::CreationFailed, e.to_string())
                    }
                }
            }
        }
    }

    /// Remove a single file or empty directory.
    ///
    /// A missing target is a success. Non-empty directories are never
    /// removed recursively; the host error is reported instead.
    pub fn remove(&self, path: &str) -> Outcome<()> {
        let host = match self.remove_policy {
            RemovePolicy::Normalize => match self.resolve_for_outcome(path) {
                Ok(target) => target.host_path(),
                Err(rejected) => return rejected,
            },
            RemovePolicy::Raw => PathBuf::from(path),
        };

        if !self.fs.exists(&host) {
            debug!("Nothing to delete at {}", host.display());
            return Outcome::success_msg(NOTHING_TO_DELETE);
        }

        match self.fs.remove(&host) {
            Ok(()) => {
                info!("Removed: {}", host.display());
                Outcome::success_msg(REMOVED)
            }
            Err(e) => {
                warn!("Failed to remove {}: {}", host.display(), e);
                Outcome::failure(FailureKind::DeletionFailed, e.to_string())
            }
        }
    }
}

fn collision(target: &NormalizedPath, wanted: EntryKind, found: EntryState) -> Outcome<()> {
    let found = match found {
        EntryState::File => "file",
        EntryState::Directory => "directory",
        _ => "special file",
    };
    warn!("Name collision at {}: wanted {}, found {}", target, wanted.noun(), found);
    Outcome::failure(
        FailureKind::NameCollision,
        format!("name collision: {} exists as a {}, not a {}", target, found, wanted.noun()),
    )
}
