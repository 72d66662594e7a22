//! Idempotent filesystem provisioning with normalized paths.
//!
//! Every provisioning call reports through [`Outcome`]: existing entries of the
//! right kind are success, never errors.

pub mod config;
pub mod core;
pub mod observability;
pub mod platform;

pub use crate::config::ProvisionConfig;
pub use crate::core::{
    EntryKind, FailureKind, NormalizedPath, Outcome, PathError, Provisioner, Status,
};
pub use crate::platform::{FileSystem, HostFileSystem, MemoryFileSystem, PathNormalizer};

pub use anyhow::{Context, Result};
