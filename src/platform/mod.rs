pub mod host;
pub mod memory;
pub mod traits;

pub use host::HostFileSystem;
pub use memory::{MemoryFileSystem, Operation};
pub use traits::{EntryState, FileSystem, PathNormalizer};
