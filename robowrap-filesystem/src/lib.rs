//! Provides an abstract [`Filesystem`] trait for probing paths, together with a physical
//! ([`DiskFilesystem`]) and virtual ([`MemoryFilesystem`]) implementation.
//!
//! Paths handled here are drive-aware strings such as `C:\Backup` or `\\host\share\Backup`,
//! regardless of the host platform; see the [`paths`] module.
#![warn(missing_docs)]

use camino::Utf8Path;

mod memory;
pub mod paths;
mod physical;

pub use self::{memory::MemoryFilesystem, physical::DiskFilesystem};

/// Read-only queries against a file system
pub trait Filesystem {
    /// Returns true if the path exists
    fn exists(&self, path: impl AsRef<Utf8Path>) -> bool;

    /// Returns true if the path is a directory
    fn is_directory(&self, path: impl AsRef<Utf8Path>) -> bool;

    /// Returns true if the path is a regular file
    fn is_file(&self, path: impl AsRef<Utf8Path>) -> bool;
}
