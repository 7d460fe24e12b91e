//! Virtual file system abstraction.
//!
//! The URL store persists through a [`Vfs`] so tests can run against
//! [`MemoryVfs`] while the app writes to [`DiskVfs`].

mod disk;
mod memory;

pub use disk::DiskVfs;
pub use memory::MemoryVfs;

use kiosk_types::error::Result;

/// Minimal file-system operations over normalized absolute paths.
pub trait Vfs {
    /// Read an entire file.
    fn read(&self, path: &str) -> Result<Vec<u8>>;

    /// Create or replace a file. The parent directory must exist.
    fn write(&mut self, path: &str, data: &[u8]) -> Result<()>;

    /// Create a directory and any missing parents.
    fn mkdir(&mut self, path: &str) -> Result<()>;

    /// Remove a file or an empty directory.
    fn remove(&mut self, path: &str) -> Result<()>;

    /// Whether `path` exists.
    fn exists(&self, path: &str) -> bool;
}
