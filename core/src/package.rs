//! Archive collaborator contracts.

use std::{collections::BTreeMap, fmt, io, path::Path, path::PathBuf};

use thiserror::Error;

/// Entry holding the structured text description of a map.
pub const MAP_TEXT_ENTRY: &str = "map.yaml";
/// Entry holding the binary terrain and resource grids.
pub const MAP_GRID_ENTRY: &str = "map.bin";

/// Named byte payloads handed to a package in one write.
pub type PackageEntries = BTreeMap<String, Vec<u8>>;

/// Archive that exposes named byte entries for reading and writing.
pub trait Package: fmt::Debug {
    /// Reads the complete contents of the named entry.
    fn get_content(&self, entry: &str) -> Result<Vec<u8>, PackageError>;

    /// Creates or replaces every provided entry.
    ///
    /// Entries not named in `entries` are left untouched.
    fn write(&mut self, entries: &PackageEntries) -> Result<(), PackageError>;
}

/// Creates brand-new packages at a target location.
pub trait PackageFactory {
    /// Creates a package at `path` holding exactly `entries`.
    ///
    /// `size_hint` is the total payload size in bytes the caller intends to
    /// store; implementations may ignore it.
    fn create_package(
        &self,
        path: &Path,
        size_hint: usize,
        entries: PackageEntries,
    ) -> Result<Box<dyn Package>, PackageError>;
}

/// Failures reported by package implementations.
#[derive(Debug, Error)]
pub enum PackageError {
    /// The requested entry does not exist in the package.
    #[error("package entry `{0}` does not exist")]
    MissingEntry(String),
    /// The entry name cannot be represented inside the package.
    #[error("package entry name `{0}` is not valid")]
    InvalidEntryName(String),
    /// Underlying storage failed.
    #[error("package storage at {} failed", .path.display())]
    Io {
        /// Location that was being accessed.
        path: PathBuf,
        /// Error reported by the operating system.
        #[source]
        source: io::Error,
    },
}
