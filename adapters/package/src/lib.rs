#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Package implementations backing map sessions.
//!
//! [`MemoryPackage`] keeps entries in memory and suits tests and tools that
//! assemble maps without touching disk. [`FolderPackage`] stores each entry as
//! a file inside a directory.

mod folder;
mod memory;

pub use folder::{FolderPackage, FolderPackageFactory};
pub use memory::{MemoryPackage, MemoryPackageFactory};
