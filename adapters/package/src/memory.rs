//! In-memory packages.

use std::path::Path;

use skirmish_map_core::{Package, PackageEntries, PackageError, PackageFactory};

/// Package whose entries live in memory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryPackage {
    entries: PackageEntries,
}

impl MemoryPackage {
    /// Creates an empty package.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a package holding the provided entries.
    #[must_use]
    pub fn from_entries(entries: PackageEntries) -> Self {
        Self { entries }
    }

    /// Adds or replaces an entry, returning the package for chaining.
    #[must_use]
    pub fn with_entry(mut self, name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        let _ = self.entries.insert(name.into(), contents.into());
        self
    }

    /// Entries currently stored.
    #[must_use]
    pub fn entries(&self) -> &PackageEntries {
        &self.entries
    }
}

impl Package for MemoryPackage {
    fn get_content(&self, entry: &str) -> Result<Vec<u8>, PackageError> {
        self.entries
            .get(entry)
            .cloned()
            .ok_or_else(|| PackageError::MissingEntry(entry.to_owned()))
    }

    fn write(&mut self, entries: &PackageEntries) -> Result<(), PackageError> {
        self.entries
            .extend(entries.iter().map(|(name, data)| (name.clone(), data.clone())));
        Ok(())
    }
}

/// Creates [`MemoryPackage`] instances, ignoring the requested path.
#[derive(Clone, Copy, Debug, Default)]
pub struct MemoryPackageFactory;

impl PackageFactory for MemoryPackageFactory {
    fn create_package(
        &self,
        path: &Path,
        size_hint: usize,
        entries: PackageEntries,
    ) -> Result<Box<dyn Package>, PackageError> {
        log::debug!(
            "creating in-memory package for {} ({size_hint} bytes)",
            path.display()
        );
        Ok(Box::new(MemoryPackage::from_entries(entries)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_entries_are_reported_by_name() {
        let package = MemoryPackage::new().with_entry("map.yaml", "Title: x\n");

        assert_eq!(
            package.get_content("map.yaml").expect("entry exists"),
            b"Title: x\n".to_vec()
        );
        assert!(matches!(
            package.get_content("map.bin"),
            Err(PackageError::MissingEntry(name)) if name == "map.bin"
        ));
    }

    #[test]
    fn write_keeps_entries_it_does_not_replace() {
        let mut package = MemoryPackage::new()
            .with_entry("map.yaml", "old")
            .with_entry("notes.txt", "keep");

        let mut update = PackageEntries::new();
        let _ = update.insert("map.yaml".to_owned(), b"new".to_vec());
        package.write(&update).expect("write succeeds");

        assert_eq!(package.entries().len(), 2);
        assert_eq!(package.get_content("map.yaml").expect("entry"), b"new".to_vec());
        assert_eq!(package.get_content("notes.txt").expect("entry"), b"keep".to_vec());
    }

    #[test]
    fn factory_creates_package_with_exactly_the_entries() {
        let mut entries = PackageEntries::new();
        let _ = entries.insert("map.bin".to_owned(), vec![1, 0, 0, 0, 0]);

        let package = MemoryPackageFactory
            .create_package(Path::new("maps/new"), 5, entries)
            .expect("package created");
        assert_eq!(
            package.get_content("map.bin").expect("entry exists"),
            vec![1, 0, 0, 0, 0]
        );
    }
}
