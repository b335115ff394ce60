//! Directory-backed packages.

use std::{
    fs, io,
    path::{Component, Path, PathBuf},
};

use skirmish_map_core::{Package, PackageEntries, PackageError, PackageFactory};

/// Package stored as one file per entry inside a directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FolderPackage {
    root: PathBuf,
}

impl FolderPackage {
    /// Opens an existing directory as a package.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, PackageError> {
        let root = root.into();
        let metadata = fs::metadata(&root).map_err(|source| io_error(&root, source))?;
        if !metadata.is_dir() {
            let source = io::Error::new(io::ErrorKind::Other, "not a directory");
            return Err(io_error(&root, source));
        }
        Ok(Self { root })
    }

    /// Directory holding the entries.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, entry: &str) -> Result<PathBuf, PackageError> {
        let mut components = Path::new(entry).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.root.join(entry)),
            _ => Err(PackageError::InvalidEntryName(entry.to_owned())),
        }
    }
}

impl Package for FolderPackage {
    fn get_content(&self, entry: &str) -> Result<Vec<u8>, PackageError> {
        let path = self.entry_path(entry)?;
        fs::read(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => PackageError::MissingEntry(entry.to_owned()),
            _ => io_error(&path, source),
        })
    }

    fn write(&mut self, entries: &PackageEntries) -> Result<(), PackageError> {
        let paths = entries
            .keys()
            .map(|entry| self.entry_path(entry))
            .collect::<Result<Vec<_>, _>>()?;

        fs::create_dir_all(&self.root).map_err(|source| io_error(&self.root, source))?;
        for (path, contents) in paths.iter().zip(entries.values()) {
            fs::write(path, contents).map_err(|source| io_error(path, source))?;
        }
        log::debug!(
            "wrote {} entries to {}",
            entries.len(),
            self.root.display()
        );
        Ok(())
    }
}

/// Creates [`FolderPackage`] directories.
///
/// An existing directory at the target path is replaced.
#[derive(Clone, Copy, Debug, Default)]
pub struct FolderPackageFactory;

impl PackageFactory for FolderPackageFactory {
    fn create_package(
        &self,
        path: &Path,
        _size_hint: usize,
        entries: PackageEntries,
    ) -> Result<Box<dyn Package>, PackageError> {
        if path.exists() {
            log::debug!("replacing existing package directory {}", path.display());
            fs::remove_dir_all(path).map_err(|source| io_error(path, source))?;
        }

        let mut package = FolderPackage {
            root: path.to_owned(),
        };
        package.write(&entries)?;
        Ok(Box::new(package))
    }
}

fn io_error(path: &Path, source: io::Error) -> PackageError {
    PackageError::Io {
        path: path.to_owned(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(pairs: &[(&str, &[u8])]) -> PackageEntries {
        pairs
            .iter()
            .map(|(name, data)| ((*name).to_owned(), data.to_vec()))
            .collect()
    }

    #[test]
    fn factory_creates_directory_with_exactly_the_entries() {
        let dir = tempfile::tempdir().expect("temp dir");
        let target = dir.path().join("twin-rivers");

        let package = FolderPackageFactory
            .create_package(
                &target,
                0,
                entries(&[
                    ("map.yaml", b"Title: x\n".as_slice()),
                    ("map.bin", [1u8, 0, 0, 0, 0].as_slice()),
                ]),
            )
            .expect("package created");

        let mut names: Vec<String> = fs::read_dir(&target)
            .expect("directory exists")
            .map(|entry| {
                entry
                    .expect("readable entry")
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        names.sort();
        assert_eq!(names, ["map.bin", "map.yaml"]);
        assert_eq!(
            package.get_content("map.yaml").expect("entry exists"),
            b"Title: x\n".to_vec()
        );
    }

    #[test]
    fn factory_replaces_existing_directory() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join("stale.txt"), b"old").expect("seed file");

        let _ = FolderPackageFactory
            .create_package(dir.path(), 0, entries(&[("map.yaml", b"".as_slice())]))
            .expect("package created");

        assert!(!dir.path().join("stale.txt").exists());
        assert!(dir.path().join("map.yaml").exists());
    }

    #[test]
    fn missing_files_are_missing_entries() {
        let dir = tempfile::tempdir().expect("temp dir");
        let package = FolderPackage::open(dir.path()).expect("directory opens");

        assert!(matches!(
            package.get_content("map.bin"),
            Err(PackageError::MissingEntry(name)) if name == "map.bin"
        ));
    }

    #[test]
    fn entry_names_cannot_escape_the_directory() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut package = FolderPackage::open(dir.path()).expect("directory opens");

        for name in ["../map.yaml", "nested/map.yaml", "", "/etc/passwd"] {
            assert!(
                matches!(package.get_content(name), Err(PackageError::InvalidEntryName(_))),
                "`{name}` should be rejected"
            );
        }
        assert!(matches!(
            package.write(&entries(&[("../escape", b"x".as_slice())])),
            Err(PackageError::InvalidEntryName(_))
        ));
    }

    #[test]
    fn write_updates_in_place_and_keeps_other_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join("rules.yaml"), b"keep").expect("seed file");
        let mut package = FolderPackage::open(dir.path()).expect("directory opens");

        package
            .write(&entries(&[("map.yaml", b"Title: y\n".as_slice())]))
            .expect("write succeeds");

        assert_eq!(
            package.get_content("rules.yaml").expect("entry exists"),
            b"keep".to_vec()
        );
        assert_eq!(
            package.get_content("map.yaml").expect("entry exists"),
            b"Title: y\n".to_vec()
        );
    }

    #[test]
    fn opening_a_missing_directory_fails() {
        let dir = tempfile::tempdir().expect("temp dir");
        assert!(matches!(
            FolderPackage::open(dir.path().join("absent")),
            Err(PackageError::Io { .. })
        ));
    }
}
