//! Binding a document to the package it lives in.

use std::path::{Path, PathBuf};

use skirmish_map_core::{
    Package, PackageEntries, PackageFactory, TilesetRegistry, MAP_GRID_ENTRY, MAP_TEXT_ENTRY,
};
use thiserror::Error;

use crate::{LoadEnvironment, LoadFailure, MapDocument, MapSaveError};

/// A map at `path` could not be loaded.
#[derive(Debug, Error)]
#[error("failed to load map {}: {source}", .path.display())]
pub struct MapLoadError {
    /// Location of the package.
    pub path: PathBuf,
    /// Underlying failure.
    #[source]
    pub source: LoadFailure,
}

/// A document together with the package it is persisted in.
#[derive(Debug)]
pub struct MapSession {
    path: PathBuf,
    package: Box<dyn Package>,
    document: MapDocument,
}

impl MapSession {
    /// Loads the document stored in `package`.
    pub fn open(
        path: impl Into<PathBuf>,
        package: Box<dyn Package>,
        env: &LoadEnvironment,
    ) -> Result<Self, MapLoadError> {
        let path = path.into();
        log::debug!("opening map {}", path.display());

        let loaded = package
            .get_content(MAP_TEXT_ENTRY)
            .map_err(LoadFailure::from)
            .and_then(|text| {
                MapDocument::load_with(&text, || package.get_content(MAP_GRID_ENTRY), env)
            });

        match loaded {
            Ok(document) => Ok(Self {
                path,
                package,
                document,
            }),
            Err(source) => Err(MapLoadError { path, source }),
        }
    }

    /// Persists `document` into a new package at `path`.
    pub fn create(
        path: impl Into<PathBuf>,
        mut document: MapDocument,
        factory: &dyn PackageFactory,
        tilesets: &dyn TilesetRegistry,
    ) -> Result<Self, MapSaveError> {
        let path = path.into();
        let entries = document.to_entries(tilesets)?;
        let package = factory.create_package(&path, payload_len(&entries), entries)?;
        log::debug!("created map package {}", path.display());

        Ok(Self {
            path,
            package,
            document,
        })
    }

    /// Saves the document to `to_path`.
    ///
    /// Saving to the current path rewrites the map entries in place. Saving
    /// anywhere else creates a new package holding only the map entries and
    /// switches the session over to it.
    pub fn save(
        &mut self,
        to_path: impl AsRef<Path>,
        factory: &dyn PackageFactory,
        tilesets: &dyn TilesetRegistry,
    ) -> Result<(), MapSaveError> {
        let to_path = to_path.as_ref();
        let entries = self.document.to_entries(tilesets)?;

        if to_path == self.path {
            self.package.write(&entries)?;
            log::debug!("updated map package {}", to_path.display());
        } else {
            self.package = factory.create_package(to_path, payload_len(&entries), entries)?;
            self.path = to_path.to_owned();
            log::debug!("created map package {}", to_path.display());
        }

        Ok(())
    }

    /// Location of the package backing the session.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Package backing the session.
    #[must_use]
    pub fn package(&self) -> &dyn Package {
        self.package.as_ref()
    }

    /// Loaded document.
    #[must_use]
    pub fn document(&self) -> &MapDocument {
        &self.document
    }

    /// Loaded document for editing.
    pub fn document_mut(&mut self) -> &mut MapDocument {
        &mut self.document
    }

    /// Releases the package and returns the document.
    #[must_use]
    pub fn into_document(self) -> MapDocument {
        self.document
    }
}

fn payload_len(entries: &PackageEntries) -> usize {
    entries.values().map(Vec::len).sum()
}
