//! Curated default data keyed by species.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::{fs, io};

use outbreak_core::{Error, SpeciesId, SpeciesTable};

use crate::codec::{JsonSnapshotCodec, SnapshotCodec};
use crate::document::SnapshotDocument;
use crate::file::default_file_name;

/// Lookup of curated default records.
///
/// When an editor changes a slot's species, it asks the catalog whether a
/// curated default exists and, if the user accepts, stages it in a draft.
pub trait DefaultsCatalog: Send + Sync {
    fn has_default(&self, species: SpeciesId) -> bool;

    /// The curated document for `species`, if there is one.
    fn get_default(&self, species: SpeciesId) -> Result<Option<SnapshotDocument>, Error>;
}

/// A catalog with no entries.
impl DefaultsCatalog for () {
    fn has_default(&self, _species: SpeciesId) -> bool {
        false
    }

    fn get_default(&self, _species: SpeciesId) -> Result<Option<SnapshotDocument>, Error> {
        Ok(None)
    }
}

/// Defaults held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDefaults {
    entries: HashMap<SpeciesId, SnapshotDocument>,
}

impl InMemoryDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, species: SpeciesId, doc: SnapshotDocument) {
        self.entries.insert(species, doc);
    }

    pub fn with(mut self, species: SpeciesId, doc: SnapshotDocument) -> Self {
        self.insert(species, doc);
        self
    }
}

impl DefaultsCatalog for InMemoryDefaults {
    fn has_default(&self, species: SpeciesId) -> bool {
        self.entries.contains_key(&species)
    }

    fn get_default(&self, species: SpeciesId) -> Result<Option<SnapshotDocument>, Error> {
        Ok(self.entries.get(&species).cloned())
    }
}

/// Defaults read from a directory of snapshot files.
///
/// Each file is named after the species' national number
/// (`<dir>/25.json`). Empty files count as no default.
pub struct DirectoryDefaults {
    root: PathBuf,
    table: Arc<dyn SpeciesTable>,
    codec: JsonSnapshotCodec,
}

impl DirectoryDefaults {
    pub fn new(root: impl Into<PathBuf>, table: Arc<dyn SpeciesTable>) -> Result<Self, Error> {
        let root = root.into();
        let attr = fs::metadata(&root)?;
        if !attr.is_dir() {
            return Err(Error::Io(io::Error::other(format!(
                "defaults path {} is not a directory",
                root.display()
            ))));
        }

        Ok(Self {
            root,
            table,
            codec: JsonSnapshotCodec::default(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_for(&self, species: SpeciesId) -> PathBuf {
        let national = self.table.to_national(species);
        self.root
            .join(default_file_name(national, self.codec.extension()))
    }
}

impl DefaultsCatalog for DirectoryDefaults {
    fn has_default(&self, species: SpeciesId) -> bool {
        fs::metadata(self.file_for(species))
            .map(|m| m.is_file() && m.len() > 0)
            .unwrap_or(false)
    }

    fn get_default(&self, species: SpeciesId) -> Result<Option<SnapshotDocument>, Error> {
        let path = self.file_for(species);
        tracing::debug!(path = %path.display(), "reading species defaults");

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if bytes.is_empty() {
            return Ok(None);
        }

        self.codec.decode(&bytes).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use outbreak_core::{IdentitySpeciesTable, Outbreak, SlotIndex};

    fn doc(max_spawns: i32) -> SnapshotDocument {
        SnapshotDocument::from_record(
            &Outbreak::new(SlotIndex::new(1).unwrap()).with_spawns(max_spawns, 0),
        )
    }

    #[test]
    fn in_memory_lookup() {
        let catalog = InMemoryDefaults::new().with(SpeciesId(25), doc(60));
        assert!(catalog.has_default(SpeciesId(25)));
        assert!(!catalog.has_default(SpeciesId(26)));
        assert_eq!(
            catalog.get_default(SpeciesId(25)).unwrap().unwrap().max_spawns,
            60
        );
        assert!(catalog.get_default(SpeciesId(26)).unwrap().is_none());
    }

    #[test]
    fn unit_catalog_is_empty() {
        assert!(!().has_default(SpeciesId(1)));
        assert!(().get_default(SpeciesId(1)).unwrap().is_none());
    }

    #[test]
    fn directory_lookup_by_national_number() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = serde_json::to_vec(&doc(45)).unwrap();
        fs::write(dir.path().join("25.json"), bytes).unwrap();
        fs::write(dir.path().join("26.json"), b"").unwrap();

        let catalog =
            DirectoryDefaults::new(dir.path(), Arc::new(IdentitySpeciesTable::new())).unwrap();

        assert!(catalog.has_default(SpeciesId(25)));
        assert_eq!(
            catalog.get_default(SpeciesId(25)).unwrap().unwrap().max_spawns,
            45
        );

        assert!(!catalog.has_default(SpeciesId(26)));
        assert!(catalog.get_default(SpeciesId(26)).unwrap().is_none());

        assert!(!catalog.has_default(SpeciesId(27)));
        assert!(catalog.get_default(SpeciesId(27)).unwrap().is_none());
    }

    #[test]
    fn directory_reports_malformed_entries() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("25.json"), b"{\"species\": 25}").unwrap();

        let catalog =
            DirectoryDefaults::new(dir.path(), Arc::new(IdentitySpeciesTable::new())).unwrap();
        assert!(matches!(
            catalog.get_default(SpeciesId(25)),
            Err(Error::MalformedSnapshot { .. })
        ));
    }

    #[test]
    fn directory_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            DirectoryDefaults::new(missing, Arc::new(IdentitySpeciesTable::new())),
            Err(Error::Io(_))
        ));
    }
}
