//! Snapshot files on disk.

use std::fs;
use std::path::Path;

use outbreak_core::{Error, Outbreak};

use crate::codec::SnapshotCodec;
use crate::draft::{Draft, DraftSource};

/// File name for a snapshot of a species, e.g. `25.json`.
pub fn default_file_name(national: u16, extension: &str) -> String {
    format!("{}.{}", national, extension)
}

/// Write a record's snapshot to `path`.
pub fn dump_to_file(
    codec: &dyn SnapshotCodec,
    record: &Outbreak,
    path: &Path,
) -> Result<(), Error> {
    let bytes = codec.dump(record)?;
    tracing::debug!(path = %path.display(), slot = %record.slot(), "writing snapshot");
    fs::write(path, &bytes)?;
    Ok(())
}

/// Stage the snapshot at `path` as a draft of `live`.
///
/// `live` is only cloned; nothing changes until the draft is committed.
pub fn load_from_file(
    codec: &dyn SnapshotCodec,
    live: &Outbreak,
    path: &Path,
) -> Result<Draft, Error> {
    tracing::debug!(path = %path.display(), slot = %live.slot(), "reading snapshot");
    let bytes = fs::read(path)?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let mut draft = Draft::of(live).with_source(DraftSource::Snapshot { name });
    draft.restore(codec, &bytes)?;
    Ok(draft)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JsonSnapshotCodec;
    use outbreak_core::{SlotIndex, SpeciesId};

    #[test]
    fn file_name_uses_national_number() {
        assert_eq!(default_file_name(133, "json"), "133.json");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let live = Outbreak::new(SlotIndex::new(1).unwrap());
        let err = load_from_file(
            &JsonSnapshotCodec::default(),
            &live,
            &dir.path().join("absent.json"),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn loaded_draft_records_its_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("25.json");
        let codec = JsonSnapshotCodec::pretty();
        let live = Outbreak::new(SlotIndex::new(1).unwrap()).with_species(SpeciesId(25), 0);

        dump_to_file(&codec, &live, &path).unwrap();
        let draft = load_from_file(&codec, &live, &path).unwrap();
        assert_eq!(
            draft.source(),
            &DraftSource::Snapshot {
                name: "25.json".to_string()
            }
        );
        assert_eq!(draft.record(), &live);
    }
}
