//! Staged speculative edits.

use outbreak_core::{Error, FieldKind, Outbreak, SpeciesId};

use crate::codec::SnapshotCodec;
use crate::document::SnapshotDocument;

/// Where a draft's contents came from.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftSource {
    /// Cloned from the live record, possibly edited by hand.
    Live,
    /// Restored from a snapshot file.
    Snapshot { name: String },
    /// Curated default data for a species.
    Defaults { species: SpeciesId },
}

/// An independent copy of a live record.
///
/// A draft is previewed and edited freely; the live record only changes
/// when the draft is committed through the sync engine. The draft keeps
/// the record it was cloned from so the commit can tell which fields
/// actually changed.
#[derive(Debug, Clone)]
pub struct Draft {
    origin: Outbreak,
    record: Outbreak,
    source: DraftSource,
}

impl Draft {
    /// Clone `live` into a new draft.
    pub fn of(live: &Outbreak) -> Self {
        Self {
            origin: live.clone(),
            record: live.clone(),
            source: DraftSource::Live,
        }
    }

    /// Replace the draft contents with a parsed snapshot.
    ///
    /// On error the draft is left as it was.
    pub fn restore(&mut self, codec: &dyn SnapshotCodec, bytes: &[u8]) -> Result<(), Error> {
        let doc = codec.decode(bytes)?;
        self.apply_document(doc);
        Ok(())
    }

    /// Replace the draft contents with a document.
    pub fn apply_document(&mut self, doc: SnapshotDocument) {
        self.record = doc.into_record(self.origin.slot());
    }

    pub fn with_source(mut self, source: DraftSource) -> Self {
        self.source = source;
        self
    }

    pub fn source(&self) -> &DraftSource {
        &self.source
    }

    /// The live record as it was when the draft was taken.
    pub fn origin(&self) -> &Outbreak {
        &self.origin
    }

    pub fn record(&self) -> &Outbreak {
        &self.record
    }

    pub fn record_mut(&mut self) -> &mut Outbreak {
        &mut self.record
    }

    pub fn into_record(self) -> Outbreak {
        self.record
    }

    /// Fields whose value differs from the origin, in block order.
    ///
    /// A position the draft lacks is never reported: an absent anchor
    /// cannot be written to a device.
    pub fn changed_fields(&self) -> Vec<FieldKind> {
        FieldKind::ALL
            .into_iter()
            .filter(|&kind| match self.record.field(kind) {
                Some(value) => self.origin.field(kind) != Some(value),
                None => false,
            })
            .collect()
    }
}
