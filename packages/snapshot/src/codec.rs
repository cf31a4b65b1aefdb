//! Snapshot codec implementation.

use bytes::Bytes;
use outbreak_core::{Error, Outbreak, SlotIndex};

use crate::document::SnapshotDocument;

/// Converts records to and from snapshot bytes.
///
/// Restoring never touches a live record: it always produces a new one,
/// so a failed restore leaves existing state unchanged.
pub trait SnapshotCodec: Send + Sync {
    /// Serialize a record's fields.
    fn dump(&self, record: &Outbreak) -> Result<Bytes, Error>;

    /// Parse a slotless document.
    fn decode(&self, bytes: &[u8]) -> Result<SnapshotDocument, Error>;

    /// File extension used for snapshot files, without the dot.
    fn extension(&self) -> &'static str;

    /// Parse bytes into the record for `slot`.
    fn restore(&self, slot: SlotIndex, bytes: &[u8]) -> Result<Outbreak, Error> {
        Ok(self.decode(bytes)?.into_record(slot))
    }
}

/// A codec that handles the JSON snapshot format.
///
/// # Example
///
/// ```rust
/// use outbreak_core::{Outbreak, SlotIndex};
/// use outbreak_snapshot::{JsonSnapshotCodec, SnapshotCodec};
///
/// let slot = SlotIndex::new(2).unwrap();
/// let record = Outbreak::new(slot).with_spawns(10, 3);
///
/// let codec = JsonSnapshotCodec::default();
/// let bytes = codec.dump(&record).unwrap();
/// assert_eq!(codec.restore(slot, &bytes).unwrap(), record);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSnapshotCodec {
    pretty: bool,
}

impl JsonSnapshotCodec {
    /// A codec that writes indented JSON, for files people edit by hand.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl SnapshotCodec for JsonSnapshotCodec {
    fn dump(&self, record: &Outbreak) -> Result<Bytes, Error> {
        let doc = SnapshotDocument::from_record(record);
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(&doc)
        } else {
            serde_json::to_vec(&doc)
        }
        .map_err(Error::malformed)?;

        Ok(Bytes::from(bytes))
    }

    fn decode(&self, bytes: &[u8]) -> Result<SnapshotDocument, Error> {
        let de = &mut serde_json::Deserializer::from_slice(bytes);
        let doc: SnapshotDocument = serde_path_to_error::deserialize(de).map_err(|e| {
            let path = e.path().to_string();
            let inner = e.into_inner();
            if path == "." {
                Error::malformed(inner)
            } else {
                Error::malformed(format!("{}: {}", path, inner))
            }
        })?;

        doc.validate()?;
        Ok(doc)
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}
