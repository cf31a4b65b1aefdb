//! The fixed set of eight outbreak records.

use crate::{resolve, BlockReader, Error, FieldKind, Outbreak, SlotIndex, SLOT_COUNT};

/// Holds the eight outbreak records, indexed 1..=8.
///
/// The store is pure data. Field edits that must reach a device go through
/// `outbreak_sync::SyncEngine`, which read-modify-writes one field at a
/// time via `slot_mut`.
#[derive(Clone, Debug, PartialEq)]
pub struct OutbreakStore {
    slots: Vec<Outbreak>,
}

impl OutbreakStore {
    /// A store of eight empty records.
    pub fn new() -> Self {
        Self {
            slots: SlotIndex::all().map(Outbreak::new).collect(),
        }
    }

    /// Build a store from records, each placed at its own slot.
    ///
    /// Slots without a record stay empty. A later record for the same slot
    /// wins.
    pub fn from_records(records: impl IntoIterator<Item = Outbreak>) -> Self {
        let mut store = Self::new();
        for record in records {
            let position = record.slot().position();
            store.slots[position] = record;
        }
        store
    }

    /// Build all eight records from the device's current blocks.
    ///
    /// Blocks the device does not have keep the empty-record default; an
    /// absent position block leaves that anchor unset.
    pub fn load(reader: &mut dyn BlockReader) -> Result<Self, Error> {
        let mut store = Self::new();
        for slot in SlotIndex::all() {
            let record = &mut store.slots[slot.position()];
            for field in FieldKind::ALL {
                match reader.read_block(resolve(slot, field))? {
                    Some(value) => record.set_field(field, value)?,
                    None => tracing::debug!(%slot, %field, "block not present on device"),
                }
            }
        }
        tracing::debug!(enabled = store.enabled_count(), "loaded outbreaks from device");
        Ok(store)
    }

    /// Get the record at a raw slot number.
    pub fn get(&self, index: i64) -> Result<&Outbreak, Error> {
        Ok(self.slot(SlotIndex::new(index)?))
    }

    /// Get the record at a validated slot.
    pub fn slot(&self, slot: SlotIndex) -> &Outbreak {
        &self.slots[slot.position()]
    }

    /// Mutable access for single-field edits.
    pub fn slot_mut(&mut self, slot: SlotIndex) -> &mut Outbreak {
        &mut self.slots[slot.position()]
    }

    /// Overwrite a slot wholesale, returning the previous record.
    ///
    /// The replacement keeps its field values but takes the target slot's
    /// identity.
    pub fn replace(&mut self, index: i64, record: Outbreak) -> Result<Outbreak, Error> {
        let slot = SlotIndex::new(index)?;
        let record = record.relocate(slot);
        Ok(std::mem::replace(&mut self.slots[slot.position()], record))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Outbreak> {
        self.slots.iter()
    }

    /// Number of records whose `enabled` flag is set.
    pub fn enabled_count(&self) -> u8 {
        self.slots.iter().filter(|r| r.enabled()).count() as u8
    }

    pub fn len(&self) -> usize {
        SLOT_COUNT
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for OutbreakStore {
    fn default() -> Self {
        Self::new()
    }
}
