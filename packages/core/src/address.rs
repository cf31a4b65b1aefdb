//! Block addresses and the field-to-address resolver.

use std::fmt;

use crate::{Error, FieldKind, SlotIndex, SLOT_COUNT};

/// Identifier of one device memory block.
///
/// The set is closed: one block per (slot, field kind) pair plus a single
/// aggregate block counting the enabled outbreaks.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Address {
    /// Per-slot field block.
    Field { slot: SlotIndex, field: FieldKind },
    /// Number of enabled outbreaks across the whole store.
    EnabledCount,
}

impl Address {
    /// Total number of addresses.
    pub const COUNT: usize = SLOT_COUNT * FieldKind::ALL.len() + 1;

    /// Dense index in `0..Address::COUNT`, slot-major.
    pub fn index(self) -> usize {
        match self {
            Address::Field { slot, field } => {
                slot.position() * FieldKind::ALL.len() + field_offset(field)
            }
            Address::EnabledCount => Self::COUNT - 1,
        }
    }

    /// Every address in index order.
    pub fn all() -> impl Iterator<Item = Address> {
        SlotIndex::all()
            .flat_map(|slot| FieldKind::ALL.into_iter().map(move |field| resolve(slot, field)))
            .chain(std::iter::once(Address::EnabledCount))
    }

    /// Slot this block belongs to, if it is per-slot.
    pub fn slot(self) -> Option<SlotIndex> {
        match self {
            Address::Field { slot, .. } => Some(slot),
            Address::EnabledCount => None,
        }
    }

    /// Field this block holds, if it is per-slot.
    pub fn field(self) -> Option<FieldKind> {
        match self {
            Address::Field { field, .. } => Some(field),
            Address::EnabledCount => None,
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Field { slot, field } => write!(f, "outbreak/{}/{}", slot, field),
            Address::EnabledCount => f.write_str("outbreak/enabled_count"),
        }
    }
}

fn field_offset(field: FieldKind) -> usize {
    match field {
        FieldKind::Species => 0,
        FieldKind::Form => 1,
        FieldKind::MaxSpawns => 2,
        FieldKind::NumDefeated => 3,
        FieldKind::Enabled => 4,
        FieldKind::Found => 5,
        FieldKind::CenterPosition => 6,
        FieldKind::DummyPosition => 7,
    }
}

/// Resolve the block holding `field` of the record in `slot`.
pub fn resolve(slot: SlotIndex, field: FieldKind) -> Address {
    Address::Field { slot, field }
}

/// Resolve the aggregate enabled-count block.
pub fn resolve_aggregate_enabled_count() -> Address {
    Address::EnabledCount
}

/// Resolve from unvalidated input, as typed by a user or read from a file.
pub fn resolve_named(slot: i64, field: &str) -> Result<Address, Error> {
    let slot = SlotIndex::new(slot)?;
    let field = field.parse::<FieldKind>()?;
    Ok(resolve(slot, field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_pair_resolves_to_a_distinct_address() {
        let mut seen = HashSet::new();
        for slot in SlotIndex::all() {
            for field in FieldKind::ALL {
                assert!(seen.insert(resolve(slot, field)));
            }
        }
        assert!(seen.insert(resolve_aggregate_enabled_count()));
        assert_eq!(seen.len(), Address::COUNT);
        assert_eq!(Address::COUNT, 65);
    }

    #[test]
    fn resolution_is_deterministic() {
        for slot in SlotIndex::all() {
            for field in FieldKind::ALL {
                assert_eq!(resolve(slot, field), resolve(slot, field));
                assert_eq!(resolve(slot, field).index(), resolve(slot, field).index());
            }
        }
    }

    #[test]
    fn dense_indices_cover_the_range() {
        let indices: Vec<usize> = Address::all().map(Address::index).collect();
        assert_eq!(indices, (0..Address::COUNT).collect::<Vec<_>>());
    }

    #[test]
    fn address_decodes_its_parts() {
        let slot = SlotIndex::new(5).unwrap();
        let address = resolve(slot, FieldKind::DummyPosition);
        assert_eq!(address.slot(), Some(slot));
        assert_eq!(address.field(), Some(FieldKind::DummyPosition));
        assert_eq!(Address::EnabledCount.slot(), None);
    }

    #[test]
    fn display_paths() {
        let slot = SlotIndex::new(1).unwrap();
        assert_eq!(
            resolve(slot, FieldKind::Species).to_string(),
            "outbreak/1/species"
        );
        assert_eq!(
            resolve_aggregate_enabled_count().to_string(),
            "outbreak/enabled_count"
        );
    }

    #[test]
    fn resolve_named_reports_bad_input() {
        assert!(matches!(
            resolve_named(0, "species"),
            Err(Error::OutOfRange { index: 0 })
        ));
        assert!(matches!(
            resolve_named(1, "TotalSpawns"),
            Err(Error::UnknownField { .. })
        ));
        assert_eq!(
            resolve_named(8, "found").unwrap(),
            resolve(SlotIndex::new(8).unwrap(), FieldKind::Found)
        );
    }
}
