//! Slot index type.

use std::fmt;

use crate::Error;

/// Number of outbreak slots held by a store.
pub const SLOT_COUNT: usize = 8;

/// A validated 1-based slot index.
///
/// Slot identity is fixed for the lifetime of a record and drives address
/// resolution, so an out-of-range index can never reach the resolver.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct SlotIndex(u8);

impl SlotIndex {
    pub const FIRST: SlotIndex = SlotIndex(1);

    /// Validate a raw slot number.
    pub fn new(index: i64) -> Result<Self, Error> {
        if (1..=SLOT_COUNT as i64).contains(&index) {
            Ok(SlotIndex(index as u8))
        } else {
            Err(Error::OutOfRange { index })
        }
    }

    /// The 1-based slot number.
    pub fn get(self) -> u8 {
        self.0
    }

    /// The 0-based position in slot order.
    pub fn position(self) -> usize {
        usize::from(self.0) - 1
    }

    /// All slots in order, 1 through 8.
    pub fn all() -> impl Iterator<Item = SlotIndex> {
        (1..=SLOT_COUNT as u8).map(SlotIndex)
    }

    /// The following slot, if any.
    pub fn next(self) -> Option<SlotIndex> {
        SlotIndex::new(i64::from(self.0) + 1).ok()
    }

    /// The preceding slot, if any.
    pub fn prev(self) -> Option<SlotIndex> {
        SlotIndex::new(i64::from(self.0) - 1).ok()
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_one_through_eight() {
        for i in 1..=8 {
            assert_eq!(SlotIndex::new(i).unwrap().get() as i64, i);
        }
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(matches!(
            SlotIndex::new(0),
            Err(Error::OutOfRange { index: 0 })
        ));
        assert!(matches!(
            SlotIndex::new(9),
            Err(Error::OutOfRange { index: 9 })
        ));
        assert!(SlotIndex::new(-1).is_err());
    }

    #[test]
    fn navigation_stops_at_edges() {
        let first = SlotIndex::new(1).unwrap();
        let last = SlotIndex::new(8).unwrap();
        assert_eq!(first.prev(), None);
        assert_eq!(last.next(), None);
        assert_eq!(first.next().map(SlotIndex::get), Some(2));
        assert_eq!(last.position(), 7);
    }

    #[test]
    fn all_yields_eight_in_order() {
        let slots: Vec<u8> = SlotIndex::all().map(SlotIndex::get).collect();
        assert_eq!(slots, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }
}
