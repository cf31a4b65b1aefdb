//! Outbreak Core: Record and Address Layer
//!
//! This layer holds the editable outbreak records and the scheme that maps
//! each record field onto a block of device memory:
//! - `SlotIndex`: Validated 1-based slot identity (1..=8)
//! - `Outbreak`: One record (species, form, counters, flags, two points)
//! - `OutbreakStore`: The fixed set of eight records
//! - `FieldKind` / `Address`: Field identifiers and the blocks they live in
//! - `BlockReader` / `BlockWriter`: The read/write-block primitive of a device
//!
//! Nothing in this layer performs I/O on its own. Synchronization with a
//! live device lives in `outbreak-sync`.
//!
//! # Example
//!
//! ```rust
//! use outbreak_core::{resolve, FieldKind, OutbreakStore, SlotIndex};
//!
//! let store = OutbreakStore::new();
//! let slot = SlotIndex::new(3).unwrap();
//! let record = store.get(3).unwrap();
//! assert_eq!(record.slot(), slot);
//!
//! let address = resolve(slot, FieldKind::MaxSpawns);
//! assert_eq!(address.to_string(), "outbreak/3/max_spawns");
//! ```

mod address;
mod block;
mod cancel;
mod error;
mod field;
mod point;
mod record;
mod slot;
mod species;
mod store;
mod traits;

pub use address::{resolve, resolve_aggregate_enabled_count, resolve_named, Address};
pub use block::BlockValue;
pub use cancel::CancellationToken;
pub use error::Error;
pub use field::FieldKind;
pub use point::{Axis, Point3, PointKind};
pub use record::{Outbreak, OutbreakView};
pub use slot::{SlotIndex, SLOT_COUNT};
pub use species::{IdentitySpeciesTable, SpeciesId, SpeciesTable};
pub use store::OutbreakStore;
pub use traits::{BlockDevice, BlockReader, BlockWriter};
