//! Snapshots for Outbreak Records
//!
//! This layer moves records in and out of the snapshot interchange format
//! and stages speculative edits. It adds:
//! - `SnapshotDocument`: The slotless, serializable form of a record
//! - `JsonSnapshotCodec`: dump/restore between records and JSON bytes
//! - `Draft`: An independent clone of a live record for "what-if" edits
//! - `DefaultsCatalog`: Curated default data keyed by species
//!
//! # Example
//!
//! ```rust
//! use outbreak_core::{Outbreak, SlotIndex, SpeciesId};
//! use outbreak_snapshot::{Draft, JsonSnapshotCodec, SnapshotCodec};
//!
//! let slot = SlotIndex::new(1).unwrap();
//! let live = Outbreak::new(slot).with_species(SpeciesId(25), 0);
//!
//! let codec = JsonSnapshotCodec::default();
//! let bytes = codec.dump(&live).unwrap();
//!
//! let mut draft = Draft::of(&live);
//! draft.record_mut().set_max_spawns(40);
//! draft.restore(&codec, &bytes).unwrap();
//! assert_eq!(draft.record(), &live);
//! ```

pub use bytes::Bytes;

mod codec;
mod defaults;
mod document;
mod draft;
mod file;

pub use codec::{JsonSnapshotCodec, SnapshotCodec};
pub use defaults::{DefaultsCatalog, DirectoryDefaults, InMemoryDefaults};
pub use document::SnapshotDocument;
pub use draft::{Draft, DraftSource};
pub use file::{default_file_name, dump_to_file, load_from_file};

// Re-export core types for convenience
pub use outbreak_core::{Error, Outbreak, SlotIndex, SpeciesId};
