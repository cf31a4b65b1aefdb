//! Outbreak Sync: keeping records consistent with a live device.
//!
//! Every field edit is applied locally first, then mirrored to the device
//! with a compare-and-set write that expects the value the editor last saw.
//! A refused or failed write ends the session; the local edit is kept.
//!
//! - `SyncEngine`: the per-field write protocol, species defaults, draft commits
//! - `Session`: the connection and its executor
//! - `SessionWorker`: runs an executor on a dedicated thread
//! - `MemoryDevice`: simulated device with inspectable state
//! - `HttpBlockExecutor`: device bridge over HTTP
//!
//! # Example
//!
//! ```rust
//! use outbreak_core::{IdentitySpeciesTable, OutbreakStore, SlotIndex};
//! use outbreak_sync::{MemoryDevice, Session, SyncEngine};
//!
//! let mut store = OutbreakStore::new();
//! let device = MemoryDevice::from_store(&store);
//! let mut session = Session::connect(device.clone(), "memory");
//! let table = IdentitySpeciesTable::new();
//!
//! let slot = SlotIndex::new(1).unwrap();
//! SyncEngine::new(&mut store, &mut session, &table)
//!     .set_max_spawns(slot, 7)
//!     .unwrap();
//!
//! assert!(session.is_connected());
//! assert_eq!(device.writes().len(), 1);
//! ```

mod device;
mod engine;
mod error;
mod executor;
mod session;
mod worker;

pub use device::{MemoryDevice, WriteRecord};
pub use engine::{SpeciesChange, SyncEngine};
pub use error::Error;
pub use executor::HttpBlockExecutor;
pub use session::Session;
pub use worker::SessionWorker;
