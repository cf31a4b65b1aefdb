//! A simulated device holding blocks in memory.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use outbreak_core::{
    resolve, resolve_aggregate_enabled_count, Address, BlockReader, BlockValue, BlockWriter,
    CancellationToken, Error, FieldKind, OutbreakStore,
};

/// One write attempt observed by a `MemoryDevice`.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteRecord {
    pub address: Address,
    pub value: BlockValue,
    pub expected: BlockValue,
    /// Whether the compare-and-set held and the block was updated.
    pub applied: bool,
}

#[derive(Debug, Default)]
struct DeviceState {
    blocks: HashMap<Address, BlockValue>,
    writes: Vec<WriteRecord>,
    reject_all: bool,
    fault: Option<String>,
    latency: Option<Duration>,
}

/// An in-memory device performing real compare-and-set writes.
///
/// Clones share state, so a test can keep one handle for inspection while
/// a session owns another. Every write attempt is recorded, including the
/// rejected ones.
#[derive(Clone, Debug, Default)]
pub struct MemoryDevice {
    state: Arc<Mutex<DeviceState>>,
}

impl MemoryDevice {
    /// A device with no blocks.
    pub fn new() -> Self {
        Self::default()
    }

    /// A device mirroring `store`, including the enabled-count block.
    ///
    /// Absent positions have no block.
    pub fn from_store(store: &OutbreakStore) -> Self {
        let device = Self::new();
        {
            let mut state = device.state();
            for record in store.iter() {
                for field in FieldKind::ALL {
                    if let Some(value) = record.field(field) {
                        state.blocks.insert(resolve(record.slot(), field), value);
                    }
                }
            }
            state.blocks.insert(
                resolve_aggregate_enabled_count(),
                BlockValue::U8(store.enabled_count()),
            );
        }
        device
    }

    fn state(&self) -> MutexGuard<'_, DeviceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Overwrite a block, bypassing compare-and-set.
    pub fn set_block(&self, address: Address, value: BlockValue) {
        self.state().blocks.insert(address, value);
    }

    /// Current value of a block.
    pub fn block(&self, address: Address) -> Option<BlockValue> {
        self.state().blocks.get(&address).copied()
    }

    /// Every write attempt so far, in order.
    pub fn writes(&self) -> Vec<WriteRecord> {
        self.state().writes.clone()
    }

    pub fn clear_writes(&self) {
        self.state().writes.clear();
    }

    /// Refuse every write, whatever it expects.
    pub fn reject_all(&self, reject: bool) {
        self.state().reject_all = reject;
    }

    /// Fail every read and write with a transport fault.
    pub fn fail_with(&self, message: impl Into<String>) {
        self.state().fault = Some(message.into());
    }

    /// Delay each write, simulating a slow round trip.
    pub fn with_latency(self, latency: Duration) -> Self {
        self.state().latency = Some(latency);
        self
    }
}

impl BlockReader for MemoryDevice {
    fn read_block(&mut self, address: Address) -> Result<Option<BlockValue>, Error> {
        let state = self.state();
        if let Some(message) = &state.fault {
            return Err(Error::transport(message));
        }
        Ok(state.blocks.get(&address).copied())
    }
}

impl BlockWriter for MemoryDevice {
    fn write_block(
        &mut self,
        value: &BlockValue,
        address: Address,
        cancel: &CancellationToken,
        expected: &BlockValue,
    ) -> Result<bool, Error> {
        let latency = self.state().latency;
        if let Some(latency) = latency {
            std::thread::sleep(latency);
        }

        let mut state = self.state();
        if let Some(message) = &state.fault {
            return Err(Error::transport(message));
        }
        if !value.same_kind(expected) {
            return Err(Error::transport(format!(
                "payload {:?} does not match expected {:?}",
                value, expected
            )));
        }

        let applied = !cancel.is_cancelled()
            && !state.reject_all
            && state.blocks.get(&address) == Some(expected);
        if applied {
            state.blocks.insert(address, *value);
        }

        state.writes.push(WriteRecord {
            address,
            value: *value,
            expected: *expected,
            applied,
        });
        Ok(applied)
    }
}
