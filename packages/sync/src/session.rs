//! The connection session.

use std::time::Duration;

use outbreak_core::{
    Address, BlockDevice, BlockValue, BlockWriter, CancellationToken, Error, OutbreakStore,
};

use crate::worker::SessionWorker;

/// The live link to a device.
///
/// A session is either connected, holding the executor that performs block
/// writes, or disconnected. Disconnecting drops the executor; there is no
/// way back short of a new `connect`.
pub struct Session {
    executor: Option<Box<dyn BlockDevice>>,
    label: String,
}

impl Session {
    /// A session with no device.
    pub fn disconnected() -> Self {
        Self {
            executor: None,
            label: String::new(),
        }
    }

    /// Connect to `device`, calling it on the current thread.
    pub fn connect(device: impl BlockDevice + 'static, label: impl Into<String>) -> Self {
        let label = label.into();
        tracing::info!(%label, "session connected");
        Self {
            executor: Some(Box::new(device)),
            label,
        }
    }

    /// Connect to `device` through a dedicated session thread.
    ///
    /// With a `write_timeout`, a write that takes longer is cancelled and
    /// reported as failed.
    pub fn spawn(
        device: impl BlockDevice + 'static,
        label: impl Into<String>,
        write_timeout: Option<Duration>,
    ) -> Result<Self, Error> {
        let worker = SessionWorker::spawn(Box::new(device), write_timeout)?;
        Ok(Self::connect(worker, label))
    }

    pub fn is_connected(&self) -> bool {
        self.executor.is_some()
    }

    /// Drop the executor. Calling this on a disconnected session does nothing.
    pub fn disconnect(&mut self) {
        if self.executor.take().is_some() {
            tracing::info!(label = %self.label, "session disconnected");
        }
    }

    /// What the session is connected to, if anything.
    pub fn label(&self) -> Option<&str> {
        self.executor.as_ref().map(|_| self.label.as_str())
    }

    pub fn executor(&mut self) -> Option<&mut Box<dyn BlockDevice>> {
        self.executor.as_mut()
    }

    /// Read all eight records from the device.
    pub fn load_store(&mut self) -> Result<OutbreakStore, Error> {
        match self.executor.as_mut() {
            Some(executor) => OutbreakStore::load(executor),
            None => Err(Error::transport("not connected")),
        }
    }

    /// Issue one compare-and-set with a fresh cancellation token.
    ///
    /// A write whose token ended up cancelled counts as not performed.
    pub(crate) fn write_block(
        &mut self,
        value: &BlockValue,
        address: Address,
        expected: &BlockValue,
    ) -> Result<bool, Error> {
        let executor = self
            .executor
            .as_mut()
            .ok_or_else(|| Error::transport("not connected"))?;
        let token = CancellationToken::new();
        let written = executor.write_block(value, address, &token, expected)?;
        if token.is_cancelled() {
            return Err(Error::Cancelled { address });
        }
        Ok(written)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::disconnected()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("connected", &self.is_connected())
            .field("label", &self.label)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryDevice;
    use outbreak_core::{Outbreak, SlotIndex};

    #[test]
    fn disconnect_is_idempotent() {
        let mut session = Session::connect(MemoryDevice::new(), "memory");
        assert!(session.is_connected());
        assert_eq!(session.label(), Some("memory"));

        session.disconnect();
        session.disconnect();
        assert!(!session.is_connected());
        assert_eq!(session.label(), None);
        assert!(session.executor().is_none());
    }

    #[test]
    fn loads_store_from_device() {
        let store = OutbreakStore::from_records([Outbreak::new(SlotIndex::new(6).unwrap())
            .with_spawns(40, 3)
            .with_flags(true, true)]);
        let mut session = Session::connect(MemoryDevice::from_store(&store), "memory");
        assert_eq!(session.load_store().unwrap(), store);
    }

    #[test]
    fn disconnected_session_cannot_load() {
        assert!(matches!(
            Session::disconnected().load_store(),
            Err(Error::Transport { .. })
        ));
    }

    #[test]
    fn threaded_session_loads_the_same() {
        let store = OutbreakStore::from_records([Outbreak::new(SlotIndex::new(1).unwrap())
            .with_spawns(12, 4)]);
        let mut session =
            Session::spawn(MemoryDevice::from_store(&store), "memory", None).unwrap();
        assert_eq!(session.load_store().unwrap(), store);
    }
}
