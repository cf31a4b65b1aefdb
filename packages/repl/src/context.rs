//! Editor context for the REPL.
//!
//! Owns the record store, the device session and everything a command needs
//! between lines: the selected slot, a pending draft and the map anchor.

use std::sync::Arc;
use std::time::Duration;

use outbreak_core::{
    BlockDevice, IdentitySpeciesTable, OutbreakStore, Outbreak, Point3, SlotIndex, SpeciesTable,
};
use outbreak_snapshot::{DefaultsCatalog, DirectoryDefaults, Draft, JsonSnapshotCodec};
use outbreak_sync::{HttpBlockExecutor, MemoryDevice, Session, SyncEngine};

use crate::config::EditorConfig;

#[derive(thiserror::Error, Debug)]
pub enum ContextError {
    #[error(transparent)]
    Core(#[from] outbreak_core::Error),

    #[error("Device error: {0}")]
    Sync(#[from] outbreak_sync::Error),
}

pub struct EditorContext {
    store: OutbreakStore,
    session: Session,
    species: Arc<dyn SpeciesTable>,
    defaults: Arc<dyn DefaultsCatalog>,
    codec: JsonSnapshotCodec,
    selected: SlotIndex,
    pending: Option<Draft>,
    anchor: Option<Point3>,
    write_timeout: Option<Duration>,
}

impl EditorContext {
    /// An offline context over an empty store.
    pub fn new(species: Arc<dyn SpeciesTable>, defaults: Arc<dyn DefaultsCatalog>) -> Self {
        Self {
            store: OutbreakStore::new(),
            session: Session::disconnected(),
            species,
            defaults,
            codec: JsonSnapshotCodec::pretty(),
            selected: SlotIndex::FIRST,
            pending: None,
            anchor: None,
            write_timeout: None,
        }
    }

    /// Build a context from configuration, connecting if a device is set.
    pub fn from_config(config: &EditorConfig) -> Result<Self, ContextError> {
        let species: Arc<dyn SpeciesTable> = Arc::new(IdentitySpeciesTable::new());
        let defaults: Arc<dyn DefaultsCatalog> = match &config.defaults_dir {
            Some(dir) => Arc::new(DirectoryDefaults::new(dir.clone(), species.clone())?),
            None => Arc::new(()),
        };

        let mut ctx = Self::new(species, defaults).with_write_timeout(config.write_timeout());
        if let Some(device) = &config.device {
            ctx.connect(device)?;
        }
        Ok(ctx)
    }

    pub fn with_write_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.write_timeout = timeout;
        self
    }

    pub fn with_store(mut self, store: OutbreakStore) -> Self {
        self.store = store;
        self.refresh_anchor();
        self
    }

    // === Records ===

    pub fn store(&self) -> &OutbreakStore {
        &self.store
    }

    pub fn selected(&self) -> SlotIndex {
        self.selected
    }

    pub fn selected_record(&self) -> &Outbreak {
        self.store.slot(self.selected)
    }

    pub fn select(&mut self, index: i64) -> Result<(), outbreak_core::Error> {
        self.selected = SlotIndex::new(index)?;
        self.refresh_anchor();
        Ok(())
    }

    /// Move the selection by one slot. Returns false at either end.
    pub fn step(&mut self, forward: bool) -> bool {
        let next = if forward {
            self.selected.next()
        } else {
            self.selected.prev()
        };
        match next {
            Some(slot) => {
                self.selected = slot;
                self.refresh_anchor();
                true
            }
            None => false,
        }
    }

    pub fn species(&self) -> &dyn SpeciesTable {
        &*self.species
    }

    pub fn defaults(&self) -> Arc<dyn DefaultsCatalog> {
        self.defaults.clone()
    }

    pub fn codec(&self) -> &JsonSnapshotCodec {
        &self.codec
    }

    /// An engine over the store and session for one edit.
    pub fn engine(&mut self) -> SyncEngine<'_> {
        SyncEngine::new(&mut self.store, &mut self.session, &*self.species)
    }

    // === Map anchor ===

    /// The map marker for the selected record's center, if one is shown.
    pub fn anchor(&self) -> Option<Point3> {
        self.anchor
    }

    pub fn refresh_anchor(&mut self) {
        self.anchor = self.store.slot(self.selected).location_center();
    }

    pub fn clear_anchor(&mut self) {
        self.anchor = None;
    }

    // === Drafts ===

    pub fn pending(&self) -> Option<&Draft> {
        self.pending.as_ref()
    }

    /// Stage a draft, replacing any earlier one.
    pub fn stage(&mut self, draft: Draft) -> Option<Draft> {
        self.pending.replace(draft)
    }

    pub fn take_pending(&mut self) -> Option<Draft> {
        self.pending.take()
    }

    // === Session ===

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Connect to a bridge URL, or to a simulated device with `memory`.
    ///
    /// The store is reloaded from the device. A simulated device starts as
    /// a mirror of the current store.
    pub fn connect(&mut self, target: &str) -> Result<(), ContextError> {
        if target.eq_ignore_ascii_case("memory") {
            let device = MemoryDevice::from_store(&self.store);
            return self.connect_device(device, "memory");
        }

        let executor = match self.write_timeout {
            Some(timeout) => HttpBlockExecutor::with_timeout(target, timeout)?,
            None => HttpBlockExecutor::new(target)?,
        };
        self.connect_device(executor, target)
    }

    /// Connect to any block device through a session thread.
    pub fn connect_device(
        &mut self,
        device: impl BlockDevice + 'static,
        label: &str,
    ) -> Result<(), ContextError> {
        self.session.disconnect();
        let mut session = Session::spawn(device, label, self.write_timeout)?;
        let store = session.load_store()?;

        self.store = store;
        self.session = session;
        self.refresh_anchor();
        Ok(())
    }

    pub fn disconnect(&mut self) {
        self.session.disconnect();
    }
}
