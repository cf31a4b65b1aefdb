//! The compare-and-set synchronization engine.

use outbreak_core::{
    resolve, resolve_aggregate_enabled_count, Address, Axis, BlockValue, Error, FieldKind,
    OutbreakStore, Point3, PointKind, SlotIndex, SpeciesId, SpeciesTable,
};
use outbreak_snapshot::{DefaultsCatalog, Draft, DraftSource};

use crate::session::Session;

/// Outcome of a species change.
#[derive(Debug)]
pub enum SpeciesChange {
    /// The plain species change was applied.
    Committed,
    /// Curated defaults exist for the new species. Nothing has been applied;
    /// the caller either commits the draft or falls back to `set_species`.
    DefaultOffered(Draft),
}

/// Applies field edits to the store and mirrors them to the session's device.
///
/// Every setter follows the same protocol: capture the current value as
/// `expected`, apply the new value locally, and if the session is connected
/// issue one compare-and-set for the field's block. A write that is refused,
/// faults or is cancelled disconnects the session and returns
/// `RemoteRejected`. The local edit stays applied.
///
/// The engine borrows the store and the session for the duration of an
/// edit, so only one write is ever in flight.
pub struct SyncEngine<'a> {
    store: &'a mut OutbreakStore,
    session: &'a mut Session,
    species: &'a dyn SpeciesTable,
}

impl<'a> SyncEngine<'a> {
    pub fn new(
        store: &'a mut OutbreakStore,
        session: &'a mut Session,
        species: &'a dyn SpeciesTable,
    ) -> Self {
        Self {
            store,
            session,
            species,
        }
    }

    pub fn store(&self) -> &OutbreakStore {
        self.store
    }

    pub fn session(&self) -> &Session {
        self.session
    }

    // === Field setters ===

    /// Change the species, resetting a non-zero form to 0.
    pub fn set_species(&mut self, slot: SlotIndex, species: SpeciesId) -> Result<(), Error> {
        let old_form = self.store.slot(slot).form();
        self.write_field(slot, FieldKind::Species, BlockValue::U16(species.0))?;
        if old_form != 0 {
            self.write_field(slot, FieldKind::Form, BlockValue::U8(0))?;
        }
        Ok(())
    }

    /// Set the form after checking it against the species' form table.
    pub fn set_form(&mut self, slot: SlotIndex, form: u8) -> Result<(), Error> {
        let species = self.store.slot(slot).species();
        self.species.validate_form(species, form)?;
        self.write_field(slot, FieldKind::Form, BlockValue::U8(form))
    }

    /// Set the capacity. Anything below 1 is refused before any change.
    pub fn set_max_spawns(&mut self, slot: SlotIndex, max_spawns: i32) -> Result<(), Error> {
        check_max_spawns(max_spawns)?;
        self.write_field(slot, FieldKind::MaxSpawns, BlockValue::I32(max_spawns))
    }

    /// Set the defeated count. Negative input is written as 0.
    pub fn set_num_defeated(&mut self, slot: SlotIndex, num_defeated: i32) -> Result<(), Error> {
        self.write_field(
            slot,
            FieldKind::NumDefeated,
            BlockValue::I32(num_defeated.max(0)),
        )
    }

    pub fn set_found(&mut self, slot: SlotIndex, found: bool) -> Result<(), Error> {
        self.write_field(slot, FieldKind::Found, BlockValue::Bool(found))
    }

    /// Toggle a slot, then update the aggregate enabled count.
    ///
    /// These are two separate compare-and-set writes. The aggregate write
    /// expects the count before the toggle and writes the count after it.
    /// Setting the flag it already holds writes nothing.
    pub fn set_enabled(&mut self, slot: SlotIndex, enabled: bool) -> Result<(), Error> {
        if self.store.slot(slot).enabled() == enabled {
            return Ok(());
        }
        let before = self.store.enabled_count();
        self.write_field(slot, FieldKind::Enabled, BlockValue::Bool(enabled))?;
        let after = self.store.enabled_count();
        self.push(
            resolve_aggregate_enabled_count(),
            BlockValue::U8(after),
            BlockValue::U8(before),
        )
    }

    /// Edit one axis of a position from text.
    ///
    /// Text that is not a finite number is rejected before anything changes.
    /// The write covers the whole point, expecting the whole previous point.
    /// A record without that anchor has nothing to edit and is left alone.
    pub fn set_coordinate(
        &mut self,
        slot: SlotIndex,
        kind: PointKind,
        axis: Axis,
        text: &str,
    ) -> Result<(), Error> {
        let value = kind.parse_coordinate(axis, text)?;
        match self.store.slot(slot).point(kind) {
            Some(point) => self.set_point(slot, kind, point.with_axis(axis, value)),
            None => {
                tracing::debug!(%slot, point = %kind, "no anchor to edit");
                Ok(())
            }
        }
    }

    /// Replace a whole position.
    ///
    /// A record without that anchor is left alone: the device holds no point
    /// to compare against, so adding one locally would leave the two apart.
    pub fn set_point(
        &mut self,
        slot: SlotIndex,
        kind: PointKind,
        point: Point3,
    ) -> Result<(), Error> {
        if self.store.slot(slot).point(kind).is_none() {
            tracing::debug!(%slot, point = %kind, "no anchor to replace");
            return Ok(());
        }
        self.write_field(slot, position_field(kind), BlockValue::Point(point))
    }

    // === Species defaults ===

    /// Change the species, offering curated defaults when they exist.
    ///
    /// With no default the plain species change is applied at once. When a
    /// default exists nothing is applied: the offer comes back as a draft
    /// built on a clone of the live record.
    pub fn change_species(
        &mut self,
        slot: SlotIndex,
        species: SpeciesId,
        catalog: &dyn DefaultsCatalog,
    ) -> Result<SpeciesChange, Error> {
        if catalog.has_default(species) {
            if let Some(doc) = catalog.get_default(species)? {
                tracing::debug!(%slot, %species, "offering curated defaults");
                let mut draft = Draft::of(self.store.slot(slot))
                    .with_source(DraftSource::Defaults { species });
                draft.apply_document(doc);
                draft.record_mut().set_species(species);
                return Ok(SpeciesChange::DefaultOffered(draft));
            }
        }

        self.set_species(slot, species)?;
        Ok(SpeciesChange::Committed)
    }

    // === Drafts ===

    /// Commit a draft into its slot, one compare-and-set per changed field.
    ///
    /// Fields are compared against the live record, not the draft's origin,
    /// and written in block order. A position is only written when both the
    /// draft and the live record have that anchor. After a rejection the
    /// remaining fields are still applied locally and the first error is
    /// returned.
    pub fn commit(&mut self, draft: &Draft) -> Result<(), Error> {
        let staged = draft.record();
        let slot = draft.origin().slot();
        self.species.validate_form(staged.species(), staged.form())?;
        check_max_spawns(staged.max_spawns())?;

        let changed: Vec<(FieldKind, BlockValue)> = FieldKind::ALL
            .into_iter()
            .filter_map(|field| {
                let value = staged.field(field)?;
                let live = self.store.slot(slot).field(field);
                if field.is_position() && live.is_none() {
                    tracing::debug!(%slot, %field, "no live anchor, keeping it unset");
                    return None;
                }
                (live != Some(value)).then_some((field, value))
            })
            .collect();
        tracing::debug!(
            %slot,
            fields = changed.len(),
            source = ?draft.source(),
            "committing draft"
        );

        let mut first_error = None;
        for (field, value) in changed {
            let result = match (field, value) {
                (FieldKind::Enabled, BlockValue::Bool(enabled)) => self.set_enabled(slot, enabled),
                _ => self.write_field(slot, field, value),
            };
            if let Err(e) = result {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    // === Protocol ===

    fn write_field(
        &mut self,
        slot: SlotIndex,
        field: FieldKind,
        value: BlockValue,
    ) -> Result<(), Error> {
        let record = self.store.slot_mut(slot);
        let expected = record.field(field);
        record.set_field(field, value)?;

        match expected {
            Some(expected) => self.push(resolve(slot, field), value, expected),
            None => {
                tracing::debug!(%slot, %field, "no previous value, skipping device write");
                Ok(())
            }
        }
    }

    fn push(
        &mut self,
        address: Address,
        value: BlockValue,
        expected: BlockValue,
    ) -> Result<(), Error> {
        if !self.session.is_connected() {
            return Ok(());
        }

        tracing::debug!(%address, %value, %expected, "compare-and-set");
        let reason = match self.session.write_block(&value, address, &expected) {
            Ok(true) => return Ok(()),
            Ok(false) => "device did not confirm the expected value".to_string(),
            Err(e) => e.to_string(),
        };

        tracing::warn!(%address, %reason, "write rejected, disconnecting");
        self.session.disconnect();
        Err(Error::RemoteRejected { address, reason })
    }
}

fn check_max_spawns(max_spawns: i32) -> Result<(), Error> {
    if max_spawns < 1 {
        return Err(Error::InvalidValue {
            field: FieldKind::MaxSpawns,
            value: i64::from(max_spawns),
            expected: "at least 1",
        });
    }
    Ok(())
}

fn position_field(kind: PointKind) -> FieldKind {
    match kind {
        PointKind::Center => FieldKind::CenterPosition,
        PointKind::Dummy => FieldKind::DummyPosition,
    }
}
