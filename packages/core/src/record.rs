//! The outbreak record.

use crate::{BlockValue, Error, FieldKind, Point3, PointKind, SlotIndex, SpeciesId};

/// One editable outbreak event.
///
/// `Clone` produces a fully independent copy: a record owns all of its
/// data, so edits to a clone never reach the original. Clones are how
/// speculative edits are staged before they are committed.
#[derive(Clone, Debug, PartialEq)]
pub struct Outbreak {
    slot: SlotIndex,
    species: SpeciesId,
    form: u8,
    max_spawns: i32,
    num_defeated: i32,
    enabled: bool,
    found: bool,
    location_center: Option<Point3>,
    location_dummy: Option<Point3>,
}

/// Derived values presented to an editor for one record.
#[derive(Clone, Debug, PartialEq)]
pub struct OutbreakView {
    pub slot: SlotIndex,
    pub species: SpeciesId,
    pub form: u8,
    /// Capacity, shown as at least 1.
    pub max_spawns: i32,
    /// Defeated count, shown as 0 once the outbreak is exhausted.
    pub num_defeated: i32,
    pub enabled: bool,
    pub found: bool,
    pub center: Option<Point3>,
    pub dummy: Option<Point3>,
}

impl Outbreak {
    /// An empty record for `slot`: no species, one spawn, disabled, no anchors.
    pub fn new(slot: SlotIndex) -> Self {
        Self {
            slot,
            species: SpeciesId::default(),
            form: 0,
            max_spawns: 1,
            num_defeated: 0,
            enabled: false,
            found: false,
            location_center: None,
            location_dummy: None,
        }
    }

    // === Builders ===

    pub fn with_species(mut self, species: SpeciesId, form: u8) -> Self {
        self.species = species;
        self.form = form;
        self
    }

    pub fn with_spawns(mut self, max_spawns: i32, num_defeated: i32) -> Self {
        self.max_spawns = max_spawns;
        self.num_defeated = num_defeated.max(0);
        self
    }

    pub fn with_flags(mut self, enabled: bool, found: bool) -> Self {
        self.enabled = enabled;
        self.found = found;
        self
    }

    pub fn with_points(mut self, center: Option<Point3>, dummy: Option<Point3>) -> Self {
        self.location_center = center;
        self.location_dummy = dummy;
        self
    }

    /// The same field values owned by another slot.
    pub fn relocate(mut self, slot: SlotIndex) -> Self {
        self.slot = slot;
        self
    }

    // === Accessors ===

    pub fn slot(&self) -> SlotIndex {
        self.slot
    }

    pub fn species(&self) -> SpeciesId {
        self.species
    }

    pub fn form(&self) -> u8 {
        self.form
    }

    pub fn max_spawns(&self) -> i32 {
        self.max_spawns
    }

    pub fn num_defeated(&self) -> i32 {
        self.num_defeated
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn found(&self) -> bool {
        self.found
    }

    pub fn location_center(&self) -> Option<Point3> {
        self.location_center
    }

    pub fn location_dummy(&self) -> Option<Point3> {
        self.location_dummy
    }

    pub fn point(&self, kind: PointKind) -> Option<Point3> {
        match kind {
            PointKind::Center => self.location_center,
            PointKind::Dummy => self.location_dummy,
        }
    }

    /// Whether every spawn has been defeated.
    pub fn is_exhausted(&self) -> bool {
        self.num_defeated >= self.max_spawns
    }

    pub fn view(&self) -> OutbreakView {
        OutbreakView {
            slot: self.slot,
            species: self.species,
            form: self.form,
            max_spawns: self.max_spawns.max(1),
            num_defeated: if self.is_exhausted() {
                0
            } else {
                self.num_defeated
            },
            enabled: self.enabled,
            found: self.found,
            center: self.location_center,
            dummy: self.location_dummy,
        }
    }

    // === Mutation ===

    pub fn set_species(&mut self, species: SpeciesId) {
        self.species = species;
    }

    pub fn set_form(&mut self, form: u8) {
        self.form = form;
    }

    pub fn set_max_spawns(&mut self, max_spawns: i32) {
        self.max_spawns = max_spawns;
    }

    /// Set the defeated count. Negative input is stored as 0.
    pub fn set_num_defeated(&mut self, num_defeated: i32) {
        self.num_defeated = num_defeated.max(0);
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn set_found(&mut self, found: bool) {
        self.found = found;
    }

    pub fn set_point(&mut self, kind: PointKind, point: Option<Point3>) {
        match kind {
            PointKind::Center => self.location_center = point,
            PointKind::Dummy => self.location_dummy = point,
        }
    }

    // === Block mapping ===

    /// The block payload this record holds for `field`.
    ///
    /// Returns `None` only for an absent position.
    pub fn field(&self, field: FieldKind) -> Option<BlockValue> {
        let value = match field {
            FieldKind::Species => BlockValue::U16(self.species.0),
            FieldKind::Form => BlockValue::U8(self.form),
            FieldKind::MaxSpawns => BlockValue::I32(self.max_spawns),
            FieldKind::NumDefeated => BlockValue::I32(self.num_defeated),
            FieldKind::Enabled => BlockValue::Bool(self.enabled),
            FieldKind::Found => BlockValue::Bool(self.found),
            FieldKind::CenterPosition => BlockValue::Point(self.location_center?),
            FieldKind::DummyPosition => BlockValue::Point(self.location_dummy?),
        };
        Some(value)
    }

    /// Store a block payload into `field`.
    ///
    /// Fails with a transport error when the payload type does not match
    /// the field, since such a value can only come from a misbehaving device.
    pub fn set_field(&mut self, field: FieldKind, value: BlockValue) -> Result<(), Error> {
        let mismatch = || Error::transport(format!("unexpected payload {:?} for {}", value, field));
        match field {
            FieldKind::Species => self.species = SpeciesId(value.as_u16().ok_or_else(mismatch)?),
            FieldKind::Form => self.form = value.as_u8().ok_or_else(mismatch)?,
            FieldKind::MaxSpawns => self.max_spawns = value.as_i32().ok_or_else(mismatch)?,
            FieldKind::NumDefeated => {
                self.set_num_defeated(value.as_i32().ok_or_else(mismatch)?)
            }
            FieldKind::Enabled => self.enabled = value.as_bool().ok_or_else(mismatch)?,
            FieldKind::Found => self.found = value.as_bool().ok_or_else(mismatch)?,
            FieldKind::CenterPosition => {
                self.location_center = Some(value.as_point().ok_or_else(mismatch)?)
            }
            FieldKind::DummyPosition => {
                self.location_dummy = Some(value.as_point().ok_or_else(mismatch)?)
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(n: i64) -> SlotIndex {
        SlotIndex::new(n).unwrap()
    }

    #[test]
    fn exhausted_outbreak_shows_zero_defeated() {
        let record = Outbreak::new(slot(1)).with_spawns(5, 5);
        assert!(record.is_exhausted());
        assert_eq!(record.view().num_defeated, 0);
        assert_eq!(record.num_defeated(), 5);

        let record = Outbreak::new(slot(1)).with_spawns(5, 9);
        assert_eq!(record.view().num_defeated, 0);
        assert_eq!(record.num_defeated(), 9);
    }

    #[test]
    fn partial_outbreak_shows_real_count() {
        let record = Outbreak::new(slot(2)).with_spawns(10, 3);
        assert!(!record.is_exhausted());
        assert_eq!(record.view().num_defeated, 3);
    }

    #[test]
    fn view_shows_at_least_one_spawn() {
        let record = Outbreak::new(slot(3)).with_spawns(0, 0);
        assert_eq!(record.view().max_spawns, 1);
        assert_eq!(record.max_spawns(), 0);
    }

    #[test]
    fn negative_defeated_is_stored_as_zero() {
        let mut record = Outbreak::new(slot(1));
        record.set_num_defeated(-4);
        assert_eq!(record.num_defeated(), 0);
    }

    #[test]
    fn clone_is_independent() {
        let original = Outbreak::new(slot(4))
            .with_species(SpeciesId(25), 0)
            .with_points(Some(Point3::new(1.0, 2.0, 3.0)), None);
        let mut clone = original.clone();

        clone.set_species(SpeciesId(133));
        clone.set_point(PointKind::Center, Some(Point3::new(9.0, 9.0, 9.0)));
        clone.set_found(true);

        assert_eq!(original.species(), SpeciesId(25));
        assert_eq!(original.location_center(), Some(Point3::new(1.0, 2.0, 3.0)));
        assert!(!original.found());
    }

    #[test]
    fn field_reads_absent_points_as_none() {
        let record = Outbreak::new(slot(1));
        assert_eq!(record.field(FieldKind::CenterPosition), None);
        assert_eq!(
            record.field(FieldKind::MaxSpawns),
            Some(BlockValue::I32(1))
        );
    }

    #[test]
    fn set_field_round_trips_every_kind() {
        let source = Outbreak::new(slot(6))
            .with_species(SpeciesId(1000), 2)
            .with_spawns(60, 12)
            .with_flags(true, true)
            .with_points(
                Some(Point3::new(1.0, 2.0, 3.0)),
                Some(Point3::new(-1.0, -2.0, -3.0)),
            );

        let mut target = Outbreak::new(slot(6));
        for kind in FieldKind::ALL {
            target.set_field(kind, source.field(kind).unwrap()).unwrap();
        }
        assert_eq!(target, source);
    }

    #[test]
    fn set_field_rejects_wrong_payload() {
        let mut record = Outbreak::new(slot(1));
        let err = record
            .set_field(FieldKind::Form, BlockValue::Bool(true))
            .unwrap_err();
        assert!(matches!(err, Error::Transport { .. }));
        assert_eq!(record.form(), 0);
    }
}
