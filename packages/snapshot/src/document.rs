//! The snapshot document shape.

use serde::{Deserialize, Serialize};

use outbreak_core::{Error, Outbreak, Point3, SlotIndex, SpeciesId};

/// A record's fields without its slot identity.
///
/// This is what a snapshot file holds. Every scalar field is required; the
/// two positions are optional and omitted when the record has no anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDocument {
    pub species: u16,
    pub form: u8,
    pub max_spawns: i32,
    pub num_defeated: i32,
    pub enabled: bool,
    pub found: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_position: Option<Point3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dummy_position: Option<Point3>,
}

impl SnapshotDocument {
    pub fn from_record(record: &Outbreak) -> Self {
        Self {
            species: record.species().0,
            form: record.form(),
            max_spawns: record.max_spawns(),
            num_defeated: record.num_defeated(),
            enabled: record.enabled(),
            found: record.found(),
            center_position: record.location_center(),
            dummy_position: record.location_dummy(),
        }
    }

    /// Check value ranges serde cannot express.
    pub fn validate(&self) -> Result<(), Error> {
        if self.max_spawns < 1 {
            return Err(Error::malformed(format!(
                "maxSpawns must be at least 1 (got {})",
                self.max_spawns
            )));
        }
        if self.num_defeated < 0 {
            return Err(Error::malformed(format!(
                "numDefeated must not be negative (got {})",
                self.num_defeated
            )));
        }
        for (name, point) in [
            ("centerPosition", self.center_position),
            ("dummyPosition", self.dummy_position),
        ] {
            if let Some(p) = point {
                if !p.coordinates().iter().all(|c| c.is_finite()) {
                    return Err(Error::malformed(format!("{} has a non-finite coordinate", name)));
                }
            }
        }
        Ok(())
    }

    /// Materialize the document as the record for `slot`.
    pub fn into_record(self, slot: SlotIndex) -> Outbreak {
        Outbreak::new(slot)
            .with_species(SpeciesId(self.species), self.form)
            .with_spawns(self.max_spawns, self.num_defeated)
            .with_flags(self.enabled, self.found)
            .with_points(self.center_position, self.dummy_position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_round_trip() {
        let slot = SlotIndex::new(4).unwrap();
        let record = Outbreak::new(slot)
            .with_species(SpeciesId(1000), 1)
            .with_spawns(70, 8)
            .with_flags(true, false)
            .with_points(Some(Point3::new(1.0, 2.0, 3.0)), None);

        let doc = SnapshotDocument::from_record(&record);
        assert_eq!(doc.clone().into_record(slot), record);
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn negative_defeated_is_malformed() {
        let mut doc = SnapshotDocument::from_record(&Outbreak::new(SlotIndex::new(1).unwrap()));
        doc.num_defeated = -1;
        assert!(matches!(doc.validate(), Err(Error::MalformedSnapshot { .. })));
    }

    #[test]
    fn non_positive_capacity_is_malformed() {
        for max_spawns in [0, -3] {
            let mut doc = SnapshotDocument::from_record(
                &Outbreak::new(SlotIndex::new(1).unwrap()).with_spawns(5, 0),
            );
            doc.max_spawns = max_spawns;
            let err = doc.validate().unwrap_err();
            assert!(matches!(err, Error::MalformedSnapshot { .. }));
            assert!(err.to_string().contains("maxSpawns"));
        }
    }

    #[test]
    fn serialized_names_are_camel_case() {
        let doc = SnapshotDocument::from_record(
            &Outbreak::new(SlotIndex::new(1).unwrap()).with_spawns(5, 2),
        );
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["maxSpawns"], 5);
        assert_eq!(json["numDefeated"], 2);
        assert!(json.get("centerPosition").is_none());
    }
}
