//! Species identifiers and the species-table collaborator.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Species code in the game-internal numbering space.
///
/// Distinct from the national (display) numbering; a `SpeciesTable`
/// converts between the two.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeciesId(pub u16);

impl fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Species metadata supplied by the host application.
///
/// Name tables and sprites stay outside this crate; the editor only needs
/// the numbering bijection and the size of each species' form table.
pub trait SpeciesTable: Send + Sync {
    /// Internal code to national number.
    fn to_national(&self, species: SpeciesId) -> u16;

    /// National number to internal code, if the species exists.
    fn to_internal(&self, national: u16) -> Option<SpeciesId>;

    /// Number of forms, or `None` when the table has no form data for it.
    ///
    /// A species without alternate forms has one form (index 0).
    fn form_count(&self, species: SpeciesId) -> Option<u8>;

    /// Check `form` against the species' form table.
    fn validate_form(&self, species: SpeciesId, form: u8) -> Result<(), Error> {
        match self.form_count(species) {
            Some(count) if form >= count.max(1) => Err(Error::InvalidForm {
                species: species.0,
                form,
                count: count.max(1),
            }),
            _ => Ok(()),
        }
    }
}

/// A table where internal and national numbers coincide.
///
/// Form counts are only known for species registered with `with_forms`.
#[derive(Clone, Debug, Default)]
pub struct IdentitySpeciesTable {
    forms: HashMap<SpeciesId, u8>,
}

impl IdentitySpeciesTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the form count of a species.
    pub fn with_forms(mut self, species: SpeciesId, count: u8) -> Self {
        self.forms.insert(species, count);
        self
    }
}

impl SpeciesTable for IdentitySpeciesTable {
    fn to_national(&self, species: SpeciesId) -> u16 {
        species.0
    }

    fn to_internal(&self, national: u16) -> Option<SpeciesId> {
        Some(SpeciesId(national))
    }

    fn form_count(&self, species: SpeciesId) -> Option<u8> {
        self.forms.get(&species).copied()
    }
}
