//! Synchronizable field identifiers.

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// A record field that is mirrored to its own device block.
///
/// Each variant maps to exactly one block per slot; the resolver is a match
/// on this enum, so adding a variant without an address fails to compile.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum FieldKind {
    Species,
    Form,
    MaxSpawns,
    NumDefeated,
    Enabled,
    Found,
    CenterPosition,
    DummyPosition,
}

impl FieldKind {
    /// Every field kind, in block order.
    pub const ALL: [FieldKind; 8] = [
        FieldKind::Species,
        FieldKind::Form,
        FieldKind::MaxSpawns,
        FieldKind::NumDefeated,
        FieldKind::Enabled,
        FieldKind::Found,
        FieldKind::CenterPosition,
        FieldKind::DummyPosition,
    ];

    /// Canonical name, as used in addresses and snapshot documents.
    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Species => "species",
            FieldKind::Form => "form",
            FieldKind::MaxSpawns => "max_spawns",
            FieldKind::NumDefeated => "num_defeated",
            FieldKind::Enabled => "enabled",
            FieldKind::Found => "found",
            FieldKind::CenterPosition => "center_pos",
            FieldKind::DummyPosition => "dummy_pos",
        }
    }

    /// Whether the block holds a full 3-D point.
    pub fn is_position(self) -> bool {
        matches!(self, FieldKind::CenterPosition | FieldKind::DummyPosition)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.to_ascii_lowercase().as_str() {
            "species" => FieldKind::Species,
            "form" => FieldKind::Form,
            "max_spawns" | "maxspawns" | "max" => FieldKind::MaxSpawns,
            "num_defeated" | "numdefeated" | "defeated" | "ko" => FieldKind::NumDefeated,
            "enabled" => FieldKind::Enabled,
            "found" => FieldKind::Found,
            "center_pos" | "center" | "centerposition" => FieldKind::CenterPosition,
            "dummy_pos" | "dummy" | "dummyposition" => FieldKind::DummyPosition,
            _ => {
                return Err(Error::UnknownField {
                    name: s.to_string(),
                })
            }
        };
        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for kind in FieldKind::ALL {
            assert_eq!(kind.name().parse::<FieldKind>().unwrap(), kind);
        }
    }

    #[test]
    fn aliases_parse() {
        assert_eq!("max".parse::<FieldKind>().unwrap(), FieldKind::MaxSpawns);
        assert_eq!("KO".parse::<FieldKind>().unwrap(), FieldKind::NumDefeated);
        assert_eq!(
            "center".parse::<FieldKind>().unwrap(),
            FieldKind::CenterPosition
        );
    }

    #[test]
    fn unknown_name_is_unknown_field() {
        let err = "TotalSpawnz".parse::<FieldKind>().unwrap_err();
        assert!(matches!(err, Error::UnknownField { name } if name == "TotalSpawnz"));
    }

    #[test]
    fn only_points_are_positions() {
        let positions: Vec<_> = FieldKind::ALL
            .into_iter()
            .filter(|k| k.is_position())
            .collect();
        assert_eq!(
            positions,
            vec![FieldKind::CenterPosition, FieldKind::DummyPosition]
        );
    }
}
