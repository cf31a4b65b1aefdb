//! Typed block payloads.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Point3;

/// The value held by one device block.
///
/// Written and expected values of a compare-and-set always share a variant:
/// the variant is fixed by the field kind of the target address.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum BlockValue {
    Bool(bool),
    U8(u8),
    U16(u16),
    I32(i32),
    Point(Point3),
}

impl BlockValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            BlockValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u8(&self) -> Option<u8> {
        match self {
            BlockValue::U8(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u16(&self) -> Option<u16> {
        match self {
            BlockValue::U16(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            BlockValue::I32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_point(&self) -> Option<Point3> {
        match self {
            BlockValue::Point(p) => Some(*p),
            _ => None,
        }
    }

    /// Whether two values have the same payload type.
    pub fn same_kind(&self, other: &BlockValue) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl fmt::Display for BlockValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockValue::Bool(v) => write!(f, "{}", v),
            BlockValue::U8(v) => write!(f, "{}", v),
            BlockValue::U16(v) => write!(f, "{}", v),
            BlockValue::I32(v) => write!(f, "{}", v),
            BlockValue::Point(p) => write!(f, "{}", p),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_match_variant() {
        assert_eq!(BlockValue::Bool(true).as_bool(), Some(true));
        assert_eq!(BlockValue::Bool(true).as_u8(), None);
        assert_eq!(BlockValue::U16(25).as_u16(), Some(25));
        assert_eq!(BlockValue::I32(-3).as_i32(), Some(-3));
        assert_eq!(
            BlockValue::Point(Point3::new(1.0, 2.0, 3.0)).as_point(),
            Some(Point3::new(1.0, 2.0, 3.0))
        );
    }

    #[test]
    fn same_kind_ignores_payload() {
        assert!(BlockValue::I32(1).same_kind(&BlockValue::I32(7)));
        assert!(!BlockValue::I32(1).same_kind(&BlockValue::U8(1)));
    }

    #[test]
    fn json_shape_is_tagged() {
        let json = serde_json::to_value(BlockValue::U8(3)).unwrap();
        assert_eq!(json, serde_json::json!({"type": "u8", "value": 3}));

        let point = BlockValue::Point(Point3::new(1.5, 0.0, -2.0));
        let json = serde_json::to_value(point).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "point", "value": {"x": 1.5, "y": 0.0, "z": -2.0}})
        );
        let back: BlockValue = serde_json::from_value(json).unwrap();
        assert_eq!(back, point);
    }
}
