//! Positional anchors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// A 3-D world coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Coordinates in X, Y, Z order.
    pub fn coordinates(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    pub fn axis(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// A copy of this point with one axis replaced.
    pub fn with_axis(mut self, axis: Axis, value: f32) -> Self {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
            Axis::Z => self.z = value,
        }
        self
    }
}

impl From<[f32; 3]> for Point3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// One axis of a `Point3`.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which of a record's two anchors a coordinate belongs to.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum PointKind {
    Center,
    Dummy,
}

impl PointKind {
    pub fn name(self) -> &'static str {
        match self {
            PointKind::Center => "center",
            PointKind::Dummy => "dummy",
        }
    }

    /// Parse coordinate text for one axis of this point.
    ///
    /// Surrounding whitespace is ignored. Text that is not a finite number
    /// yields `InvalidCoordinateInput`.
    pub fn parse_coordinate(self, axis: Axis, text: &str) -> Result<f32, Error> {
        let invalid = || Error::InvalidCoordinateInput {
            point: self,
            axis,
            text: text.to_string(),
        };
        let value = f32::from_str(text.trim()).map_err(|_| invalid())?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(invalid())
        }
    }
}

impl fmt::Display for PointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
