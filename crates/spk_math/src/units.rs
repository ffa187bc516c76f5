//! Length units of the interchange format.
//!
//! Every length-valued field of a commit object carries a unit tag. The host
//! works in inches internally, so every length is rescaled before it reaches a
//! host constructor. The set of tags is closed: an unknown tag has no safe
//! default and is reported as an error.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while resolving a unit tag.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitsError {
    #[error("Unknown unit tag: {0:?}")]
    Unknown(String),
}

/// A length unit understood by the interchange format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Units {
    #[serde(rename = "mm", alias = "millimeters", alias = "millimetres")]
    Millimeters,
    #[serde(rename = "cm", alias = "centimeters", alias = "centimetres")]
    Centimeters,
    #[serde(rename = "m", alias = "meters", alias = "metres")]
    Meters,
    #[serde(rename = "km", alias = "kilometers", alias = "kilometres")]
    Kilometers,
    #[serde(rename = "in", alias = "inches", alias = "inch")]
    Inches,
    #[serde(rename = "ft", alias = "feet", alias = "foot")]
    Feet,
    #[serde(rename = "yd", alias = "yards", alias = "yard")]
    Yards,
    #[serde(rename = "mi", alias = "miles", alias = "mile")]
    Miles,
}

impl Default for Units {
    /// Commit objects default to meters.
    fn default() -> Self {
        Units::Meters
    }
}

impl Units {
    /// All supported units, in declaration order.
    pub const ALL: [Units; 8] = [
        Units::Millimeters,
        Units::Centimeters,
        Units::Meters,
        Units::Kilometers,
        Units::Inches,
        Units::Feet,
        Units::Yards,
        Units::Miles,
    ];

    /// Short tag as written in commit objects.
    pub fn as_str(self) -> &'static str {
        match self {
            Units::Millimeters => "mm",
            Units::Centimeters => "cm",
            Units::Meters => "m",
            Units::Kilometers => "km",
            Units::Inches => "in",
            Units::Feet => "ft",
            Units::Yards => "yd",
            Units::Miles => "mi",
        }
    }

    /// Number of native units (inches) in one of `self`.
    pub fn native_scale(self) -> f64 {
        match self {
            Units::Millimeters => 1.0 / 25.4,
            Units::Centimeters => 1.0 / 2.54,
            Units::Meters => 1.0 / 0.0254,
            Units::Kilometers => 1.0 / 0.0000254,
            Units::Inches => 1.0,
            Units::Feet => 12.0,
            Units::Yards => 36.0,
            Units::Miles => 63_360.0,
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Units {
    type Err = UnitsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let units = match s.trim().to_ascii_lowercase().as_str() {
            "mm" | "millimeter" | "millimeters" | "millimetre" | "millimetres" => Units::Millimeters,
            "cm" | "centimeter" | "centimeters" | "centimetre" | "centimetres" => Units::Centimeters,
            "m" | "meter" | "meters" | "metre" | "metres" => Units::Meters,
            "km" | "kilometer" | "kilometers" | "kilometre" | "kilometres" => Units::Kilometers,
            "in" | "inch" | "inches" => Units::Inches,
            "ft" | "foot" | "feet" => Units::Feet,
            "yd" | "yard" | "yards" => Units::Yards,
            "mi" | "mile" | "miles" => Units::Miles,
            _ => return Err(UnitsError::Unknown(s.to_string())),
        };
        Ok(units)
    }
}

/// Rescale a length given in `units` into the host's native unit.
pub fn length_to_native(length: f64, units: Units) -> f64 {
    length * units.native_scale()
}

/// Rescale a native length back into `units`.
pub fn length_from_native(length: f64, units: Units) -> f64 {
    length / units.native_scale()
}
