//! Caller-supplied conversion settings.

use serde::{Deserialize, Serialize};
use spk_math::Units;

/// Settings threaded through every conversion call.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionSettings {
    /// Unit used for nodes that carry no `units` field.
    pub default_units: Units,
}

impl ConversionSettings {
    pub fn with_units(default_units: Units) -> Self {
        Self { default_units }
    }
}
