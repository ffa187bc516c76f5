// Re-export glam for convenience
pub use glam::*;

// SPK math types
pub mod transform;
pub mod units;

pub use transform::{transform_to_native, TransformError};
pub use units::{length_from_native, length_to_native, Units, UnitsError};
