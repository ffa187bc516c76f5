//! Interfaces to the host application.
//!
//! Conversion never owns native primitives. It hands computed arguments to
//! the host through these traits and forgets about the result.

use spk_math::DVec3;

/// An 8-bit RGBA color as the host stores it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Unpack a 32-bit ARGB integer.
    ///
    /// Commit objects store colors as signed 32-bit integers, so only the
    /// low 32 bits of `argb` are used.
    pub fn from_argb(argb: i64) -> Self {
        let argb = argb as u32;
        Self {
            a: ((argb >> 24) & 0xFF) as u8,
            r: ((argb >> 16) & 0xFF) as u8,
            g: ((argb >> 8) & 0xFF) as u8,
            b: (argb & 0xFF) as u8,
        }
    }
}

/// The host's active entity collection.
pub trait Entities {
    /// Create a connected chain of edges through `points`, in order.
    fn add_edges(&mut self, points: &[DVec3]);
}

/// The host's material registry.
pub trait MaterialRepository {
    /// Host handle to a material.
    type Material: Clone;

    /// Look up a material by name.
    fn find_by_name(&self, name: &str) -> Option<Self::Material>;

    /// Create a new material with default properties.
    fn create(&mut self, name: &str) -> Self::Material;

    fn set_alpha(&mut self, material: &Self::Material, alpha: f64);

    fn set_color(&mut self, material: &Self::Material, color: Color);
}

/// Everything conversion needs from a host.
pub trait Host: Entities + MaterialRepository {}

impl<T: Entities + MaterialRepository> Host for T {}
