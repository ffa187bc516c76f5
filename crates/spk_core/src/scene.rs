//! In-memory host scene.
//!
//! A minimal host that records every primitive conversion asks for. It backs
//! the command-line importer and the tests, and stands in for a real CAD
//! document wherever one is not available.

use std::collections::HashMap;

use spk_math::DVec3;

use crate::host::{Color, Entities, MaterialRepository};

/// A connected chain of edges through ordered points (native units).
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeChain {
    pub points: Vec<DVec3>,
}

impl EdgeChain {
    /// Number of edge segments in the chain.
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }
}

/// A named material entry.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    /// Material name (registry key)
    pub name: String,

    /// Alpha (0=transparent, 1=opaque)
    pub alpha: f64,

    /// Color, if one was assigned
    pub color: Option<Color>,
}

impl Material {
    /// Create a new material with default properties.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alpha: 1.0,
            color: None,
        }
    }
}

/// Handle to a material in a [`Scene`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaterialId(pub usize);

/// A complete scene containing edges and materials.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    /// Edge chains in creation order
    pub edges: Vec<EdgeChain>,

    /// Materials in creation order
    pub materials: Vec<Material>,

    /// Scene name (usually from filename)
    pub name: String,

    material_index: HashMap<String, MaterialId>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Get edge chain count.
    pub fn edge_chain_count(&self) -> usize {
        self.edges.len()
    }

    /// Get total edge segment count across all chains.
    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(EdgeChain::segment_count).sum()
    }

    /// Get total point count across all chains.
    pub fn point_count(&self) -> usize {
        self.edges.iter().map(|chain| chain.points.len()).sum()
    }

    /// Get material count.
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Get a material by ID.
    pub fn get_material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0)
    }

    /// Get a mutable material by ID (host-side edits).
    pub fn get_material_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.materials.get_mut(id.0)
    }

    /// Get a material by name.
    pub fn material_by_name(&self, name: &str) -> Option<&Material> {
        self.material_index
            .get(name)
            .and_then(|id| self.get_material(*id))
    }

    /// Bounding box `(min, max)` of all edge points, if any.
    pub fn bounds(&self) -> Option<(DVec3, DVec3)> {
        let mut points = self.edges.iter().flat_map(|chain| chain.points.iter());
        let first = *points.next()?;
        Some(points.fold((first, first), |(min, max), p| (min.min(*p), max.max(*p))))
    }
}

impl Entities for Scene {
    fn add_edges(&mut self, points: &[DVec3]) {
        self.edges.push(EdgeChain {
            points: points.to_vec(),
        });
    }
}

impl MaterialRepository for Scene {
    type Material = MaterialId;

    fn find_by_name(&self, name: &str) -> Option<MaterialId> {
        self.material_index.get(name).copied()
    }

    fn create(&mut self, name: &str) -> MaterialId {
        let id = MaterialId(self.materials.len());
        self.materials.push(Material::new(name));
        self.material_index.insert(name.to_string(), id);
        id
    }

    fn set_alpha(&mut self, material: &MaterialId, alpha: f64) {
        if let Some(m) = self.materials.get_mut(material.0) {
            m.alpha = alpha;
        }
    }

    fn set_color(&mut self, material: &MaterialId, color: Color) {
        if let Some(m) = self.materials.get_mut(material.0) {
            m.color = Some(color);
        }
    }
}
