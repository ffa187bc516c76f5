//! Discriminators of the node kinds this crate knows about.

use std::fmt;

use serde_json::Value;

use crate::node;

/// Known values of the `speckle_type` discriminator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpeckleType {
    Line,
    Polyline,
    Mesh,
    BlockInstance,
    BlockDefinition,
    RenderMaterial,

    /// Legacy face discriminator.
    ///
    /// Dispatch still routes it to the face converter, but it is not part of
    /// the convertible set, so traversal never reaches that branch. Left in
    /// place until the interchange schema confirms whether faces should be
    /// admitted or the branch removed.
    Face,
}

impl SpeckleType {
    /// All known discriminators.
    pub const ALL: [SpeckleType; 7] = [
        SpeckleType::Line,
        SpeckleType::Polyline,
        SpeckleType::Mesh,
        SpeckleType::BlockInstance,
        SpeckleType::BlockDefinition,
        SpeckleType::RenderMaterial,
        SpeckleType::Face,
    ];

    /// Parse a discriminator string. Matching is exact.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Objects.Geometry.Line" => Some(SpeckleType::Line),
            "Objects.Geometry.Polyline" => Some(SpeckleType::Polyline),
            "Objects.Geometry.Mesh" => Some(SpeckleType::Mesh),
            "Objects.Other.BlockInstance" => Some(SpeckleType::BlockInstance),
            "Objects.Other.BlockDefinition" => Some(SpeckleType::BlockDefinition),
            "Objects.Other.RenderMaterial" => Some(SpeckleType::RenderMaterial),
            "Face" => Some(SpeckleType::Face),
            _ => None,
        }
    }

    /// Discriminator string as written in commit objects.
    pub fn as_str(self) -> &'static str {
        match self {
            SpeckleType::Line => "Objects.Geometry.Line",
            SpeckleType::Polyline => "Objects.Geometry.Polyline",
            SpeckleType::Mesh => "Objects.Geometry.Mesh",
            SpeckleType::BlockInstance => "Objects.Other.BlockInstance",
            SpeckleType::BlockDefinition => "Objects.Other.BlockDefinition",
            SpeckleType::RenderMaterial => "Objects.Other.RenderMaterial",
            SpeckleType::Face => "Face",
        }
    }

    /// Discriminator of a typed node, if it is a known kind.
    pub fn of(node: &Value) -> Option<Self> {
        node::speckle_type(node).and_then(Self::parse)
    }

    /// Whether traversal hands nodes of this kind to the dispatch.
    pub fn is_convertible(self) -> bool {
        !matches!(self, SpeckleType::Face)
    }
}

impl fmt::Display for SpeckleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check whether `node` is a typed node of a convertible kind.
pub fn is_convertible(node: &Value) -> bool {
    SpeckleType::of(node).is_some_and(SpeckleType::is_convertible)
}
