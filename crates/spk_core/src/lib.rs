//! SPK Core - Speckle commit conversion into native CAD primitives.
//!
//! This crate provides:
//!
//! - **Traversal**: walking a commit object tree and dispatching typed nodes
//! - **Conversion**: lines, polylines, points, transforms and materials
//! - **Host interfaces**: `Entities` and `MaterialRepository`, plus an
//!   in-memory `Scene` implementing both
//!
//! # Example
//!
//! ```ignore
//! use spk_core::{load_commit, ConversionSettings};
//!
//! let scene = load_commit("commit.json", &ConversionSettings::default())?;
//! println!("Loaded {} edges, {} materials",
//!     scene.edge_count(),
//!     scene.material_count());
//! ```

pub mod convert;
pub mod host;
pub mod loader;
pub mod node;
pub mod scene;
pub mod settings;
pub mod speckle_type;

// Re-export commonly used types
pub use convert::{ConvertError, ConvertResult, ToNative, TraversalStats};
pub use host::{Color, Entities, Host, MaterialRepository};
pub use loader::{convert_commit, load_commit, load_commit_from_str, LoadError, LoadResult};
pub use scene::{EdgeChain, Material, MaterialId, Scene};
pub use settings::ConversionSettings;
pub use speckle_type::{is_convertible, SpeckleType};
