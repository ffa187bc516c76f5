//! High-level commit loading.
//!
//! Entry points for converting a serialized commit object into an
//! in-memory [`Scene`], or into any other [`Host`].

use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::convert::{ConvertError, ToNative, TraversalStats};
use crate::host::Host;
use crate::scene::Scene;
use crate::settings::ConversionSettings;

/// Errors that can occur during commit loading.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Conversion error: {0}")]
    Convert(#[from] ConvertError),
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Convert an already parsed commit object into `host`.
pub fn convert_commit<H: Host>(
    root: &Value,
    host: &mut H,
    settings: &ConversionSettings,
) -> Result<TraversalStats, ConvertError> {
    ToNative::new(host, settings.clone()).traverse_commit_object(root)
}

/// Load a commit JSON file into a new Scene.
///
/// # Example
///
/// ```ignore
/// use spk_core::{load_commit, ConversionSettings};
///
/// let scene = load_commit("commit.json", &ConversionSettings::default())?;
/// println!("Loaded {} edge chains", scene.edge_chain_count());
/// ```
pub fn load_commit<P: AsRef<Path>>(path: P, settings: &ConversionSettings) -> LoadResult<Scene> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unnamed");
    load_commit_from_str(&content, name, settings)
}

/// Load a commit from a JSON string (useful for testing).
pub fn load_commit_from_str(
    content: &str,
    name: &str,
    settings: &ConversionSettings,
) -> LoadResult<Scene> {
    let root: Value = serde_json::from_str(content)?;

    let mut scene = Scene::new(name);
    convert_commit(&root, &mut scene, settings)?;

    Ok(scene)
}
