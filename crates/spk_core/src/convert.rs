//! Conversion of commit objects into native host primitives.
//!
//! [`ToNative`] walks a commit object tree and, for every node of a
//! convertible kind, calls the matching conversion routine. Conversions are
//! one-shot: they compute native arguments, hand them to the host and keep
//! nothing.
//!
//! Malformed or unknown nodes are skipped without error. The one exception is
//! an unknown unit tag, which aborts the conversion since there is no safe
//! scale to fall back on.

use serde_json::{Map, Value};
use spk_math::{DMat4, DVec3, TransformError, Units, UnitsError};
use thiserror::Error;

use crate::host::{Color, Host};
use crate::node::{self, SPECKLE_TYPE_KEY, UNITS_KEY};
use crate::settings::ConversionSettings;
use crate::speckle_type::{is_convertible, SpeckleType};

/// Errors that can occur during conversion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    #[error("Units error: {0}")]
    Units(#[from] UnitsError),

    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),
}

/// Result type for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Counters collected while traversing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TraversalStats {
    /// Nodes inspected by the traverser (including scalars)
    pub visited: usize,

    /// Convertible nodes handed to the dispatch
    pub dispatched: usize,

    /// Native primitives created in the host
    pub created: usize,

    /// Convertible nodes skipped for missing or malformed fields
    pub skipped: usize,
}

impl TraversalStats {
    fn since(self, earlier: TraversalStats) -> TraversalStats {
        TraversalStats {
            visited: self.visited - earlier.visited,
            dispatched: self.dispatched - earlier.dispatched,
            created: self.created - earlier.created,
            skipped: self.skipped - earlier.skipped,
        }
    }
}

/// Converter from commit objects into a host.
pub struct ToNative<'h, H: Host> {
    host: &'h mut H,
    settings: ConversionSettings,
    stats: TraversalStats,
}

impl<'h, H: Host> ToNative<'h, H> {
    /// Create a converter writing into `host`.
    pub fn new(host: &'h mut H, settings: ConversionSettings) -> Self {
        Self {
            host,
            settings,
            stats: TraversalStats::default(),
        }
    }

    pub fn settings(&self) -> &ConversionSettings {
        &self.settings
    }

    /// Counters accumulated since this converter was created.
    pub fn stats(&self) -> TraversalStats {
        self.stats
    }

    /// Convert a whole commit object and return the counters for this pass.
    pub fn traverse_commit_object(&mut self, root: &Value) -> ConvertResult<TraversalStats> {
        let before = self.stats;
        self.traverse(root)?;
        let pass = self.stats.since(before);

        log::info!(
            "Converted commit object: {} nodes visited, {} dispatched, {} primitives created, {} skipped",
            pass.visited,
            pass.dispatched,
            pass.created,
            pass.skipped
        );

        Ok(pass)
    }

    /// Visit `node` and everything reachable from it.
    pub fn traverse(&mut self, node: &Value) -> ConvertResult<()> {
        self.stats.visited += 1;

        if is_convertible(node) {
            self.stats.dispatched += 1;
            return self.convert(node);
        }

        match node {
            // Typed node: only dynamic and well-known child properties
            Value::Object(obj) if obj.contains_key(SPECKLE_TYPE_KEY) => {
                for child in node::child_properties(obj) {
                    self.traverse(child)?;
                }
            }
            Value::Object(obj) => {
                for child in obj.values() {
                    self.traverse(child)?;
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.traverse(item)?;
                }
            }
            _ => {}
        }

        Ok(())
    }

    /// Route a node to its conversion routine by discriminator.
    pub fn convert(&mut self, node: &Value) -> ConvertResult<()> {
        match SpeckleType::of(node) {
            Some(SpeckleType::Line | SpeckleType::Polyline) => self.edge_to_native(node),
            // Unreachable from traverse: Face is not in the convertible set.
            Some(SpeckleType::Face) => self.face_to_native(node),
            Some(kind) => {
                log::debug!("No native conversion for {}", kind);
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Resolve the unit tag of a node, falling back to the default units.
    pub fn units_of(&self, obj: &Map<String, Value>) -> ConvertResult<Units> {
        match obj.get(UNITS_KEY) {
            None | Some(Value::Null) => Ok(self.settings.default_units),
            Some(Value::String(tag)) => Ok(tag.parse::<Units>()?),
            Some(other) => Err(UnitsError::Unknown(other.to_string()).into()),
        }
    }

    /// Rescale a length into native units.
    pub fn length_to_native(&self, length: f64, units: Option<Units>) -> f64 {
        spk_math::length_to_native(length, units.unwrap_or(self.settings.default_units))
    }

    /// Convert a line or polyline into a chain of edges.
    pub fn edge_to_native(&mut self, line: &Value) -> ConvertResult<()> {
        let Some(obj) = line.as_object() else {
            return Ok(());
        };
        let Some(payload) = obj.get("value") else {
            self.skip("line has no value");
            return Ok(());
        };
        let Some(values) = node::numbers(payload) else {
            self.skip("line value is not a list of numbers");
            return Ok(());
        };

        let units = self.units_of(obj)?;

        let triples = values.chunks_exact(3);
        let dropped = triples.remainder().len();
        if dropped > 0 {
            log::warn!(
                "Line value has {} numbers, dropping {} trailing coordinate(s)",
                values.len(),
                dropped
            );
        }

        let points: Vec<DVec3> = triples
            .map(|pt| {
                DVec3::new(
                    spk_math::length_to_native(pt[0], units),
                    spk_math::length_to_native(pt[1], units),
                    spk_math::length_to_native(pt[2], units),
                )
            })
            .collect();

        log::trace!("Adding edge chain through {} points", points.len());
        self.host.add_edges(&points);
        self.stats.created += 1;
        Ok(())
    }

    /// Legacy face conversion. Not implemented.
    pub fn face_to_native(&mut self, _face: &Value) -> ConvertResult<()> {
        Ok(())
    }

    /// Convert a point mapping into a native point.
    ///
    /// Each coordinate uses the point's own unit tag.
    pub fn point_to_native(&self, point: &Value) -> ConvertResult<Option<DVec3>> {
        let Some(obj) = point.as_object() else {
            return Ok(None);
        };
        let (Some(x), Some(y), Some(z)) = (
            node::get_f64(obj, "x"),
            node::get_f64(obj, "y"),
            node::get_f64(obj, "z"),
        ) else {
            return Ok(None);
        };

        let units = self.units_of(obj)?;
        Ok(Some(DVec3::new(
            spk_math::length_to_native(x, units),
            spk_math::length_to_native(y, units),
            spk_math::length_to_native(z, units),
        )))
    }

    /// Convert a flat row-major transform into a native matrix.
    pub fn transform_to_native(&self, t_arr: &[f64], units: Option<Units>) -> ConvertResult<DMat4> {
        let units = units.unwrap_or(self.settings.default_units);
        Ok(spk_math::transform_to_native(t_arr, units)?)
    }

    /// Convert a transform node (`matrix`, or legacy `value`, plus `units`).
    pub fn transform_node_to_native(&self, transform: &Value) -> ConvertResult<Option<DMat4>> {
        let Some(obj) = transform.as_object() else {
            return Ok(None);
        };
        let Some(t_arr) = obj
            .get("matrix")
            .or_else(|| obj.get("value"))
            .and_then(node::numbers)
        else {
            return Ok(None);
        };

        let units = self.units_of(obj)?;
        self.transform_to_native(&t_arr, Some(units)).map(Some)
    }

    /// Look up or create a material from a render material mapping.
    ///
    /// An existing material with the same name is returned untouched; its
    /// alpha and color are not re-applied.
    pub fn material_to_native(&mut self, render_mat: &Value) -> Option<H::Material> {
        let obj = render_mat.as_object()?;
        let Some(name) = node::get_str(obj, "name").or_else(|| node::get_str(obj, "id")) else {
            self.skip("render material has neither name nor id");
            return None;
        };

        if let Some(material) = self.host.find_by_name(name) {
            log::debug!("Reusing existing material '{}'", name);
            return Some(material);
        }

        let material = self.host.create(name);
        self.host
            .set_alpha(&material, node::get_f64(obj, "opacity").unwrap_or(1.0));

        let argb = obj
            .get("diffuse")
            .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)));
        if let Some(argb) = argb {
            self.host.set_color(&material, Color::from_argb(argb));
        }

        log::debug!("Created material '{}'", name);
        self.stats.created += 1;
        Some(material)
    }

    fn skip(&mut self, reason: &str) {
        log::debug!("Skipping node: {}", reason);
        self.stats.skipped += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Entities, MaterialRepository};
    use crate::scene::Scene;
    use serde_json::json;

    /// Host that records every call made to it.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
        materials: Vec<String>,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        AddEdges(Vec<DVec3>),
        Create(String),
        SetAlpha(usize, f64),
        SetColor(usize, Color),
    }

    impl Entities for Recorder {
        fn add_edges(&mut self, points: &[DVec3]) {
            self.calls.push(Call::AddEdges(points.to_vec()));
        }
    }

    impl MaterialRepository for Recorder {
        type Material = usize;

        fn find_by_name(&self, name: &str) -> Option<usize> {
            self.materials.iter().position(|m| m == name)
        }

        fn create(&mut self, name: &str) -> usize {
            self.calls.push(Call::Create(name.to_string()));
            self.materials.push(name.to_string());
            self.materials.len() - 1
        }

        fn set_alpha(&mut self, material: &usize, alpha: f64) {
            self.calls.push(Call::SetAlpha(*material, alpha));
        }

        fn set_color(&mut self, material: &usize, color: Color) {
            self.calls.push(Call::SetColor(*material, color));
        }
    }

    fn inches() -> ConversionSettings {
        ConversionSettings::with_units(Units::Inches)
    }

    fn line(value: Value) -> Value {
        json!({
            "speckle_type": "Objects.Geometry.Line",
            "value": value,
            "units": "in",
        })
    }

    #[test]
    fn test_line_to_edges() {
        let mut host = Recorder::default();
        let mut converter = ToNative::new(&mut host, inches());

        converter
            .convert(&line(json!([0, 0, 0, 1, 2, 3, 4, 5, 6])))
            .unwrap();

        assert_eq!(
            host.calls,
            vec![Call::AddEdges(vec![
                DVec3::ZERO,
                DVec3::new(1.0, 2.0, 3.0),
                DVec3::new(4.0, 5.0, 6.0),
            ])]
        );
    }

    #[test]
    fn test_polyline_units() {
        let mut scene = Scene::new("test");
        let mut converter = ToNative::new(&mut scene, inches());

        let polyline = json!({
            "speckle_type": "Objects.Geometry.Polyline",
            "value": [0, 0, 0, 25.4, 50.8, 0],
            "units": "mm",
        });
        converter.convert(&polyline).unwrap();

        assert_eq!(scene.edge_chain_count(), 1);
        let points = &scene.edges[0].points;
        assert_eq!(points.len(), 2);
        assert!((points[1] - DVec3::new(1.0, 2.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_line_default_units() {
        let mut scene = Scene::new("test");
        let mut converter = ToNative::new(&mut scene, ConversionSettings::with_units(Units::Feet));

        let line = json!({
            "speckle_type": "Objects.Geometry.Line",
            "value": [1, 0, 0, 2, 0, 0],
        });
        converter.convert(&line).unwrap();

        assert_eq!(scene.edges[0].points, vec![DVec3::new(12.0, 0.0, 0.0), DVec3::new(24.0, 0.0, 0.0)]);
    }

    #[test]
    fn test_line_without_value_has_no_side_effects() {
        let mut host = Recorder::default();
        let mut converter = ToNative::new(&mut host, inches());

        let line = json!({"speckle_type": "Objects.Geometry.Line", "units": "in"});
        converter.convert(&line).unwrap();
        assert_eq!(converter.stats().skipped, 1);

        assert!(host.calls.is_empty());
    }

    #[test]
    fn test_line_with_non_numeric_value_is_skipped() {
        let mut host = Recorder::default();
        let mut converter = ToNative::new(&mut host, inches());

        converter.convert(&line(json!([0, 0, "a"]))).unwrap();
        converter.convert(&line(json!("0 0 0"))).unwrap();

        assert!(host.calls.is_empty());
    }

    #[test]
    fn test_trailing_coordinates_dropped() {
        let mut host = Recorder::default();
        let mut converter = ToNative::new(&mut host, inches());

        converter.convert(&line(json!([1, 1, 1, 2, 2]))).unwrap();

        assert_eq!(host.calls, vec![Call::AddEdges(vec![DVec3::ONE])]);
    }

    #[test]
    fn test_unknown_units_is_an_error() {
        let mut host = Recorder::default();
        let mut converter = ToNative::new(&mut host, inches());

        let line = json!({
            "speckle_type": "Objects.Geometry.Line",
            "value": [0, 0, 0, 1, 1, 1],
            "units": "cubits",
        });
        let err = converter.convert(&line).unwrap_err();
        assert_eq!(err, ConvertError::Units(UnitsError::Unknown("cubits".to_string())));

        let line = json!({
            "speckle_type": "Objects.Geometry.Line",
            "value": [0, 0, 0],
            "units": 3,
        });
        assert!(converter.convert(&line).is_err());

        assert!(host.calls.is_empty());
    }

    #[test]
    fn test_placeholder_kinds_are_noops() {
        let mut host = Recorder::default();
        let mut converter = ToNative::new(&mut host, inches());

        for kind in [
            "Objects.Geometry.Mesh",
            "Objects.Other.BlockInstance",
            "Objects.Other.BlockDefinition",
            "Objects.Other.RenderMaterial",
            "Face",
            "Objects.Geometry.Point",
        ] {
            let node = json!({"speckle_type": kind, "value": [0, 0, 0], "name": "m"});
            converter.convert(&node).unwrap();
        }

        assert!(host.calls.is_empty());
    }

    #[test]
    fn test_point_to_native() {
        let mut scene = Scene::new("test");
        let converter = ToNative::new(&mut scene, inches());

        let point = json!({"x": 1, "y": 2, "z": 3, "units": "ft"});
        let p = converter.point_to_native(&point).unwrap().unwrap();
        assert_eq!(p, DVec3::new(12.0, 24.0, 36.0));

        // Own units only; falls back to the default
        let point = json!({"x": 1, "y": 2, "z": 3});
        let p = converter.point_to_native(&point).unwrap().unwrap();
        assert_eq!(p, DVec3::new(1.0, 2.0, 3.0));

        assert_eq!(converter.point_to_native(&json!({"x": 1, "y": 2})).unwrap(), None);
        assert!(converter
            .point_to_native(&json!({"x": 1, "y": 2, "z": 3, "units": "parsec"}))
            .is_err());
    }

    #[test]
    fn test_length_to_native_default() {
        let mut scene = Scene::new("test");
        let converter = ToNative::new(&mut scene, ConversionSettings::with_units(Units::Feet));

        assert_eq!(converter.length_to_native(2.0, None), 24.0);
        assert_eq!(converter.length_to_native(2.0, Some(Units::Inches)), 2.0);
    }

    #[test]
    fn test_transform_node() {
        let mut scene = Scene::new("test");
        let converter = ToNative::new(&mut scene, inches());

        let transform = json!({
            "speckle_type": "Objects.Other.Transform",
            "matrix": [1, 0, 0, 10, 0, 1, 0, 20, 0, 0, 1, 30, 0, 0, 0, 1],
            "units": "mm",
        });
        let mat = converter.transform_node_to_native(&transform).unwrap().unwrap();
        let translation = mat.transform_point3(DVec3::ZERO);
        assert!((translation - DVec3::new(10.0, 20.0, 30.0) / 25.4).length() < 1e-12);
        assert_eq!(mat.w_axis.w, 1.0);

        let short = json!({"value": [1, 0, 0]});
        assert_eq!(
            converter.transform_node_to_native(&short),
            Err(ConvertError::Transform(TransformError::WrongLength(3)))
        );

        assert_eq!(converter.transform_node_to_native(&json!({"units": "mm"})), Ok(None));
    }

    #[test]
    fn test_identity_transform() {
        let mut scene = Scene::new("test");
        let converter = ToNative::new(&mut scene, inches());

        let identity = [1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0];
        assert_eq!(converter.transform_to_native(&identity, None).unwrap(), DMat4::IDENTITY);
    }

    #[test]
    fn test_material_created_once() {
        let mut host = Recorder::default();
        let mut converter = ToNative::new(&mut host, inches());

        let render_mat = json!({
            "speckle_type": "Objects.Other.RenderMaterial",
            "name": "glass",
            "opacity": 0.25,
            "diffuse": 0x80FF0000_u32,
        });

        let first = converter.material_to_native(&render_mat);
        let second = converter.material_to_native(&render_mat);
        assert_eq!(first, Some(0));
        assert_eq!(second, first);

        assert_eq!(
            host.calls,
            vec![
                Call::Create("glass".to_string()),
                Call::SetAlpha(0, 0.25),
                Call::SetColor(0, Color::new(255, 0, 0, 128)),
            ]
        );
    }

    #[test]
    fn test_material_keeps_host_edits() {
        let mut scene = Scene::new("test");
        let render_mat = json!({"name": "brick", "opacity": 1.0, "diffuse": -16777216});

        let id = ToNative::new(&mut scene, inches())
            .material_to_native(&render_mat)
            .unwrap();
        assert_eq!(scene.get_material(id).unwrap().color, Some(Color::new(0, 0, 0, 255)));

        // User repaints the material in the host
        scene.get_material_mut(id).unwrap().color = Some(Color::new(10, 20, 30, 255));

        let again = ToNative::new(&mut scene, inches())
            .material_to_native(&render_mat)
            .unwrap();
        assert_eq!(again, id);
        assert_eq!(scene.material_count(), 1);
        assert_eq!(scene.get_material(id).unwrap().color, Some(Color::new(10, 20, 30, 255)));
    }

    #[test]
    fn test_material_name_falls_back_to_id() {
        let mut scene = Scene::new("test");
        let mut converter = ToNative::new(&mut scene, inches());

        assert!(converter.material_to_native(&json!({"id": "abc123"})).is_some());
        assert!(converter.material_to_native(&json!({"opacity": 0.5})).is_none());

        let material = scene.material_by_name("abc123").unwrap();
        assert_eq!(material.alpha, 1.0);
        assert_eq!(material.color, None);
    }

    #[test]
    fn test_traverse_dispatches_only_convertible_nodes() {
        let mut host = Recorder::default();
        let mut converter = ToNative::new(&mut host, inches());

        let root = json!({
            "speckle_type": "Base",
            "name": {"speckle_type": "Objects.Geometry.Line", "value": [9, 9, 9]},
            "@layer": [
                {"speckle_type": "Objects.Geometry.Line", "value": [1, 1, 1]},
                {"nested": {"speckle_type": "Objects.Geometry.Polyline", "value": [2, 2, 2]}},
                {"speckle_type": "Objects.Geometry.Mesh", "displayValue": [
                    {"speckle_type": "Objects.Geometry.Line", "value": [8, 8, 8]}
                ]},
                42,
                null,
            ],
            "displayValue": {"speckle_type": "Objects.Geometry.Line", "value": [3, 3, 3]},
        });

        let stats = converter.traverse_commit_object(&root).unwrap();

        // root, @layer, 5 items, "nested" value, displayValue
        assert_eq!(stats.visited, 9);
        assert_eq!(stats.dispatched, 4);
        assert_eq!(stats.created, 3);

        assert_eq!(
            host.calls,
            vec![
                Call::AddEdges(vec![DVec3::ONE]),
                Call::AddEdges(vec![DVec3::splat(2.0)]),
                Call::AddEdges(vec![DVec3::splat(3.0)]),
            ]
        );
    }

    #[test]
    fn test_traverse_stops_on_unknown_units() {
        let mut host = Recorder::default();
        let mut converter = ToNative::new(&mut host, inches());

        let root = json!([
            {"speckle_type": "Objects.Geometry.Line", "value": [1, 1, 1], "units": "in"},
            {"speckle_type": "Objects.Geometry.Line", "value": [2, 2, 2], "units": "furlong"},
            {"speckle_type": "Objects.Geometry.Line", "value": [3, 3, 3], "units": "in"},
        ]);

        assert!(converter.traverse(&root).is_err());
        assert_eq!(host.calls, vec![Call::AddEdges(vec![DVec3::ONE])]);
    }
}
