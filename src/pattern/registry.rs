use super::{factory, EdgeSequence, PatternError};
use crate::math::Real;
use crate::utils::hashmap::HashMap;

/// A function building a cut shape of the given width and depth.
pub type ShapeBuilder = fn(width: Real, depth: Real) -> EdgeSequence;

/// A registry of named cut-shape builders.
///
/// Generators pick the shape of an armhole, a neckline or a dart by name, as found in
/// design parameters, and look the builder up here.
///
/// ```
/// use boxmesh::pattern::ShapeRegistry;
///
/// let registry = ShapeRegistry::with_defaults();
/// let dart = registry.build("dart", 4.0, 10.0).unwrap();
/// assert_eq!(dart.len(), 2);
/// assert!(registry.build("unknown", 4.0, 10.0).is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct ShapeRegistry {
    builders: HashMap<String, ShapeBuilder>,
}

impl ShapeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the `dart`, `notch`, `arc` and `curve` shapes of [`factory`].
    pub fn with_defaults() -> Self {
        let mut result = Self::new();
        result.register_builder("dart", factory::dart_shape);
        result.register_builder("notch", factory::notch_shape);
        result.register_builder("arc", factory::arc_shape);
        result.register_builder("curve", factory::curve_shape);
        result
    }

    /// Registers `builder` under `name`, replacing any previous builder with that name.
    pub fn register_builder(&mut self, name: impl Into<String>, builder: ShapeBuilder) {
        let _ = self.builders.insert(name.into(), builder);
    }

    /// Is a builder registered under `name`?
    pub fn contains(&self, name: &str) -> bool {
        self.builders.contains_key(name)
    }

    /// The names of all the registered builders, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.builders.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Builds the shape registered under `name`.
    pub fn build(&self, name: &str, width: Real, depth: Real) -> Result<EdgeSequence, PatternError> {
        self.builders
            .get(name)
            .map(|builder| builder(width, depth))
            .ok_or_else(|| PatternError::UnknownShape(name.to_string()))
    }
}
