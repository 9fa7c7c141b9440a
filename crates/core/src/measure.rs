//! Measure dispatch layer (`spec.md` §3 `MeasureEntry`, §4.E).
//!
//! The ~20 concrete algorithms (edit distances, alignment, bag/set
//! coefficients, kernels) are out of scope for the core per `spec.md` §1 —
//! they live in `strmatrix-measures` and register themselves into a
//! [`MeasureRegistry`] built here.

use std::collections::HashMap;

use crate::string::SimString;

/// Fallback measure name used when an unknown name is requested
/// (`spec.md` §4.E, §7).
pub const DEFAULT_MEASURE: &str = "levenshtein";

/// Per-measure configuration (thresholds, costs, kernel orders, ...),
/// supplied by the CLI as `key=value` pairs and read by each measure's
/// `configure` hook. Unrecognized keys are ignored by a given measure.
#[derive(Debug, Clone, Default)]
pub struct MeasureConfig {
    values: HashMap<String, f64>,
}

impl MeasureConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str, default: f64) -> f64 {
        self.values.get(key).copied().unwrap_or(default)
    }

    pub fn get_usize(&self, key: &str, default: usize) -> usize {
        self.values
            .get(key)
            .map(|v| *v as usize)
            .unwrap_or(default)
    }
}

/// The capability interface every concrete measure implements
/// (`spec.md` §3 `MeasureEntry`, §9 Design Notes).
pub trait Measure: Send + Sync {
    fn name(&self) -> &'static str;

    /// Apply per-measure configuration. Called once, before any `compare`.
    fn configure(&mut self, _config: &MeasureConfig) {}

    /// Pure, total function over the input domain. NaN/infinity results
    /// are valid and stored verbatim (`spec.md` §7 "Measure arithmetic").
    fn compare(&self, x: &SimString, y: &SimString) -> f32;
}

/// A registered measure: a name plus a constructor, so the registry can
/// build a fresh, independently-configurable instance per `configure`
/// call.
pub struct MeasureEntry {
    pub name: &'static str,
    pub factory: fn() -> Box<dyn Measure>,
}

/// Name -> `(configure, compare)` dispatch table (`spec.md` §4.E).
#[derive(Default)]
pub struct MeasureRegistry {
    entries: Vec<MeasureEntry>,
    active: Option<Box<dyn Measure>>,
}

impl MeasureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, entry: MeasureEntry) {
        self.entries.push(entry);
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.name)
    }

    fn find(&self, name: &str) -> Option<&MeasureEntry> {
        self.entries.iter().find(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// Select and configure a measure by name. Unknown names warn and fall
    /// back to [`DEFAULT_MEASURE`] (`spec.md` §4.E, §7).
    pub fn configure(&mut self, name: &str, config: &MeasureConfig) {
        let entry = match self.find(name) {
            Some(entry) => entry,
            None => {
                tracing::warn!(requested = name, fallback = DEFAULT_MEASURE, "unknown measure, falling back");
                self.find(DEFAULT_MEASURE)
                    .expect("default measure must be registered")
            }
        };

        let mut measure = (entry.factory)();
        measure.configure(config);
        self.active = Some(measure);
    }

    pub fn active_name(&self) -> Option<&'static str> {
        self.active.as_ref().map(|m| m.name())
    }

    /// Invoke the active measure. Panics if [`Self::configure`] was never
    /// called — a programming error in the caller, not a runtime
    /// condition the spec models as recoverable.
    pub fn compare(&self, x: &SimString, y: &SimString) -> f32 {
        self.active
            .as_ref()
            .expect("MeasureRegistry::configure must be called before compare")
            .compare(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ConstMeasure(f32);
    impl Measure for ConstMeasure {
        fn name(&self) -> &'static str {
            "const"
        }
        fn compare(&self, _x: &SimString, _y: &SimString) -> f32 {
            self.0
        }
    }

    fn registry() -> MeasureRegistry {
        let mut r = MeasureRegistry::new();
        r.register(MeasureEntry {
            name: "levenshtein",
            factory: || Box::new(ConstMeasure(1.0)),
        });
        r.register(MeasureEntry {
            name: "const2",
            factory: || Box::new(ConstMeasure(2.0)),
        });
        r
    }

    #[test]
    fn falls_back_to_default_on_unknown_name() {
        let mut r = registry();
        r.configure("nonexistent", &MeasureConfig::new());
        assert_eq!(r.active_name(), Some("levenshtein"));
    }

    #[test]
    fn selects_requested_measure() {
        let mut r = registry();
        r.configure("const2", &MeasureConfig::new());
        assert_eq!(r.active_name(), Some("const2"));
    }

    #[test]
    fn name_lookup_is_case_insensitive() {
        let mut r = registry();
        r.configure("CONST2", &MeasureConfig::new());
        assert_eq!(r.active_name(), Some("const2"));
    }
}
