//! Concrete measures for `strmatrix-core`'s registry (`spec.md` §3,
//! "implementing them is a separable exercise" — this crate is that
//! exercise). Four families, matching the registry's minimum
//! requirement: edit distances, global/local alignment, bag/set
//! coefficients, and kernels.

pub mod align;
pub mod coefficient;
pub mod edit;
pub mod kernel;
mod symbols;

use strmatrix_core::{MeasureEntry, MeasureRegistry};

/// Register every measure this crate provides into `registry`. The CLI
/// calls this once at startup, before `MeasureRegistry::configure`.
pub fn register_all(registry: &mut MeasureRegistry) {
    registry.register(MeasureEntry {
        name: "hamming",
        factory: || Box::new(edit::Hamming),
    });
    registry.register(MeasureEntry {
        name: "levenshtein",
        factory: || Box::new(edit::Levenshtein),
    });
    registry.register(MeasureEntry {
        name: "damerau-levenshtein",
        factory: || Box::new(edit::DamerauLevenshtein),
    });
    registry.register(MeasureEntry {
        name: "osa",
        factory: || Box::new(edit::Osa),
    });
    registry.register(MeasureEntry {
        name: "jaro",
        factory: || Box::new(edit::Jaro::default()),
    });
    registry.register(MeasureEntry {
        name: "jaro-winkler",
        factory: || Box::new(edit::JaroWinkler::default()),
    });
    registry.register(MeasureEntry {
        name: "lee",
        factory: || Box::new(edit::Lee::default()),
    });

    registry.register(MeasureEntry {
        name: "needleman-wunsch",
        factory: || Box::new(align::NeedlemanWunsch::default()),
    });
    registry.register(MeasureEntry {
        name: "smith-waterman",
        factory: || Box::new(align::SmithWaterman::default()),
    });

    registry.register(MeasureEntry {
        name: "jaccard",
        factory: coefficient::jaccard,
    });
    registry.register(MeasureEntry {
        name: "simpson",
        factory: coefficient::simpson,
    });
    registry.register(MeasureEntry {
        name: "braun",
        factory: coefficient::braun,
    });
    registry.register(MeasureEntry {
        name: "dice",
        factory: coefficient::dice,
    });
    registry.register(MeasureEntry {
        name: "sokal",
        factory: coefficient::sokal,
    });
    registry.register(MeasureEntry {
        name: "kulczynski",
        factory: coefficient::kulczynski,
    });
    registry.register(MeasureEntry {
        name: "otsuka",
        factory: coefficient::otsuka,
    });

    registry.register(MeasureEntry {
        name: "spectrum",
        factory: || Box::new(kernel::Spectrum::default()),
    });
    registry.register(MeasureEntry {
        name: "subsequence",
        factory: || Box::new(kernel::Subsequence::default()),
    });
    registry.register(MeasureEntry {
        name: "bag",
        factory: || Box::new(kernel::Bag),
    });
    registry.register(MeasureEntry {
        name: "distance-substitution",
        factory: || Box::new(kernel::DistanceSubstitution::default()),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use strmatrix_core::MeasureConfig;

    #[test]
    fn registers_every_family_member() {
        let mut registry = MeasureRegistry::new();
        register_all(&mut registry);
        let names: Vec<&str> = registry.names().collect();

        for expected in [
            "hamming",
            "levenshtein",
            "damerau-levenshtein",
            "osa",
            "jaro",
            "jaro-winkler",
            "lee",
            "needleman-wunsch",
            "smith-waterman",
            "jaccard",
            "simpson",
            "braun",
            "dice",
            "sokal",
            "kulczynski",
            "otsuka",
            "spectrum",
            "subsequence",
            "bag",
            "distance-substitution",
        ] {
            assert!(names.contains(&expected), "missing measure '{expected}'");
        }
    }

    #[test]
    fn default_falls_back_to_levenshtein() {
        let mut registry = MeasureRegistry::new();
        register_all(&mut registry);
        registry.configure("does-not-exist", &MeasureConfig::new());
        assert_eq!(registry.active_name(), Some("levenshtein"));
    }
}
