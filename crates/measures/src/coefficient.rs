//! Bag/set coefficient family (`spec.md` §3 registry families: "bag/set
//! coefficients (Jaccard, Simpson, Braun, Dice, Sokal, Kulczynski,
//! Otsuka)").
//!
//! Grounded on `original_source/src/measures/sim_coefficient.h`'s shared
//! `match_t { a, b, c }` accumulator (matching symbols, left mismatches,
//! right mismatches), computed once per pair and shared by every
//! coefficient in the family. Each measure returned here is a
//! similarity (higher is more similar), unlike the edit-distance family.

use rustc_hash::FxHashMap;

use strmatrix_core::{Measure, SimString};

use crate::symbols::symbols;

/// The multiset intersection/difference counts every coefficient in
/// this module is built from.
pub struct BagCounts {
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl BagCounts {
    /// Multiset intersection/difference over `x` and `y`'s symbol
    /// sequences. `a` is the intersection size, `b`/`c` are the sizes of
    /// each side's remainder after the intersection is removed.
    pub fn compute(x: &SimString, y: &SimString) -> Self {
        let xs = symbols(x);
        let ys = symbols(y);

        let mut counts_x: FxHashMap<u64, u32> = FxHashMap::default();
        for &s in &xs {
            *counts_x.entry(s).or_insert(0) += 1;
        }
        let mut counts_y: FxHashMap<u64, u32> = FxHashMap::default();
        for &s in &ys {
            *counts_y.entry(s).or_insert(0) += 1;
        }

        let mut intersection = 0u32;
        for (symbol, &cx) in &counts_x {
            let cy = *counts_y.get(symbol).unwrap_or(&0);
            intersection += cx.min(cy);
        }

        let a = intersection as f32;
        let b = xs.len() as f32 - a;
        let c = ys.len() as f32 - a;
        Self { a, b, c }
    }
}

fn bag_measure(name: &'static str, f: fn(&BagCounts) -> f32) -> Box<dyn Measure> {
    Box::new(CoefficientMeasure { name, f })
}

struct CoefficientMeasure {
    name: &'static str,
    f: fn(&BagCounts) -> f32,
}

impl Measure for CoefficientMeasure {
    fn name(&self) -> &'static str {
        self.name
    }

    fn compare(&self, x: &SimString, y: &SimString) -> f32 {
        let counts = BagCounts::compute(x, y);
        (self.f)(&counts)
    }
}

pub fn jaccard() -> Box<dyn Measure> {
    bag_measure("jaccard", |c| {
        if c.a + c.b + c.c == 0.0 {
            1.0
        } else {
            c.a / (c.a + c.b + c.c)
        }
    })
}

pub fn simpson() -> Box<dyn Measure> {
    bag_measure("simpson", |c| {
        let denom = (c.a + c.b).min(c.a + c.c);
        if denom == 0.0 {
            1.0
        } else {
            c.a / denom
        }
    })
}

pub fn braun() -> Box<dyn Measure> {
    bag_measure("braun", |c| {
        let denom = (c.a + c.b).max(c.a + c.c);
        if denom == 0.0 {
            1.0
        } else {
            c.a / denom
        }
    })
}

pub fn dice() -> Box<dyn Measure> {
    bag_measure("dice", |c| {
        if 2.0 * c.a + c.b + c.c == 0.0 {
            1.0
        } else {
            2.0 * c.a / (2.0 * c.a + c.b + c.c)
        }
    })
}

pub fn sokal() -> Box<dyn Measure> {
    bag_measure("sokal", |c| {
        if c.a + 2.0 * (c.b + c.c) == 0.0 {
            1.0
        } else {
            c.a / (c.a + 2.0 * (c.b + c.c))
        }
    })
}

pub fn kulczynski() -> Box<dyn Measure> {
    bag_measure("kulczynski", |c| {
        let left = if c.a + c.b == 0.0 { 1.0 } else { c.a / (c.a + c.b) };
        let right = if c.a + c.c == 0.0 { 1.0 } else { c.a / (c.a + c.c) };
        0.5 * (left + right)
    })
}

pub fn otsuka() -> Box<dyn Measure> {
    bag_measure("otsuka", |c| {
        let denom = ((c.a + c.b) * (c.a + c.c)).sqrt();
        if denom == 0.0 {
            1.0
        } else {
            c.a / denom
        }
    })
}
