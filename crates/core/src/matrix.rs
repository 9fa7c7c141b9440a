//! Packed triangular/rectangular matrix (`spec.md` §3, §4.F).
//!
//! Grounded directly on `original_source/src/hmatrix.c`. That file has a
//! known bug the spec calls out: `hmatrix_get` computes its row-base offset
//! with `m->x.n - m->y.i` while `hmatrix_set` uses `m->x.n - m->x.i`. Both
//! accessors here share one private indexing function, using the `set`
//! formula, so the two can never drift apart again.

use crate::error::{HarryError, Result};
use crate::string::SimString;

/// A half-open index interval `[i, n)` (`spec.md` §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub i: usize,
    pub n: usize,
}

impl Range {
    pub fn full(n: usize) -> Self {
        Self { i: 0, n }
    }

    pub fn len(&self) -> usize {
        self.n - self.i
    }

    pub fn is_empty(&self) -> bool {
        self.n <= self.i
    }
}

/// Parse a range spec of the form `"a:b"` (`spec.md` §6, property 3).
///
/// A missing side defaults to `0`/`n`; a negative right side means `n +
/// value`. Any parse failure or invariant violation reverts to the full
/// `[0, n)` range and returns `Err` so the caller can log a warning
/// (`spec.md` §7: range errors are a `Usage` warning, never fatal).
pub fn parse_range(spec: &str, n: usize) -> Result<Range> {
    let full = Range::full(n);
    if spec.is_empty() {
        return Ok(full);
    }

    let Some((left, right)) = spec.split_once(':') else {
        return Err(HarryError::Usage(format!("invalid range string '{spec}'")));
    };

    let i: i64 = if left.is_empty() {
        0
    } else {
        left.parse()
            .map_err(|_| HarryError::Usage(format!("could not parse range '{spec}'")))?
    };

    let mut end: i64 = if right.is_empty() {
        n as i64
    } else {
        right
            .parse()
            .map_err(|_| HarryError::Usage(format!("could not parse range '{spec}'")))?
    };

    if end < 0 {
        end += n as i64;
    }

    if i < 0 || end < 0 || end > n as i64 || i >= end {
        return Err(HarryError::Usage(format!(
            "invalid range '{spec}', reverting to full range"
        )));
    }

    Ok(Range {
        i: i as usize,
        n: end as usize,
    })
}

/// Parse a `"blocks:index"` split spec (`spec.md` §6).
fn parse_split(spec: &str) -> Result<(usize, usize)> {
    let Some((blocks_str, index_str)) = spec.split_once(':') else {
        return Err(HarryError::Fatal(format!("invalid split string '{spec}'")));
    };
    let blocks: i64 = blocks_str
        .parse()
        .map_err(|_| HarryError::Fatal(format!("invalid split string '{spec}'")))?;
    let index: i64 = index_str
        .parse()
        .map_err(|_| HarryError::Fatal(format!("invalid split string '{spec}'")))?;
    if blocks <= 0 || index < 0 {
        return Err(HarryError::Fatal(format!("invalid split string '{spec}'")));
    }
    Ok((blocks as usize, index as usize))
}

/// The packed similarity/distance matrix (`spec.md` §3, §4.F).
pub struct Matrix {
    pub num: usize,
    pub x: Range,
    pub y: Range,
    pub triangular: bool,
    pub size: usize,
    pub values: Vec<f32>,
    pub labels: Vec<Option<f32>>,
    pub srcs: Vec<Option<String>>,
}

impl Matrix {
    /// Capture `N`, labels and sources from the batch. Ranges default to
    /// full, `triangular` defaults to true, `values` is not yet allocated
    /// (`spec.md` §4.F: "Allocation: `allocate()`...").
    pub fn init(batch: &[SimString]) -> Self {
        let num = batch.len();
        Self {
            num,
            x: Range::full(num),
            y: Range::full(num),
            triangular: true,
            size: 0,
            values: Vec::new(),
            labels: batch.iter().map(|s| s.label).collect(),
            srcs: batch.iter().map(|s| s.src.clone()).collect(),
        }
    }

    pub fn set_x_range(&mut self, spec: &str) -> Result<()> {
        match parse_range(spec, self.num) {
            Ok(r) => {
                self.x = r;
                Ok(())
            }
            Err(e) => {
                self.x = Range::full(self.num);
                Err(e)
            }
        }
    }

    pub fn set_y_range(&mut self, spec: &str) -> Result<()> {
        match parse_range(spec, self.num) {
            Ok(r) => {
                self.y = r;
                Ok(())
            }
            Err(e) => {
                self.y = Range::full(self.num);
                Err(e)
            }
        }
    }

    /// Narrow the y-range to one of `blocks` equal-height horizontal
    /// strips (`spec.md` §4.F, §8 property 4). Fatal on out-of-range
    /// parameters, matching `original_source`'s `hmatrix_split`.
    pub fn split(&mut self, spec: &str) -> Result<()> {
        let (blocks, index) = parse_split(spec)?;
        let y_height = self.y.len();

        if blocks > y_height {
            return Err(HarryError::Fatal(format!(
                "invalid number of blocks ({blocks})"
            )));
        }
        let height = y_height.div_ceil(blocks);
        if height == 0 {
            return Err(HarryError::Fatal(format!("block height too small ({height})")));
        }
        if index >= blocks {
            return Err(HarryError::Fatal(format!("block index out of range ({index})")));
        }

        let new_i = self.y.i + index * height;
        let new_n = self.y.n.min(self.y.i + (index + 1) * height);
        self.y = Range {
            i: new_i,
            n: new_n,
        };
        Ok(())
    }

    /// Set `triangular` and `size`, then zero-initialize `values`
    /// (`spec.md` §4.F).
    pub fn allocate(&mut self) {
        self.triangular = self.x == self.y;
        let xl = self.x.len();
        let yl = self.y.len();

        self.size = if self.triangular {
            xl * (xl + 1) / 2
        } else {
            xl * yl
        };
        self.values = vec![0.0; self.size];
    }

    /// Shared indexing formula used by both [`Self::set`] and
    /// [`Self::get`] (`spec.md` §4.F, Design Note on the `get`/`set`
    /// asymmetry bug).
    fn index(&self, x: usize, y: usize) -> usize {
        pack_index(x, y, self.x.i, self.y.i, self.x.len(), self.triangular)
    }

    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        let idx = self.index(x, y);
        debug_assert!(idx < self.size, "matrix index {idx} out of bounds ({})", self.size);
        self.values[idx] = value;
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        let idx = self.index(x, y);
        debug_assert!(idx < self.size, "matrix index {idx} out of bounds ({})", self.size);
        self.values[idx]
    }
}

/// Free-standing form of the packing formula, reusable by the compute
/// engine without holding a borrow of the `Matrix` itself. `set` and `get`
/// both route through this single function so they can never diverge the
/// way `original_source/src/hmatrix.c`'s did.
pub(crate) fn pack_index(x: usize, y: usize, x_i: usize, y_i: usize, xl: usize, triangular: bool) -> usize {
    let a = x - x_i;
    let b = y - y_i;

    if triangular {
        let (i, j) = if a > b { (b, a) } else { (a, b) };
        (j - i) + i * xl - i * (i.saturating_sub(1)) / 2
    } else {
        a + b * xl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(n: usize) -> Vec<SimString> {
        (0..n)
            .map(|i| SimString::from_bytes(None, None, i as u64, vec![b'a']))
            .collect()
    }

    #[test]
    fn parse_range_matches_property_table() {
        assert_eq!(parse_range("", 10).unwrap(), Range { i: 0, n: 10 });
        assert_eq!(parse_range(":", 10).unwrap(), Range { i: 0, n: 10 });
        assert_eq!(parse_range("3:", 10).unwrap(), Range { i: 3, n: 10 });
        assert_eq!(parse_range(":5", 10).unwrap(), Range { i: 0, n: 5 });
        assert_eq!(parse_range("2:-1", 10).unwrap(), Range { i: 2, n: 9 });
        assert!(parse_range("7:3", 10).is_err());
    }

    #[test]
    fn triangular_packing_is_bijective() {
        let batch = strings(4);
        let mut m = Matrix::init(&batch);
        m.allocate();
        assert_eq!(m.size, 4 * 5 / 2);

        let mut seen = vec![false; m.size];
        for x in 0..4 {
            for y in 0..=x {
                let idx = m.index(x, y);
                assert!(idx < m.size);
                assert!(!seen[idx], "index {idx} reused by ({x},{y})");
                seen[idx] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn set_then_get_symmetric_round_trip() {
        let batch = strings(5);
        let mut m = Matrix::init(&batch);
        m.allocate();

        for x in 0..5 {
            for y in 0..=x {
                m.set(x, y, (x * 10 + y) as f32);
            }
        }
        for x in 0..5 {
            for y in 0..=x {
                let v = (x * 10 + y) as f32;
                assert_eq!(m.get(x, y), v);
                assert_eq!(m.get(y, x), v, "asymmetric read for ({x},{y})");
            }
        }
    }

    #[test]
    fn non_triangular_rectangle_no_mirroring() {
        let batch = strings(3);
        let mut m = Matrix::init(&batch);
        m.set_x_range("0:2").unwrap();
        m.set_y_range("1:3").unwrap();
        m.allocate();

        assert!(!m.triangular);
        assert_eq!(m.size, 4);

        m.set(0, 1, 1.0);
        m.set(0, 2, 2.0);
        m.set(1, 1, 3.0);
        m.set(1, 2, 4.0);

        assert_eq!(m.get(0, 1), 1.0);
        assert_eq!(m.get(0, 2), 2.0);
        assert_eq!(m.get(1, 1), 3.0);
        assert_eq!(m.get(1, 2), 4.0);
    }

    #[test]
    fn split_disjoint_cover() {
        let batch = strings(10);
        let mut base = Matrix::init(&batch);
        base.set_y_range("0:10").unwrap();

        let mut covered = vec![false; 10];
        for index in 0..2 {
            let mut m = Matrix::init(&batch);
            m.set_y_range("0:10").unwrap();
            m.split(&format!("2:{index}")).unwrap();
            for y in m.y.i..m.y.n {
                assert!(!covered[y], "index {y} covered twice");
                covered[y] = true;
            }
        }
        assert!(covered.iter().all(|&c| c));
    }

    #[test]
    fn split_examples_from_spec() {
        let batch = strings(10);
        let mut m0 = Matrix::init(&batch);
        m0.set_y_range("0:10").unwrap();
        m0.split("2:0").unwrap();
        assert_eq!(m0.y, Range { i: 0, n: 5 });

        let mut m1 = Matrix::init(&batch);
        m1.set_y_range("0:10").unwrap();
        m1.split("2:1").unwrap();
        assert_eq!(m1.y, Range { i: 5, n: 10 });
    }

    #[test]
    fn split_rejects_out_of_range_blocks() {
        let batch = strings(4);
        let mut m = Matrix::init(&batch);
        assert!(m.split("0:0").is_err());
        assert!(m.split("100:0").is_err());
        assert!(m.split("2:5").is_err());
    }
}
