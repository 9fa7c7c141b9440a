//! Edit-distance family (`spec.md` §3 registry families: "edit distances
//! (Hamming, Levenshtein, Damerau–Levenshtein, OSA, Jaro, Jaro–Winkler,
//! Lee)").
//!
//! Byte payloads run through `triple_accel`'s SIMD kernels, the same
//! crate the teacher NIF used for its character metric fast path
//! (`char_similarity`'s Hamming-window-then-SIMD-Levenshtein cascade).
//! Token payloads fall back to a plain `u64`-generic DP, since
//! `triple_accel` only operates on bytes.

use strmatrix_core::{Measure, MeasureConfig, SimString};

use crate::symbols::symbols;

/// Count of differing positions over the common prefix, plus one
/// mismatch per byte of length difference (`spec.md`'s generalized
/// Hamming distance over unequal-length inputs).
pub struct Hamming;

impl Measure for Hamming {
    fn name(&self) -> &'static str {
        "hamming"
    }

    fn compare(&self, x: &SimString, y: &SimString) -> f32 {
        match (x.bytes(), y.bytes()) {
            (Some(a), Some(b)) if a.len() == b.len() && !a.is_empty() => {
                triple_accel::hamming::hamming(a, b) as f32
            }
            // Unequal lengths or a token payload fall through to the
            // length-penalized generic path below; `triple_accel`'s SIMD
            // kernel only handles equal-length byte buffers.
            _ => {
                let a = symbols(x);
                let b = symbols(y);
                let common = a.len().min(b.len());
                let mismatches = a[..common]
                    .iter()
                    .zip(&b[..common])
                    .filter(|(p, q)| p != q)
                    .count();
                (mismatches + a.len().max(b.len()) - common) as f32
            }
        }
    }
}

/// Classic Levenshtein edit distance (insert/delete/substitute, unit
/// cost). Bytes run through `triple_accel`'s banded SIMD kernel; tokens
/// use a plain two-row DP.
pub struct Levenshtein;

impl Measure for Levenshtein {
    fn name(&self) -> &'static str {
        "levenshtein"
    }

    fn compare(&self, x: &SimString, y: &SimString) -> f32 {
        match (x.bytes(), y.bytes()) {
            (Some(a), Some(b)) => {
                // `k` bounds the SIMD band; the true edit distance can never
                // exceed the longer input's length, so this `k` always
                // yields `Some`.
                let k = a.len().max(b.len()) as u32;
                triple_accel::levenshtein::levenshtein_simd_k(a, b, k)
                    .expect("k bound guarantees a result") as f32
            }
            _ => levenshtein_generic(&symbols(x), &symbols(y)) as f32,
        }
    }
}

fn levenshtein_generic(a: &[u64], b: &[u64]) -> usize {
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, &ai) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bj) in b.iter().enumerate() {
            let cost = if ai == bj { 0 } else { 1 };
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Optimal String Alignment distance: Levenshtein plus adjacent
/// transpositions, but (unlike true Damerau–Levenshtein) each substring
/// may be edited at most once.
pub struct Osa;

impl Measure for Osa {
    fn name(&self) -> &'static str {
        "osa"
    }

    fn compare(&self, x: &SimString, y: &SimString) -> f32 {
        let a = symbols(x);
        let b = symbols(y);
        osa_distance(&a, &b) as f32
    }
}

fn osa_distance(a: &[u64], b: &[u64]) -> usize {
    let (n, m) = (a.len(), b.len());
    let mut d = vec![vec![0usize; m + 1]; n + 1];
    for i in 0..=n {
        d[i][0] = i;
    }
    for j in 0..=m {
        d[0][j] = j;
    }
    for i in 1..=n {
        for j in 1..=m {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            d[i][j] = (d[i - 1][j] + 1)
                .min(d[i][j - 1] + 1)
                .min(d[i - 1][j - 1] + cost);
            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                d[i][j] = d[i][j].min(d[i - 2][j - 2] + cost);
            }
        }
    }
    d[n][m]
}

/// True Damerau–Levenshtein distance: arbitrary-distance transpositions
/// are allowed, tracked with the standard "last seen at" bookkeeping.
pub struct DamerauLevenshtein;

impl Measure for DamerauLevenshtein {
    fn name(&self) -> &'static str {
        "damerau-levenshtein"
    }

    fn compare(&self, x: &SimString, y: &SimString) -> f32 {
        let a = symbols(x);
        let b = symbols(y);
        damerau_distance(&a, &b) as f32
    }
}

fn damerau_distance(a: &[u64], b: &[u64]) -> usize {
    use rustc_hash::FxHashMap;

    let (n, m) = (a.len(), b.len());
    let max_dist = n + m;
    let mut d = vec![vec![0usize; m + 2]; n + 2];
    d[0][0] = max_dist;
    for i in 0..=n {
        d[i + 1][0] = max_dist;
        d[i + 1][1] = i;
    }
    for j in 0..=m {
        d[0][j + 1] = max_dist;
        d[1][j + 1] = j;
    }

    let mut last_row: FxHashMap<u64, usize> = FxHashMap::default();
    for i in 1..=n {
        let mut last_match_col = 0;
        for j in 1..=m {
            let i2 = *last_row.get(&b[j - 1]).unwrap_or(&0);
            let j2 = last_match_col;
            let cost = if a[i - 1] == b[j - 1] {
                last_match_col = j;
                0
            } else {
                1
            };

            let subst = d[i][j] + cost;
            let insert = d[i + 1][j] + 1;
            let delete = d[i][j + 1] + 1;
            let transpose = d[i2][j2] + (i - i2 - 1) + 1 + (j - j2 - 1);

            d[i + 1][j + 1] = subst.min(insert).min(delete).min(transpose);
        }
        last_row.insert(a[i - 1], i);
    }

    d[n + 1][m + 1]
}

/// Jaro similarity, rescaled here into a distance (`1 - similarity`) so
/// every edit-family measure shares the convention "lower is more
/// similar". `configure`-able as a similarity via the `as_similarity`
/// key for callers that want the raw Jaro score.
pub struct Jaro {
    as_similarity: bool,
}

impl Default for Jaro {
    fn default() -> Self {
        Self {
            as_similarity: false,
        }
    }
}

impl Measure for Jaro {
    fn name(&self) -> &'static str {
        "jaro"
    }

    fn configure(&mut self, config: &MeasureConfig) {
        self.as_similarity = config.get("as_similarity", 0.0) != 0.0;
    }

    fn compare(&self, x: &SimString, y: &SimString) -> f32 {
        let sim = jaro_similarity(&symbols(x), &symbols(y));
        if self.as_similarity {
            sim
        } else {
            1.0 - sim
        }
    }
}

pub(crate) fn jaro_similarity(a: &[u64], b: &[u64]) -> f32 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let window = (a.len().max(b.len()) / 2).saturating_sub(1);
    let mut a_matched = vec![false; a.len()];
    let mut b_matched = vec![false; b.len()];
    let mut matches = 0usize;

    for (i, ai) in a.iter().enumerate() {
        let lo = i.saturating_sub(window);
        let hi = (i + window + 1).min(b.len());
        for j in lo..hi {
            if !b_matched[j] && *ai == b[j] {
                a_matched[i] = true;
                b_matched[j] = true;
                matches += 1;
                break;
            }
        }
    }

    if matches == 0 {
        return 0.0;
    }

    let mut transpositions = 0usize;
    let mut bi = 0;
    for (i, &matched) in a_matched.iter().enumerate() {
        if !matched {
            continue;
        }
        while !b_matched[bi] {
            bi += 1;
        }
        if a[i] != b[bi] {
            transpositions += 1;
        }
        bi += 1;
    }
    let transpositions = transpositions / 2;

    let m = matches as f32;
    (m / a.len() as f32 + m / b.len() as f32 + (m - transpositions as f32) / m) / 3.0
}

/// Jaro–Winkler: Jaro similarity boosted by a common-prefix bonus,
/// rescaled to a distance like [`Jaro`].
pub struct JaroWinkler {
    prefix_weight: f32,
    as_similarity: bool,
}

impl Default for JaroWinkler {
    fn default() -> Self {
        Self {
            prefix_weight: 0.1,
            as_similarity: false,
        }
    }
}

impl Measure for JaroWinkler {
    fn name(&self) -> &'static str {
        "jaro-winkler"
    }

    fn configure(&mut self, config: &MeasureConfig) {
        self.prefix_weight = config.get("prefix_weight", 0.1) as f32;
        self.as_similarity = config.get("as_similarity", 0.0) != 0.0;
    }

    fn compare(&self, x: &SimString, y: &SimString) -> f32 {
        let a = symbols(x);
        let b = symbols(y);
        let jaro = jaro_similarity(&a, &b);

        let prefix = a
            .iter()
            .zip(b.iter())
            .take(4)
            .take_while(|(p, q)| p == q)
            .count() as f32;

        let sim = jaro + prefix * self.prefix_weight * (1.0 - jaro);
        if self.as_similarity {
            sim
        } else {
            1.0 - sim
        }
    }
}

/// Lee distance: a circular per-position distance over a bounded
/// alphabet, summed across the common length and penalized for the
/// trailing length difference (`original_source/src/measures/dist_lee.h`).
/// The alphabet size (`quantization`) is configurable; it defaults to
/// 256, matching a plain byte alphabet.
pub struct Lee {
    quantization: u64,
}

impl Default for Lee {
    fn default() -> Self {
        Self { quantization: 256 }
    }
}

impl Measure for Lee {
    fn name(&self) -> &'static str {
        "lee"
    }

    fn configure(&mut self, config: &MeasureConfig) {
        self.quantization = config.get_usize("quantization", 256).max(1) as u64;
    }

    fn compare(&self, x: &SimString, y: &SimString) -> f32 {
        let a = symbols(x);
        let b = symbols(y);
        let q = self.quantization;
        let common = a.len().min(b.len());

        let aligned: u64 = a[..common]
            .iter()
            .zip(&b[..common])
            .map(|(&p, &r)| {
                let d = p.abs_diff(r) % q;
                d.min(q - d)
            })
            .sum();

        let tail_penalty = (a.len().max(b.len()) - common) as u64 * (q / 2);
        (aligned + tail_penalty) as f32
    }
}
