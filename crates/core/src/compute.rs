//! Parallel matrix-fill loop (`spec.md` §4.G, §5).
//!
//! Grounded on `original_source/src/hmatrix.c`'s `hmatrix_compute`: a
//! `collapse(2)` loop over `[0, xl) x [0, yl)` with absolute indices derived
//! by adding the range offsets, a triangular skip, and a single critical
//! section around progress/log bookkeeping that never wraps the measure
//! call itself. The OpenMP loop becomes a `rayon` parallel iterator; the
//! disjoint-write argument from `spec.md` §5 ("no locking required on the
//! hot path") is realized with one small `unsafe` scatter, the same scale
//! of unsafe block the teacher NIF used for its zero-copy token spans.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;

use parking_lot::Mutex;
use rayon::prelude::*;

use crate::matrix::{pack_index, Matrix};
use crate::measure::MeasureRegistry;
use crate::progress::ProgressSink;
use crate::string::SimString;

/// How the compute loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputeOutcome {
    Completed,
    Cancelled,
}

/// Reporting/cancellation knobs for one [`compute`] call.
pub struct ComputeOptions<'a> {
    pub verbose: bool,
    pub log_enabled: bool,
    pub sink: &'a dyn ProgressSink,
    pub cancel: &'a AtomicBool,
}

struct ThrottleState {
    ts1: Instant,
    ts2: Instant,
}

/// A raw scatter target for the matrix's backing storage.
///
/// Safety: every index passed to [`Self::write`] is produced by
/// [`pack_index`] over the compute loop's iteration space, which is a
/// bijection (rectangular) or injective-up-to-symmetry (triangular) map —
/// no two concurrently running loop steps ever write the same index.
struct Scatter {
    ptr: *mut f32,
    len: usize,
}

unsafe impl Send for Scatter {}
unsafe impl Sync for Scatter {}

impl Scatter {
    unsafe fn write(&self, idx: usize, value: f32) {
        debug_assert!(idx < self.len);
        *self.ptr.add(idx) = value;
    }
}

/// Fill `matrix` by calling `registry`'s active measure over every pair in
/// its active ranges (`spec.md` §4.G). `matrix` must already be allocated.
pub fn compute(
    matrix: &mut Matrix,
    batch: &[SimString],
    registry: &MeasureRegistry,
    options: &ComputeOptions,
) -> ComputeOutcome {
    let x_i = matrix.x.i;
    let y_i = matrix.y.i;
    let xl = matrix.x.len();
    let yl = matrix.y.len();
    let triangular = matrix.triangular;
    let size = matrix.size;

    let scatter = Scatter {
        ptr: matrix.values.as_mut_ptr(),
        len: matrix.values.len(),
    };

    let done = AtomicUsize::new(0);
    let step = size / 100 + 1;
    let report = options.verbose || options.log_enabled;
    let throttle = Mutex::new(ThrottleState {
        ts1: Instant::now(),
        ts2: Instant::now(),
    });
    let cancelled = AtomicBool::new(false);

    (0..xl).into_par_iter().for_each(|i| {
        if cancelled.load(Ordering::Relaxed) {
            return;
        }

        for j in 0..yl {
            let xi = i + x_i;
            let yi = j + y_i;

            if triangular && yi > xi {
                continue;
            }

            if options.cancel.load(Ordering::Relaxed) {
                cancelled.store(true, Ordering::Relaxed);
                return;
            }

            let value = registry.compare(&batch[xi], &batch[yi]);
            let idx = pack_index(xi, yi, x_i, y_i, xl, triangular);
            // Safety: see `Scatter`'s invariant above.
            unsafe { scatter.write(idx, value) };

            let k = done.fetch_add(1, Ordering::Relaxed) + 1;

            if report {
                let mut state = throttle.lock();
                let now = Instant::now();
                if options.verbose && (k % step == 0 || now.duration_since(state.ts1).as_secs_f64() > 0.1)
                {
                    options.sink.on_progress(k, size);
                    state.ts1 = now;
                }
                if options.log_enabled && now.duration_since(state.ts2).as_secs_f64() > 60.0 {
                    options.sink.on_log(k, size);
                    // Pair fingerprint for correlating log lines across
                    // split/sharded runs of the same logical matrix
                    // (`spec.md` §4.A: "hash whole strings and string
                    // pairs for caches or splitters").
                    tracing::trace!(
                        pair_hash = batch[xi].hash2(&batch[yi]),
                        xi,
                        yi,
                        "compute checkpoint"
                    );
                    state.ts2 = now;
                }
            }
        }
    });

    if cancelled.load(Ordering::Relaxed) {
        return ComputeOutcome::Cancelled;
    }

    if options.verbose {
        options.sink.on_progress(size, size);
    }
    if options.log_enabled {
        options.sink.on_log(size, size);
    }

    ComputeOutcome::Completed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::{Measure, MeasureConfig, MeasureEntry};
    use crate::progress::NullSink;

    struct Identity;
    impl Measure for Identity {
        fn name(&self) -> &'static str {
            "identity"
        }
        fn compare(&self, x: &SimString, y: &SimString) -> f32 {
            if x.idx == y.idx {
                0.0
            } else {
                1.0
            }
        }
    }

    fn batch(n: usize) -> Vec<SimString> {
        (0..n)
            .map(|i| SimString::from_bytes(None, None, i as u64, vec![b'a']))
            .collect()
    }

    fn registry() -> MeasureRegistry {
        let mut r = MeasureRegistry::new();
        r.register(MeasureEntry {
            name: "identity",
            factory: || Box::new(Identity),
        });
        r.configure("identity", &MeasureConfig::new());
        r
    }

    #[test]
    fn fills_every_pair_in_triangular_matrix() {
        let b = batch(4);
        let mut m = Matrix::init(&b);
        m.allocate();
        let r = registry();
        let cancel = AtomicBool::new(false);
        let sink = NullSink;
        let options = ComputeOptions {
            verbose: false,
            log_enabled: false,
            sink: &sink,
            cancel: &cancel,
        };

        let outcome = compute(&mut m, &b, &r, &options);
        assert_eq!(outcome, ComputeOutcome::Completed);

        for x in 0..4 {
            for y in 0..=x {
                let expected = if x == y { 0.0 } else { 1.0 };
                assert_eq!(m.get(x, y), expected);
            }
        }
    }

    #[test]
    fn respects_cancellation() {
        let b = batch(200);
        let mut m = Matrix::init(&b);
        m.allocate();
        let r = registry();
        let cancel = AtomicBool::new(true);
        let sink = NullSink;
        let options = ComputeOptions {
            verbose: false,
            log_enabled: false,
            sink: &sink,
            cancel: &cancel,
        };

        let outcome = compute(&mut m, &b, &r, &options);
        assert_eq!(outcome, ComputeOutcome::Cancelled);
    }
}
