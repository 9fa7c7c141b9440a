//! Renderer-agnostic progress/logging hook for the compute engine
//! (`spec.md` §4.G). Kept separate from any concrete rendering so the core
//! stays free of progress-bar dependencies, per `spec.md` §1's "logging and
//! progress-bar rendering primitives" out-of-scope note; the CLI binary
//! supplies an `indicatif`-backed implementation.

/// Receives throttled progress and log callbacks from [`crate::compute`].
pub trait ProgressSink: Send + Sync {
    /// Called at most once per 1% of the total and at most every 100ms.
    fn on_progress(&self, done: usize, total: usize);

    /// Called at most once every 60 seconds, only when log-line reporting
    /// is enabled.
    fn on_log(&self, done: usize, total: usize);
}

/// A sink that discards every callback; used when neither `--verbose` nor
/// periodic logging is requested.
pub struct NullSink;

impl ProgressSink for NullSink {
    fn on_progress(&self, _done: usize, _total: usize) {}
    fn on_log(&self, _done: usize, _total: usize) {}
}
