//! Engine crate: hashing, string payloads, delimiter tables, tokenization,
//! packed matrix storage and the parallel compute loop. Concrete measures
//! (`strmatrix-measures`) and I/O adapters (`strmatrix-io`) build on top of
//! this crate's public types.

pub mod compute;
pub mod delim;
pub mod error;
pub mod hash;
pub mod matrix;
pub mod measure;
pub mod progress;
pub mod string;
pub mod tokenizer;

pub use compute::{compute, ComputeOptions, ComputeOutcome};
pub use error::{HarryError, Result};
pub use matrix::{parse_range, Matrix, Range};
pub use measure::{Measure, MeasureConfig, MeasureEntry, MeasureRegistry, DEFAULT_MEASURE};
pub use progress::{NullSink, ProgressSink};
pub use string::{Payload, SimString};
