//! Input readers and output writers around `strmatrix-core`'s types
//! (`spec.md` §4.H, §4.I).

pub mod input;
pub mod output;

pub use input::{DirInput, InputAdapter, LineInput};
pub use output::{open_output, OutputAdapter, DEFAULT_FORMAT};
