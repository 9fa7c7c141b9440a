//! Shared view of a [`SimString`] as a sequence of comparable symbols.
//!
//! Byte and token payloads need the same generic algorithms (edit
//! distance, alignment, bag counting). Rather than duplicate each
//! algorithm per payload kind, every measure in this crate normalizes
//! both variants to a `&[u64]` symbol sequence first and operates on
//! that alone.

use strmatrix_core::SimString;

/// `s`'s payload as a sequence of `u64` symbols: tokens verbatim, or
/// bytes widened losslessly.
pub fn symbols(s: &SimString) -> Vec<u64> {
    if let Some(tokens) = s.tokens() {
        tokens.to_vec()
    } else {
        s.bytes()
            .unwrap_or(&[])
            .iter()
            .map(|&b| b as u64)
            .collect()
    }
}
