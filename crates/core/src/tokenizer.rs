//! Byte-string to token-string conversion (`spec.md` §4.D).
//!
//! Grounded on `original_source/src/str.c`'s `str_symbolize`: collapse runs
//! of delimiter bytes to one canonical byte, then hash each maximal
//! non-delimiter run into a token. The token buffer starts on the stack via
//! `SmallVec`, the same stack-first approach the teacher NIF used for its
//! whitespace-split token vectors, since most inputs tokenize into a
//! handful of words.

use smallvec::SmallVec;

use crate::delim::DelimiterTable;
use crate::error::{HarryError, Result};
use crate::hash::hash_bytes;
use crate::string::{Payload, SimString};

/// Convert `s` from its `Bytes` payload to `Tokens` in place, using `table`
/// as the delimiter classification. Leaves `s` untouched if an error is
/// returned.
pub fn tokenize(s: &mut SimString, table: &DelimiterTable) -> Result<()> {
    if !table.is_set() {
        return Err(HarryError::Usage(
            "tokenization requested but delimiter table is not set".into(),
        ));
    }

    let bytes = s
        .bytes()
        .ok_or_else(|| HarryError::TypeMismatch("string is not in Bytes form".into()))?;

    let canonical = table
        .canonical()
        .expect("delimiter table reports set() with no flagged byte");

    // Collapse runs of delimiter bytes to a single canonical byte.
    let mut normalized = Vec::with_capacity(bytes.len());
    for &b in bytes {
        if table.is_delimiter(b) {
            if normalized.last() == Some(&canonical) {
                continue;
            }
            normalized.push(canonical);
        } else {
            normalized.push(b);
        }
    }

    // Extract maximal non-empty runs between canonical delimiters.
    let mut tokens: SmallVec<[u64; 32]> = SmallVec::new();
    let mut run_start: Option<usize> = None;
    for (i, &b) in normalized.iter().enumerate() {
        if b == canonical {
            if let Some(start) = run_start.take() {
                tokens.push(hash_bytes(&normalized[start..i]));
            }
        } else if run_start.is_none() {
            run_start = Some(i);
        }
    }
    if let Some(start) = run_start {
        tokens.push(hash_bytes(&normalized[start..]));
    }

    s.set_payload(Payload::Tokens(tokens.into_vec()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize_str(input: &str, delim_spec: &str) -> Vec<u64> {
        let mut table = DelimiterTable::new();
        table.set(delim_spec);
        let mut s = SimString::from_bytes(None, None, 0, input.as_bytes().to_vec());
        tokenize(&mut s, &table).unwrap();
        s.tokens().unwrap().to_vec()
    }

    #[test]
    fn collapses_runs_of_delimiters() {
        let padded = tokenize_str("  foo  bar  ", " ");
        let tight = tokenize_str("foo bar", " ");
        assert_eq!(padded, tight);
        assert_eq!(padded.len(), 2);
    }

    #[test]
    fn mixed_space_and_tab_runs_collapse() {
        let a = tokenize_str("foo \t bar\t\tbaz", " %09");
        assert_eq!(a.len(), 3);
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        assert!(tokenize_str("", " ").is_empty());
    }

    #[test]
    fn requires_set_table() {
        let table = DelimiterTable::new();
        let mut s = SimString::from_bytes(None, None, 0, b"foo bar".to_vec());
        assert!(tokenize(&mut s, &table).is_err());
    }

    #[test]
    fn rejects_non_byte_strings() {
        let mut table = DelimiterTable::new();
        table.set(" ");
        let mut s = SimString::from_tokens(None, None, 0, vec![1, 2]);
        assert!(tokenize(&mut s, &table).is_err());
    }
}
