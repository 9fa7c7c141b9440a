//! Process-wide delimiter table (`spec.md` §3, §4.C).
//!
//! A set-once, resettable global, mirroring `original_source/src/str.c`'s
//! file-scope `char delim[256]` array. Kept as a `parking_lot::RwLock`
//! behind a `OnceLock`, the same "lazily-initialized shared static" shape
//! the retrieved pack uses for cross-thread scanner state
//! (`DeltaDesigns-quicktag`'s `SCANNER_PROGRESS`).

use parking_lot::RwLock;
use std::sync::OnceLock;

/// 256-entry byte-class table plus the "uninitialized" sentinel from
/// `spec.md` §3 (kept as a separate bool rather than a magic byte value,
/// since Rust has no free bit to steal from `bool`).
#[derive(Debug, Clone)]
pub struct DelimiterTable {
    flags: [bool; 256],
    set: bool,
}

impl Default for DelimiterTable {
    fn default() -> Self {
        Self {
            flags: [false; 256],
            set: false,
        }
    }
}

impl DelimiterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initialize the table from a delimiter spec (`spec.md` §6): literal
    /// bytes plus `%HH` hex escapes. An empty spec is equivalent to
    /// [`Self::reset`]. Truncated trailing `%` sequences are ignored.
    pub fn set(&mut self, spec: &str) {
        if spec.is_empty() {
            self.reset();
            return;
        }

        self.flags = [false; 256];

        let bytes = spec.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] != b'%' {
                self.flags[bytes[i] as usize] = true;
                i += 1;
                continue;
            }

            if i + 2 >= bytes.len() {
                break;
            }

            let hi = (bytes[i + 1] as char).to_digit(16);
            let lo = (bytes[i + 2] as char).to_digit(16);
            if let (Some(hi), Some(lo)) = (hi, lo) {
                self.flags[(hi * 16 + lo) as usize] = true;
            }
            i += 3;
        }

        self.set = true;
    }

    pub fn reset(&mut self) {
        self.flags = [false; 256];
        self.set = false;
    }

    pub fn is_set(&self) -> bool {
        self.set
    }

    pub fn is_delimiter(&self, byte: u8) -> bool {
        self.flags[byte as usize]
    }

    /// Lowest byte value flagged as a delimiter ("canonical delimiter",
    /// `spec.md` §4.D), or `None` if no byte is flagged.
    pub fn canonical(&self) -> Option<u8> {
        self.flags.iter().position(|&f| f).map(|b| b as u8)
    }
}

static TABLE: OnceLock<RwLock<DelimiterTable>> = OnceLock::new();

fn table() -> &'static RwLock<DelimiterTable> {
    TABLE.get_or_init(|| RwLock::new(DelimiterTable::new()))
}

/// Initialize the process-wide delimiter table.
pub fn set_global(spec: &str) {
    table().write().set(spec);
}

/// Reset the process-wide delimiter table to its uninitialized state.
pub fn reset_global() {
    table().write().reset();
}

pub fn is_global_set() -> bool {
    table().read().is_set()
}

/// Snapshot the process-wide table for use by the tokenizer. Concurrent
/// tokenization with a changing table is forbidden by `spec.md` §5; callers
/// must not call [`set_global`]/[`reset_global`] while a tokenization pass
/// is in flight.
pub fn global_snapshot() -> DelimiterTable {
    table().read().clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_by_default() {
        let t = DelimiterTable::new();
        assert!(!t.is_set());
    }

    #[test]
    fn literal_and_hex_escapes() {
        let mut t = DelimiterTable::new();
        t.set(" %09");
        assert!(t.is_set());
        assert!(t.is_delimiter(b' '));
        assert!(t.is_delimiter(b'\t'));
        assert!(!t.is_delimiter(b'a'));
    }

    #[test]
    fn truncated_percent_is_ignored() {
        let mut t = DelimiterTable::new();
        t.set("ab%");
        assert!(t.is_delimiter(b'a'));
        assert!(t.is_delimiter(b'b'));
    }

    #[test]
    fn empty_spec_resets() {
        let mut t = DelimiterTable::new();
        t.set(" ");
        assert!(t.is_set());
        t.set("");
        assert!(!t.is_set());
    }

    #[test]
    fn canonical_is_lowest_flagged_byte() {
        let mut t = DelimiterTable::new();
        t.set("zba");
        assert_eq!(t.canonical(), Some(b'a'));
    }
}
