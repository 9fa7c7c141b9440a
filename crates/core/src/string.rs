//! Dual-view string object (`spec.md` §3, §4.B).
//!
//! Mirrors `original_source/src/str.c`'s `str_t` tagged union: a string
//! starts as raw bytes and may be converted, once, into a token sequence by
//! the tokenizer in [`crate::tokenizer`]. There is no in-place mutation —
//! the conversion consumes the byte payload and returns a new value.

use crate::hash::{combine, hash_bytes, hash_tokens};

/// The payload of a [`SimString`]: either raw bytes or a token sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Bytes(Vec<u8>),
    Tokens(Vec<u64>),
}

/// A single input string together with the metadata the engine threads
/// through to the output adapters (`spec.md` §3: `len`, `idx`, `src`,
/// `label`).
#[derive(Debug, Clone, PartialEq)]
pub struct SimString {
    pub idx: u64,
    pub src: Option<String>,
    pub label: Option<f32>,
    payload: Payload,
}

impl SimString {
    pub fn from_bytes(src: Option<String>, label: Option<f32>, idx: u64, bytes: Vec<u8>) -> Self {
        Self {
            idx,
            src,
            label,
            payload: Payload::Bytes(bytes),
        }
    }

    pub fn from_tokens(src: Option<String>, label: Option<f32>, idx: u64, tokens: Vec<u64>) -> Self {
        Self {
            idx,
            src,
            label,
            payload: Payload::Tokens(tokens),
        }
    }

    pub fn len(&self) -> usize {
        match &self.payload {
            Payload::Bytes(b) => b.len(),
            Payload::Tokens(t) => t.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_tokens(&self) -> bool {
        matches!(self.payload, Payload::Tokens(_))
    }

    pub fn bytes(&self) -> Option<&[u8]> {
        match &self.payload {
            Payload::Bytes(b) => Some(b),
            Payload::Tokens(_) => None,
        }
    }

    pub fn tokens(&self) -> Option<&[u64]> {
        match &self.payload {
            Payload::Tokens(t) => Some(t),
            Payload::Bytes(_) => None,
        }
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Replace the payload. Used only by the tokenizer's one-way
    /// `Bytes -> Tokens` conversion (`spec.md` §4.D).
    pub(crate) fn set_payload(&mut self, payload: Payload) {
        self.payload = payload;
    }

    /// `hash1` from `spec.md` §4.B: hashes the payload as bytes or as a
    /// 64-bit-element sequence depending on variant.
    pub fn hash1(&self) -> u64 {
        match &self.payload {
            Payload::Bytes(b) => hash_bytes(b),
            Payload::Tokens(t) => hash_tokens(t),
        }
    }

    /// `hash2(x, y) = hash1(x) XOR hash1(y)`. Mixed-type pairs are a
    /// `spec.md` §7 "Type mismatch" condition: a warning is logged and the
    /// sentinel `0` is returned rather than hashing incompatible payloads.
    pub fn hash2(&self, other: &SimString) -> u64 {
        if std::mem::discriminant(&self.payload) != std::mem::discriminant(&other.payload) {
            tracing::warn!(
                x_idx = self.idx,
                y_idx = other.idx,
                "hash2 called on mismatched Bytes/Tokens payloads, returning sentinel"
            );
            return 0;
        }
        combine(self.hash1(), other.hash1())
    }
}
