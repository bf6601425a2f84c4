use alloc::string::String;
use core::fmt;

use bstr::BStr;
use thiserror::Error;

/// Why a byte sequence was rejected by the decoder.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MalformedKind {
    /// A continuation byte (`10xxxxxx`) appeared where a lead byte was
    /// expected.
    #[error("unexpected continuation byte")]
    UnexpectedContinuation,
    /// A byte in `0xF8..=0xFF`, which never starts a sequence.
    #[error("invalid lead byte")]
    InvalidLead,
    /// A byte inside a multi-byte sequence did not match `10xxxxxx`.
    #[error("invalid continuation byte")]
    InvalidContinuation,
    /// The buffer ended before the sequence was complete.
    #[error("truncated sequence")]
    Truncated,
    /// The sequence encodes its code point in more bytes than necessary.
    #[error("overlong encoding")]
    Overlong,
    /// The sequence encodes a UTF-16 surrogate (U+D800..=U+DFFF).
    #[error("encoded surrogate")]
    Surrogate,
    /// The sequence encodes a value above U+10FFFF.
    #[error("code point out of range")]
    OutOfRange,
}

/// Malformed UTF-8 reported by [`MalformedPolicy::Strict`] decoding.
///
/// `offset` is the index of the lead byte of the rejected sequence, which is
/// also the length of the longest valid prefix of the input.
///
/// [`MalformedPolicy::Strict`]: crate::MalformedPolicy::Strict
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{kind} at byte offset {offset}: {sequence}")]
pub struct Utf8Error {
    pub(crate) offset: usize,
    pub(crate) kind: MalformedKind,
    pub(crate) sequence: Sequence,
}

impl Utf8Error {
    pub(crate) fn new(kind: MalformedKind, offset: usize, bytes: &[u8]) -> Self {
        Self {
            offset,
            kind,
            sequence: Sequence::capture(bytes),
        }
    }

    /// Byte offset of the rejected sequence.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// What was wrong with the sequence.
    #[must_use]
    pub fn kind(&self) -> MalformedKind {
        self.kind
    }

    /// The offending bytes, at most four.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        self.sequence.as_bytes()
    }
}

/// Up to four bytes of a rejected sequence, kept inline so the error stays
/// `Copy` and does not borrow the input.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) struct Sequence {
    bytes: [u8; 4],
    len: u8,
}

impl Sequence {
    fn capture(bytes: &[u8]) -> Self {
        let mut out = [0u8; 4];
        let n = bytes.len().min(out.len());
        out[..n].copy_from_slice(&bytes[..n]);
        Self {
            bytes: out,
            len: u8::try_from(n).unwrap_or(4),
        }
    }

    fn as_bytes(&self) -> &[u8] {
        &self.bytes[..usize::from(self.len)]
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(BStr::new(self.as_bytes()), f)
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Returned when a [`MalformedPolicy`](crate::MalformedPolicy) name is not
/// recognised.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown malformed-input policy {0:?} (expected replace, skip or strict)")]
pub struct UnknownPolicy(pub String);
