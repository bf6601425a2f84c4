//! UTF-8 → UTF-16 decoding.
//!
//! The scan copies ASCII runs in bulk and decodes everything else one
//! sequence at a time. Acceptance matches `core::str::from_utf8` exactly:
//! overlong forms, encoded surrogates and values above U+10FFFF are rejected
//! alongside the structural errors (bad lead, bad continuation, truncation).
//!
//! Under the lossy policies a rejected sequence costs exactly one lead byte;
//! scanning resumes at the following byte, so one broken 3-byte sequence may
//! produce up to three replacements.

use alloc::vec::Vec;
use core::convert::Infallible;

use crate::{
    error::{MalformedKind, Utf8Error},
    options::{DecodeOptions, MalformedPolicy},
};

/// U+FFFD REPLACEMENT CHARACTER as a UTF-16 code unit.
pub const REPLACEMENT_UNIT: u16 = 0xFFFD;

/// Summary of a successful [`decode_utf8_into`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeStats {
    /// Code units appended to the output buffer.
    pub code_units: usize,
    /// Malformed sequences that were replaced or skipped.
    pub replacements: usize,
}

/// Decodes `bytes`, replacing each malformed lead byte with U+FFFD.
///
/// Never fails. The result always holds well-formed UTF-16.
///
/// ```rust
/// let units = textbridge::decode_utf8("€1".as_bytes());
/// assert_eq!(units, [0x20AC, u16::from(b'1')]);
/// ```
#[must_use]
pub fn decode_utf8(bytes: &[u8]) -> Vec<u16> {
    let mut out = Vec::with_capacity(bytes.len());
    let Ok(_) = scan::<Infallible>(bytes, &mut out, |out, _| {
        out.push(REPLACEMENT_UNIT);
        Ok(())
    });
    out
}

/// Decodes `bytes` into a fresh buffer using `options`.
///
/// # Errors
///
/// Returns the first malformed sequence when `options.malformed` is
/// [`MalformedPolicy::Strict`]. The lossy policies never fail.
pub fn decode_utf8_with(bytes: &[u8], options: DecodeOptions) -> Result<Vec<u16>, Utf8Error> {
    let mut out = Vec::new();
    decode_utf8_into(bytes, &mut out, options)?;
    Ok(out)
}

/// Appends the decoded form of `bytes` to `out`.
///
/// On error `out` is truncated back to the length it had on entry, so a
/// reused buffer never carries a partial decode.
///
/// # Errors
///
/// Returns the first malformed sequence when `options.malformed` is
/// [`MalformedPolicy::Strict`].
pub fn decode_utf8_into(
    bytes: &[u8],
    out: &mut Vec<u16>,
    options: DecodeOptions,
) -> Result<DecodeStats, Utf8Error> {
    let start = out.len();
    // A byte never yields more than one code unit.
    out.reserve(bytes.len());

    let result: Result<usize, Utf8Error> = match options.malformed {
        MalformedPolicy::Replace => {
            let unit = options.replacement;
            scan(bytes, out, |out, _| {
                out.push(unit);
                Ok(())
            })
        }
        MalformedPolicy::Skip => scan(bytes, out, |_, _| Ok(())),
        MalformedPolicy::Strict => scan(bytes, out, |_, err| Err(err)),
    };

    match result {
        Ok(replacements) => Ok(DecodeStats {
            code_units: out.len() - start,
            replacements,
        }),
        Err(err) => {
            out.truncate(start);
            Err(err)
        }
    }
}

/// Core loop. `on_malformed` decides what a rejected sequence turns into; an
/// `Err` from it aborts the scan. Returns the number of rejected sequences.
fn scan<E>(
    bytes: &[u8],
    out: &mut Vec<u16>,
    mut on_malformed: impl FnMut(&mut Vec<u16>, Utf8Error) -> Result<(), E>,
) -> Result<usize, E> {
    let mut rejected = 0;
    let mut pos = 0;

    while pos < bytes.len() {
        let rest = &bytes[pos..];

        let ascii = rest.iter().position(|b| !b.is_ascii()).unwrap_or(rest.len());
        if ascii > 0 {
            out.extend(rest[..ascii].iter().map(|&b| u16::from(b)));
            pos += ascii;
            continue;
        }

        match decode_sequence(rest) {
            Ok((ch, len)) => {
                let mut buf = [0u16; 2];
                out.extend_from_slice(ch.encode_utf16(&mut buf));
                pos += len;
            }
            Err((kind, len)) => {
                on_malformed(out, Utf8Error::new(kind, pos, &rest[..len]))?;
                rejected += 1;
                pos += 1;
            }
        }
    }

    Ok(rejected)
}

/// Decodes the sequence at the start of a non-empty `bytes`.
///
/// On success returns the scalar and the number of bytes it used. On failure
/// returns the reason and how many bytes belong to the rejected sequence (for
/// error reporting only; the caller always resumes one byte later).
fn decode_sequence(bytes: &[u8]) -> Result<(char, usize), (MalformedKind, usize)> {
    let Some((&lead, _)) = bytes.split_first() else {
        return Err((MalformedKind::Truncated, 0));
    };

    let (len, bits) = match lead {
        0x00..=0x7F => return Ok((char::from(lead), 1)),
        0x80..=0xBF => return Err((MalformedKind::UnexpectedContinuation, 1)),
        0xC0..=0xDF => (2, lead & 0x1F),
        0xE0..=0xEF => (3, lead & 0x0F),
        0xF0..=0xF7 => (4, lead & 0x07),
        0xF8..=0xFF => return Err((MalformedKind::InvalidLead, 1)),
    };

    let mut cp = u32::from(bits);
    for i in 1..len {
        let Some(&b) = bytes.get(i) else {
            let kind = dead_prefix(bytes).unwrap_or(MalformedKind::Truncated);
            return Err((kind, i));
        };
        if b & 0xC0 != 0x80 {
            let kind = dead_prefix(&bytes[..i]).unwrap_or(MalformedKind::InvalidContinuation);
            return Err((kind, i + 1));
        }
        cp = (cp << 6) | u32::from(b & 0x3F);
    }

    let shortest = match len {
        2 => 0x80,
        3 => 0x800,
        _ => 0x1_0000,
    };
    if cp < shortest {
        return Err((MalformedKind::Overlong, len));
    }

    match char::from_u32(cp) {
        Some(ch) => Ok((ch, len)),
        None if cp > 0x10_FFFF => Err((MalformedKind::OutOfRange, len)),
        None => Err((MalformedKind::Surrogate, len)),
    }
}

/// Why an incomplete `prefix` (a lead byte followed by continuation bytes)
/// cannot start any valid sequence, whatever follows it.
fn dead_prefix(prefix: &[u8]) -> Option<MalformedKind> {
    match *prefix {
        [0xC0 | 0xC1, ..] | [0xE0, 0x80..=0x9F, ..] | [0xF0, 0x80..=0x8F, ..] => {
            Some(MalformedKind::Overlong)
        }
        [0xED, 0xA0..=0xBF, ..] => Some(MalformedKind::Surrogate),
        [0xF5..=0xF7, ..] | [0xF4, 0x90..=0xBF, ..] => Some(MalformedKind::OutOfRange),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_lengths_follow_lead_byte() {
        assert_eq!(decode_sequence(b"A"), Ok(('A', 1)));
        assert_eq!(decode_sequence("é".as_bytes()), Ok(('é', 2)));
        assert_eq!(decode_sequence("€".as_bytes()), Ok(('€', 3)));
        assert_eq!(decode_sequence("𝄞".as_bytes()), Ok(('𝄞', 4)));
    }

    #[test]
    fn only_the_first_sequence_is_read() {
        assert_eq!(decode_sequence("éz".as_bytes()), Ok(('é', 2)));
    }

    #[test]
    fn rejected_sequence_length_covers_what_was_inspected() {
        assert_eq!(decode_sequence(b"\xE2\x82"), Err((MalformedKind::Truncated, 2)));
        assert_eq!(
            decode_sequence(b"\xE2\x41\x41"),
            Err((MalformedKind::InvalidContinuation, 2))
        );
        assert_eq!(decode_sequence(b"\xED\xA0\x80"), Err((MalformedKind::Surrogate, 3)));
        assert_eq!(decode_sequence(b"\xF4\x90\x80\x80"), Err((MalformedKind::OutOfRange, 4)));
        assert_eq!(decode_sequence(b"\xC1\xBF"), Err((MalformedKind::Overlong, 2)));
    }

    #[test]
    fn incomplete_prefix_that_can_never_be_valid_is_not_truncated() {
        assert_eq!(decode_sequence(b"\xE0\x80"), Err((MalformedKind::Overlong, 2)));
        assert_eq!(decode_sequence(b"\xED\xA0"), Err((MalformedKind::Surrogate, 2)));
        assert_eq!(decode_sequence(b"\xF4\x90\x80"), Err((MalformedKind::OutOfRange, 3)));
        assert_eq!(decode_sequence(b"\xF0\x8F"), Err((MalformedKind::Overlong, 2)));
        assert_eq!(decode_sequence(b"\xC0"), Err((MalformedKind::Overlong, 1)));
        assert_eq!(decode_sequence(b"\xF5\x80"), Err((MalformedKind::OutOfRange, 2)));
        assert_eq!(decode_sequence(b"\xE0\x9F\x41"), Err((MalformedKind::Overlong, 3)));
        // A prefix that could still complete stays truncated.
        assert_eq!(decode_sequence(b"\xE0\xA0"), Err((MalformedKind::Truncated, 2)));
        assert_eq!(decode_sequence(b"\xF4\x8F\xBF"), Err((MalformedKind::Truncated, 3)));
    }

    #[test]
    fn strict_failure_leaves_buffer_untouched() {
        let mut out = alloc::vec![1, 2, 3];
        let err = decode_utf8_into(b"abc\xFF", &mut out, DecodeOptions::strict()).unwrap_err();
        assert_eq!(err.offset(), 3);
        assert_eq!(out, [1, 2, 3]);
    }

    #[test]
    fn stats_count_units_and_replacements() {
        let mut out = Vec::new();
        let stats = decode_utf8_into(b"a\x80\xF0\x9F\x98\x80", &mut out, DecodeOptions::default())
            .unwrap();
        assert_eq!(
            stats,
            DecodeStats {
                code_units: 4,
                replacements: 1
            }
        );
        assert_eq!(out, [u16::from(b'a'), REPLACEMENT_UNIT, 0xD83D, 0xDE00]);
    }
}
