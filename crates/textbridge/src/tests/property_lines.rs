use alloc::{vec, vec::Vec};

use quickcheck::QuickCheck;

use super::quickcheck_tests;
use crate::{LineExtent, LineUnit, lines, split_lines};

/// Small alphabet so separators show up often: two separators, ASCII, a BMP
/// scalar and both halves of a surrogate pair.
const ALPHABET: [u16; 7] = [0x0A, 0x0D, 0x61, 0x20, 0x20AC, 0xD83D, 0xDCC8];

fn units_from(picks: &[u8]) -> Vec<u16> {
    picks
        .iter()
        .map(|&p| ALPHABET[usize::from(p) % ALPHABET.len()])
        .collect()
}

/// Marker scan: remember where the current line started, close it on a
/// separator, and close the trailing line at the end.
fn marker_scan(units: &[u16]) -> Vec<LineExtent> {
    let mut extents = Vec::new();
    let mut start = None;
    for (i, &u) in units.iter().enumerate() {
        if u.is_line_break() {
            if let Some(s) = start.take() {
                extents.push(LineExtent { start: s, end: i });
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        extents.push(LineExtent {
            start: s,
            end: units.len(),
        });
    }
    extents
}

/// Property: the iterator yields the same extents as a marker scan.
#[test]
fn extents_match_marker_scan_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(picks: Vec<u8>) -> bool {
        let units = units_from(&picks);
        split_lines(&units) == marker_scan(&units)
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(Vec<u8>) -> bool);
}

/// Property: extents are ordered, non-empty, separator-free and maximal.
#[test]
fn extents_are_maximal_runs_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(picks: Vec<u8>) -> bool {
        let units = units_from(&picks);
        let extents = split_lines(&units);

        let ordered = extents.windows(2).all(|w| w[0].end < w[1].start);
        let clean = extents
            .iter()
            .all(|e| !e.is_empty() && !e.slice(&units).iter().any(|u| u.is_line_break()));
        let maximal = extents.iter().all(|e| {
            (e.start == 0 || units[e.start - 1].is_line_break())
                && (e.end == units.len() || units[e.end].is_line_break())
        });
        let covered: usize = extents.iter().map(LineExtent::len).sum();
        let content = units.iter().filter(|u| !u.is_line_break()).count();

        ordered && clean && maximal && covered == content
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(Vec<u8>) -> bool);
}

/// Property: joining the lines with `\n` and splitting again is a fixed point.
#[test]
fn rejoin_and_split_is_idempotent_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(picks: Vec<u8>) -> bool {
        let units = units_from(&picks);
        let first: Vec<&[u16]> = lines(&units).collect();
        let joined = first.join(&0x0A);
        let second: Vec<&[u16]> = lines(&joined).collect();
        first == second
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(Vec<u8>) -> bool);
}

#[test]
fn idempotence_on_spec_examples() {
    for text in ["a\nb\nc", "a\r\nb", "\n\n", "abc", ""] {
        let units: Vec<u16> = text.encode_utf16().collect();
        let first: Vec<&[u16]> = lines(&units).collect();
        let joined = first.join(&0x0A);
        assert_eq!(lines(&joined).collect::<Vec<_>>(), first, "{text:?}");
    }
    assert_eq!(split_lines::<u16>(&[]), vec![]);
}
