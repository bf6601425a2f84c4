#![no_main]
use std::cell::RefCell;

use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use textbridge::{DecodeOptions, MalformedPolicy, decode_utf8, decode_utf8_with, split_lines};

thread_local! {
    static RNG: RefCell<SmallRng> = RefCell::new(SmallRng::from_os_rng());
}

/// Fragments that sit on the decoder's branch points: every sequence length,
/// the validity boundaries, and the usual ways a sequence breaks.
static FRAGMENTS: &[&[u8]] = &[
    b"\n",
    b"\r\n",
    b"\r",
    b"\xC2\x80",         // smallest 2-byte
    b"\xDF\xBF",         // largest 2-byte
    b"\xE0\xA0\x80",     // smallest 3-byte
    b"\xED\x9F\xBF",     // just below the surrogates
    b"\xEE\x80\x80",     // just above the surrogates
    b"\xF0\x90\x80\x80", // smallest 4-byte
    b"\xF4\x8F\xBF\xBF", // U+10FFFF
    b"\xC0\xAF",         // overlong
    b"\xED\xA0\x80",     // surrogate
    b"\xF4\x90\x80\x80", // above U+10FFFF
    b"\xE2\x82",         // truncated
    b"\x80",             // lone continuation
    b"\xFF",             // invalid lead
];

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

/// Splice a fragment into `data` at a random offset, shifting the tail.
fn splice_fragment(data: &mut [u8], size: usize, max_size: usize) -> usize {
    with_rng(|rng| {
        let fragment = FRAGMENTS[rng.random_range(0..FRAGMENTS.len())];
        if size + fragment.len() > max_size {
            return size;
        }
        let at = rng.random_range(0..=size);
        data.copy_within(at..size, at + fragment.len());
        data[at..at + fragment.len()].copy_from_slice(fragment);
        size + fragment.len()
    })
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if seed.is_multiple_of(3) {
        splice_fragment(data, size, max_size)
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

fn check(data: &[u8]) {
    let lossy = decode_utf8(data);
    assert!(lossy.len() <= data.len());
    assert!(char::decode_utf16(lossy.iter().copied()).all(|r| r.is_ok()));

    match (std::str::from_utf8(data), decode_utf8_with(data, DecodeOptions::strict())) {
        (Ok(s), Ok(units)) => {
            assert!(s.encode_utf16().eq(units.iter().copied()));
            assert_eq!(units, lossy);
        }
        (Err(std_err), Err(err)) => assert_eq!(std_err.valid_up_to(), err.offset()),
        (std_result, ours) => panic!("std {std_result:?} vs strict {ours:?}"),
    }

    let skipped = decode_utf8_with(
        data,
        DecodeOptions {
            malformed: MalformedPolicy::Skip,
            ..Default::default()
        },
    )
    .expect("skip never fails");
    assert!(skipped.len() <= lossy.len());

    for extent in split_lines(&lossy) {
        let line = extent.slice(&lossy);
        assert!(!line.is_empty());
        assert!(!line.contains(&0x0A) && !line.contains(&0x0D));
    }
}

fuzz_target!(|data: &[u8]| check(data));
