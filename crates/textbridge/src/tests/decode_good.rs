use alloc::{string::String, vec::Vec};

use crate::{DecodeOptions, MalformedPolicy, decode_utf8, decode_utf8_into, decode_utf8_with};

fn utf16(s: &str) -> Vec<u16> {
    s.encode_utf16().collect()
}

#[test]
fn empty_input_decodes_to_nothing() {
    assert!(decode_utf8(b"").is_empty());
    assert_eq!(decode_utf8_with(b"", DecodeOptions::strict()), Ok(Vec::new()));
}

#[test]
fn ascii_maps_one_to_one() {
    let bytes: Vec<u8> = (0u8..=0x7F).collect();
    let expected: Vec<u16> = bytes.iter().map(|&b| u16::from(b)).collect();
    assert_eq!(decode_utf8(&bytes), expected);
}

#[test]
fn two_and_three_byte_sequences() {
    let s = "Ωμέγα · €42 · ½";
    assert_eq!(decode_utf8(s.as_bytes()), utf16(s));
}

#[test]
fn astral_code_point_becomes_surrogate_pair() {
    let units = decode_utf8("📈".as_bytes());
    assert_eq!(units, [0xD83D, 0xDCC8]);

    let back: String = char::decode_utf16(units.iter().copied())
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(back, "📈");
}

#[test]
fn boundary_scalars_decode() {
    for ch in ['\u{7F}', '\u{80}', '\u{7FF}', '\u{800}', '\u{D7FF}', '\u{E000}', '\u{FFFF}', '\u{10000}', '\u{10FFFF}'] {
        let mut buf = [0u8; 4];
        let s = ch.encode_utf8(&mut buf);
        assert_eq!(decode_utf8(s.as_bytes()), utf16(s), "U+{:04X}", u32::from(ch));
    }
}

#[test]
fn every_policy_agrees_on_valid_input() {
    let s = "symbol,name\r\nBRK.A,Berkshire — Class A\n7203.T,トヨタ自動車\n";
    for malformed in [MalformedPolicy::Replace, MalformedPolicy::Skip, MalformedPolicy::Strict] {
        let options = DecodeOptions {
            malformed,
            ..Default::default()
        };
        assert_eq!(decode_utf8_with(s.as_bytes(), options), Ok(utf16(s)));
    }
}

#[test]
fn into_appends_after_existing_content() {
    let mut out = utf16("head:");
    let stats = decode_utf8_into("tail".as_bytes(), &mut out, DecodeOptions::default()).unwrap();
    assert_eq!(stats.code_units, 4);
    assert_eq!(stats.replacements, 0);
    assert_eq!(String::from_utf16(&out).unwrap(), "head:tail");
}
