#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use textbridge::{LineExtent, line_extents, lines, split_lines};

/// UTF-16 text plus a stride used to sprinkle extra separators, so inputs
/// with long separator runs are common.
#[derive(Arbitrary, Debug)]
struct Input {
    units: Vec<u16>,
    stride: u8,
    use_cr: bool,
}

impl Input {
    fn text(&self) -> Vec<u16> {
        let stride = usize::from(self.stride.max(1));
        let sep = if self.use_cr { 0x0D } else { 0x0A };
        let mut out = Vec::with_capacity(self.units.len() * 2);
        for (i, &u) in self.units.iter().enumerate() {
            out.push(u);
            if i % stride == 0 {
                out.push(sep);
            }
        }
        out
    }
}

fn check(input: &Input) {
    let text = input.text();
    let extents = split_lines(&text);

    assert!(extents.iter().copied().eq(line_extents(&text)));

    let mut prev_end = 0;
    for &LineExtent { start, end } in &extents {
        assert!(prev_end <= start && start < end && end <= text.len());
        assert!(text[prev_end..start].iter().all(|&u| u == 0x0A || u == 0x0D));
        prev_end = end;
    }
    assert!(text[prev_end..].iter().all(|&u| u == 0x0A || u == 0x0D));

    let first: Vec<&[u16]> = lines(&text).collect();
    let joined = first.join(&0x0A);
    let second: Vec<&[u16]> = lines(&joined).collect();
    assert_eq!(first, second);
}

fuzz_target!(|input: Input| check(&input));
