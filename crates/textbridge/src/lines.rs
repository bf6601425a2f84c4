//! Line splitting over code-unit slices.
//!
//! A line is a maximal non-empty run without `\r` or `\n`. Separators are
//! single units and runs of them collapse, so `"a\r\n\nb"` has two lines and
//! `"\n\n"` has none.

use alloc::vec::Vec;
use core::{iter::FusedIterator, ops::Range};

/// Element type that can be scanned for line breaks.
pub trait LineUnit: Copy {
    /// Whether this unit is `\r` or `\n`.
    fn is_line_break(self) -> bool;
}

impl LineUnit for u16 {
    #[inline]
    fn is_line_break(self) -> bool {
        self == 0x0A || self == 0x0D
    }
}

impl LineUnit for u8 {
    #[inline]
    fn is_line_break(self) -> bool {
        self == b'\n' || self == b'\r'
    }
}

impl LineUnit for char {
    #[inline]
    fn is_line_break(self) -> bool {
        self == '\n' || self == '\r'
    }
}

/// Half-open range `[start, end)` of one line within the scanned slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineExtent {
    /// Index of the first unit of the line.
    pub start: usize,
    /// Index one past the last unit of the line.
    pub end: usize,
}

impl LineExtent {
    /// Number of units in the line.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Always `false` for extents produced by this module.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// The extent as a `Range`.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Borrows the line out of the slice it was computed from.
    ///
    /// # Panics
    ///
    /// If the extent lies outside `units`.
    #[must_use]
    pub fn slice<'a, T>(&self, units: &'a [T]) -> &'a [T] {
        &units[self.range()]
    }
}

impl From<LineExtent> for Range<usize> {
    fn from(extent: LineExtent) -> Self {
        extent.range()
    }
}

/// Iterator over the [`LineExtent`]s of a slice. See [`line_extents`].
#[derive(Debug, Clone)]
pub struct LineExtents<'a, T> {
    units: &'a [T],
    pos: usize,
}

impl<T: LineUnit> Iterator for LineExtents<'_, T> {
    type Item = LineExtent;

    fn next(&mut self) -> Option<LineExtent> {
        let rest = self.units.get(self.pos..)?;
        let Some(skip) = rest.iter().position(|u| !u.is_line_break()) else {
            self.pos = self.units.len();
            return None;
        };

        let start = self.pos + skip;
        let end = self.units[start..]
            .iter()
            .position(|u| u.is_line_break())
            .map_or(self.units.len(), |n| start + n);

        // The break at `end` (if any) is consumed here.
        self.pos = (end + 1).min(self.units.len());
        Some(LineExtent { start, end })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.units.len().saturating_sub(self.pos);
        // Every line except the last needs a separator after it.
        (0, Some(remaining.div_ceil(2)))
    }
}

impl<T: LineUnit> FusedIterator for LineExtents<'_, T> {}

/// Iterator over the lines of a slice as borrowed sub-slices. See [`lines`].
#[derive(Debug, Clone)]
pub struct Lines<'a, T> {
    extents: LineExtents<'a, T>,
}

impl<'a, T: LineUnit> Iterator for Lines<'a, T> {
    type Item = &'a [T];

    fn next(&mut self) -> Option<&'a [T]> {
        let units = self.extents.units;
        self.extents.next().map(|extent| extent.slice(units))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.extents.size_hint()
    }
}

impl<T: LineUnit> FusedIterator for Lines<'_, T> {}

/// Lazily yields the extent of each line in `units`, in order.
pub fn line_extents<T: LineUnit>(units: &[T]) -> LineExtents<'_, T> {
    LineExtents { units, pos: 0 }
}

/// Lazily yields each line of `units` as a sub-slice.
///
/// ```rust
/// let text: Vec<u16> = "AAPL,Apple\r\nMSFT,Microsoft".encode_utf16().collect();
/// assert_eq!(textbridge::lines(&text).count(), 2);
/// ```
pub fn lines<T: LineUnit>(units: &[T]) -> Lines<'_, T> {
    Lines {
        extents: line_extents(units),
    }
}

/// Collects the extent of every line in `units`.
///
/// Empty input, or input made only of separators, yields an empty vector.
///
/// ```rust
/// use textbridge::{LineExtent, split_lines};
///
/// let text: Vec<u16> = "a\r\nb".encode_utf16().collect();
/// assert_eq!(
///     split_lines(&text),
///     [LineExtent { start: 0, end: 1 }, LineExtent { start: 3, end: 4 }]
/// );
/// ```
#[must_use]
pub fn split_lines<T: LineUnit>(units: &[T]) -> Vec<LineExtent> {
    line_extents(units).collect()
}

/// Lines of a `str`.
///
/// Unlike [`str::lines`], a lone `\r` also ends a line and empty lines are
/// dropped. Slicing is always on a char boundary because `\r` and `\n` never
/// appear inside a multi-byte UTF-8 sequence.
pub fn str_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split(['\r', '\n']).filter(|line| !line.is_empty())
}
