use alloc::string::ToString;
use core::{fmt, str::FromStr};

use crate::{decode::REPLACEMENT_UNIT, error::UnknownPolicy};

/// What the decoder does with a malformed UTF-8 sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MalformedPolicy {
    /// Emit [`DecodeOptions::replacement`] for the lead byte and resume at the
    /// next byte.
    #[default]
    Replace,
    /// Drop the lead byte and resume at the next byte.
    Skip,
    /// Stop at the first malformed sequence and return a
    /// [`Utf8Error`](crate::Utf8Error).
    Strict,
}

impl MalformedPolicy {
    /// Lowercase name accepted by [`FromStr`].
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MalformedPolicy::Replace => "replace",
            MalformedPolicy::Skip => "skip",
            MalformedPolicy::Strict => "strict",
        }
    }
}

impl fmt::Display for MalformedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MalformedPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        [Self::Replace, Self::Skip, Self::Strict]
            .into_iter()
            .find(|policy| policy.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownPolicy(s.to_string()))
    }
}

/// Configuration for a single decode call.
///
/// # Examples
///
/// ```rust
/// use textbridge::{DecodeOptions, MalformedPolicy, decode_utf8_with};
///
/// let options = DecodeOptions {
///     malformed: MalformedPolicy::Strict,
///     ..Default::default()
/// };
/// let err = decode_utf8_with(b"ok\xC0", options).unwrap_err();
/// assert_eq!(err.offset(), 2);
/// ```
///
/// # Default
///
/// Replace malformed sequences with U+FFFD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DecodeOptions {
    /// Handling of malformed sequences.
    ///
    /// # Default
    ///
    /// [`MalformedPolicy::Replace`]
    pub malformed: MalformedPolicy,

    /// Code unit emitted for each malformed lead byte under
    /// [`MalformedPolicy::Replace`]. Ignored by the other policies.
    ///
    /// # Default
    ///
    /// `0xFFFD` (REPLACEMENT CHARACTER)
    pub replacement: u16,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            malformed: MalformedPolicy::default(),
            replacement: REPLACEMENT_UNIT,
        }
    }
}

impl DecodeOptions {
    /// Options that reject malformed input.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            malformed: MalformedPolicy::Strict,
            ..Self::default()
        }
    }
}
