//! Fast text plumbing for native bridges.
//!
//! Two leaf operations over borrowed buffers:
//!
//! - [`decode_utf8`] turns a UTF-8 byte buffer into UTF-16 code units, with a
//!   configurable policy for malformed input ([`MalformedPolicy`]).
//! - [`split_lines`] scans code units and returns the non-empty runs between
//!   `\r` / `\n` separators as [`LineExtent`]s.
//!
//! ```rust
//! use textbridge::{decode_utf8, lines};
//!
//! let units = decode_utf8("bid\r\nask\n".as_bytes());
//! let found: Vec<String> = lines(&units).map(String::from_utf16_lossy).collect();
//! assert_eq!(found, ["bid", "ask"]);
//! ```

#![no_std]
#![forbid(unsafe_code)]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod decode;
mod error;
mod lines;
mod options;

#[cfg(test)]
mod tests;

pub use decode::{DecodeStats, REPLACEMENT_UNIT, decode_utf8, decode_utf8_into, decode_utf8_with};
pub use error::{MalformedKind, UnknownPolicy, Utf8Error};
pub use lines::{LineExtent, LineExtents, LineUnit, Lines, line_extents, lines, split_lines, str_lines};
pub use options::{DecodeOptions, MalformedPolicy};
