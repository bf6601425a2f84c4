//! Raw UTF-16 access to Java strings.
//!
//! The `jni` crate converts strings through modified UTF-8. These helpers go
//! through `GetStringChars` / `NewString` instead so that code units cross the
//! boundary untouched and without an intermediate re-encoding.

use core::{marker::PhantomData, ptr, slice};

use jni::{
    JNIEnv,
    objects::{JByteArray, JString, ReleaseMode},
    sys::{self, jchar, jsize, jstring},
};

use crate::error::BridgeError;

/// Read-only view of a Java string's UTF-16 code units.
///
/// The characters are pinned (or copied) by the JVM until the view is
/// dropped, at which point they are released with `ReleaseStringChars`.
#[derive(Debug)]
pub struct Utf16Chars<'a> {
    env: *mut sys::JNIEnv,
    string: jstring,
    chars: *const jchar,
    len: usize,
    _string: PhantomData<&'a ()>,
}

impl<'a> Utf16Chars<'a> {
    /// Borrows the code units of `string`.
    ///
    /// # Errors
    ///
    /// [`BridgeError::NullArgument`] if `string` is null, and
    /// [`BridgeError::NullResult`] if the JVM could not provide the characters.
    pub fn new(env: &JNIEnv<'_>, string: &'a JString<'_>) -> Result<Self, BridgeError> {
        if string.is_null() {
            return Err(BridgeError::NullArgument("text"));
        }
        let raw_env = env.get_raw();
        let raw_string = string.as_raw();

        // SAFETY: `raw_env` belongs to the current thread and `raw_string` is a
        // live, non-null reference for the duration of this native call.
        let (len, chars) = unsafe {
            let table = &**raw_env;
            let get_length = table
                .GetStringLength
                .ok_or(BridgeError::MissingFunction("GetStringLength"))?;
            let get_chars = table
                .GetStringChars
                .ok_or(BridgeError::MissingFunction("GetStringChars"))?;
            (
                get_length(raw_env, raw_string),
                get_chars(raw_env, raw_string, ptr::null_mut()),
            )
        };
        if chars.is_null() {
            return Err(BridgeError::NullResult("GetStringChars"));
        }

        Ok(Self {
            env: raw_env,
            string: raw_string,
            chars,
            len: usize::try_from(len).unwrap_or(0),
            _string: PhantomData,
        })
    }

    /// The code units.
    #[must_use]
    pub fn as_slice(&self) -> &[u16] {
        // SAFETY: `chars` is non-null and holds `len` units until `drop`.
        unsafe { slice::from_raw_parts(self.chars, self.len) }
    }
}

impl Drop for Utf16Chars<'_> {
    fn drop(&mut self) {
        // SAFETY: `chars` came from `GetStringChars` on this `string` and has
        // not been released yet.
        unsafe {
            if let Some(release) = (**self.env).ReleaseStringChars {
                release(self.env, self.string, self.chars);
            }
        }
    }
}

/// Creates a Java string directly from UTF-16 code units.
///
/// # Errors
///
/// [`BridgeError::TooLong`] if `units` exceeds `jsize`, and
/// [`BridgeError::NullResult`] if the JVM failed to allocate (an
/// `OutOfMemoryError` is then pending).
pub fn new_utf16_string<'local>(
    env: &JNIEnv<'local>,
    units: &[u16],
) -> Result<JString<'local>, BridgeError> {
    let len = jsize::try_from(units.len()).map_err(|_| BridgeError::TooLong(units.len()))?;
    let raw_env = env.get_raw();

    // SAFETY: `units` is valid for `len` reads and `raw_env` belongs to the
    // current thread.
    let raw = unsafe {
        let new_string = (**raw_env)
            .NewString
            .ok_or(BridgeError::MissingFunction("NewString"))?;
        new_string(raw_env, units.as_ptr(), len)
    };
    if raw.is_null() {
        return Err(BridgeError::NullResult("NewString"));
    }

    // SAFETY: `raw` is a fresh local reference to a `java.lang.String`.
    Ok(unsafe { JString::from_raw(raw) })
}

/// Runs `f` over the contents of a Java `byte[]`.
///
/// The elements are released with `JNI_ABORT` before this returns: nothing is
/// copied back and no pointer into JVM memory outlives the call.
///
/// # Errors
///
/// [`BridgeError::NullArgument`] for a null array, or a JNI failure while
/// accessing it.
pub(crate) fn with_byte_elements<R>(
    env: &mut JNIEnv<'_>,
    array: &JByteArray<'_>,
    f: impl FnOnce(&[u8]) -> R,
) -> Result<R, BridgeError> {
    if array.is_null() {
        return Err(BridgeError::NullArgument("buffer"));
    }
    if env.get_array_length(array)? == 0 {
        return Ok(f(&[]));
    }

    // SAFETY: the elements are only read, and nothing else touches `array`
    // while they are held.
    let elements = unsafe { env.get_array_elements(array, ReleaseMode::NoCopyBack)? };
    // SAFETY: `jbyte` is `i8`, which has the same size and alignment as `u8`.
    let bytes = unsafe { slice::from_raw_parts(elements.as_ptr().cast::<u8>(), elements.len()) };
    let out = f(bytes);
    drop(elements);
    Ok(out)
}
