//! Safe bodies of the exported natives.
//!
//! Both functions take `&mut JNIEnv` so they can be driven from tests with an
//! attached thread as well as from the `extern "system"` wrappers.

use jni::{
    JNIEnv,
    objects::{JByteArray, JObject, JObjectArray, JString},
    sys::jsize,
};
use textbridge::{DecodeOptions, decode_utf8_into, split_lines};

use crate::{
    error::BridgeError,
    strings::{Utf16Chars, new_utf16_string, with_byte_elements},
};

/// Decodes a Java `byte[]` holding UTF-8 into a `java.lang.String`.
///
/// # Errors
///
/// Null input, strict-mode decode failures and JNI failures.
pub fn decode_utf8_to_jstring<'local>(
    env: &mut JNIEnv<'local>,
    buffer: &JByteArray<'_>,
    options: DecodeOptions,
) -> Result<JString<'local>, BridgeError> {
    let mut units = Vec::new();
    let stats = with_byte_elements(env, buffer, |bytes| {
        decode_utf8_into(bytes, &mut units, options)
    })??;

    if stats.replacements > 0 {
        log::debug!(
            "decoded {} code units, {} malformed sequences ({})",
            stats.code_units,
            stats.replacements,
            options.malformed
        );
    }
    new_utf16_string(env, &units)
}

/// Splits a `java.lang.String` on `\r` / `\n` into a `String[]` of its
/// non-empty lines.
///
/// # Errors
///
/// Null input and JNI failures.
pub fn split_lines_to_array<'local>(
    env: &mut JNIEnv<'local>,
    text: &JString<'_>,
) -> Result<JObjectArray<'local>, BridgeError> {
    let chars = Utf16Chars::new(env, text)?;
    let units = chars.as_slice();
    let extents = split_lines(units);

    let len = jsize::try_from(extents.len()).map_err(|_| BridgeError::TooLong(extents.len()))?;
    let array = env.new_object_array(len, "java/lang/String", JObject::null())?;
    for (index, extent) in (0..len).zip(&extents) {
        let line = new_utf16_string(env, extent.slice(units))?;
        env.set_object_array_element(&array, index, &line)?;
        env.delete_local_ref(line)?;
    }

    log::trace!("split {} code units into {} lines", units.len(), extents.len());
    Ok(array)
}
