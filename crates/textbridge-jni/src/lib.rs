//! JNI entry points for `net.alliedmods.stocks.Utilities`.
//!
//! ```java
//! public native static String fastDecodeUtf8(byte[] buffer);
//! public native static String[] fastSplitLines(String text);
//! ```
//!
//! Each export borrows the Java buffer for the duration of the call only,
//! hands it to [`textbridge`], and builds the result directly from UTF-16 code
//! units. On failure the export logs, raises a Java exception (unless one is
//! already pending) and returns `null`.

mod bridge;
mod config;
mod error;
mod logging;
mod strings;

use core::{ffi::c_void, ptr};

use jni::{
    JNIEnv, JavaVM,
    objects::{JByteArray, JClass, JString},
    sys::{JNI_VERSION_1_6, jint, jobjectArray, jstring},
};

pub use bridge::{decode_utf8_to_jstring, split_lines_to_array};
pub use config::{BridgeConfig, ConfigError, LOG_VAR, POLICY_VAR, config};
pub use error::BridgeError;
pub use logging::init as init_logging;
pub use strings::{Utf16Chars, new_utf16_string};

/// Called by the JVM on `System.loadLibrary`. Reads the configuration and
/// installs the logger, which on Android forwards to logcat through this JVM.
///
/// # Safety
///
/// `vm` must be the `JavaVM` loading this library.
#[unsafe(no_mangle)]
#[allow(non_snake_case)]
pub unsafe extern "system" fn JNI_OnLoad(
    vm: *mut jni::sys::JavaVM,
    _reserved: *mut c_void,
) -> jint {
    let config = config();
    // SAFETY: the JVM passes a pointer to itself that stays valid until unload.
    let vm = unsafe { JavaVM::from_raw(vm) }.ok();
    if let Err(err) = logging::init(config.log_level, vm) {
        // The host already installed a logger; keep using it.
        log::debug!("textbridge logger not installed: {err}");
    }
    for rejected in &config.rejected {
        log::warn!("ignoring configuration: {rejected}");
    }
    log::info!("textbridge loaded, malformed UTF-8 policy: {}", config.malformed);
    JNI_VERSION_1_6
}

/// `String Utilities.fastDecodeUtf8(byte[] buffer)`
#[unsafe(no_mangle)]
#[allow(non_snake_case)]
pub extern "system" fn Java_net_alliedmods_stocks_Utilities_fastDecodeUtf8<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    buffer: JByteArray<'local>,
) -> jstring {
    match decode_utf8_to_jstring(&mut env, &buffer, config().decode_options()) {
        Ok(text) => text.into_raw(),
        Err(err) => {
            log::error!("fastDecodeUtf8: {err}");
            err.throw(&mut env);
            ptr::null_mut()
        }
    }
}

/// `String[] Utilities.fastSplitLines(String text)`
#[unsafe(no_mangle)]
#[allow(non_snake_case)]
pub extern "system" fn Java_net_alliedmods_stocks_Utilities_fastSplitLines<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    text: JString<'local>,
) -> jobjectArray {
    match split_lines_to_array(&mut env, &text) {
        Ok(lines) => lines.into_raw(),
        Err(err) => {
            log::error!("fastSplitLines: {err}");
            err.throw(&mut env);
            ptr::null_mut()
        }
    }
}
