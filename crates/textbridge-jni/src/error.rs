use jni::JNIEnv;
use textbridge::Utf8Error;
use thiserror::Error;

/// Failure inside one of the exported natives.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The Java caller passed `null`.
    #[error("argument `{0}` is null")]
    NullArgument(&'static str),
    /// Strict decoding rejected the input.
    #[error("malformed UTF-8: {0}")]
    Decode(#[from] Utf8Error),
    /// A call through the `jni` crate failed.
    #[error("JNI call failed: {0}")]
    Jni(#[from] jni::errors::Error),
    /// The JNI function table lacks an entry we call directly.
    #[error("JNI function table has no {0}")]
    MissingFunction(&'static str),
    /// A raw JNI allocation returned null; the JVM has an exception pending.
    #[error("{0} returned null")]
    NullResult(&'static str),
    /// The result has more elements than a Java array or string can hold.
    #[error("{0} elements do not fit in a Java array")]
    TooLong(usize),
}

impl BridgeError {
    /// Java exception class raised for this error.
    #[must_use]
    pub fn exception_class(&self) -> &'static str {
        match self {
            BridgeError::NullArgument(_) => "java/lang/NullPointerException",
            BridgeError::Decode(_) => "java/lang/IllegalArgumentException",
            BridgeError::NullResult(_) | BridgeError::TooLong(_) => "java/lang/OutOfMemoryError",
            BridgeError::Jni(_) | BridgeError::MissingFunction(_) => {
                "java/lang/IllegalStateException"
            }
        }
    }

    /// Raises the matching Java exception, unless the JVM already has one
    /// pending (which is then the more precise report).
    pub fn throw(&self, env: &mut JNIEnv<'_>) {
        match env.exception_check() {
            Ok(true) => return,
            Ok(false) => {}
            Err(err) => {
                log::error!("cannot check for pending exception: {err}");
                return;
            }
        }
        let class = self.exception_class();
        if let Err(err) = env.throw_new(class, self.to_string()) {
            log::error!("failed to raise {class}: {err}");
        }
    }
}
