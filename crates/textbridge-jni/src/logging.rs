use jni::{
    JNIEnv, JavaVM,
    objects::{JObject, JValue},
    sys::jint,
};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

const TAG: &str = "textbridge";

/// `android.util.Log`, present in every Android runtime.
const LOG_CLASS: &str = "android/util/Log";
const PRINTLN_SIG: &str = "(ILjava/lang/String;Ljava/lang/String;)I";

/// Forwards records to `android.util.Log.println` through the JVM that loaded
/// the library, so they land in logcat. App stdio goes to `/dev/null` on
/// Android; stderr is only used when no JVM is held (host builds) or the
/// current thread cannot call into Java.
struct BridgeLogger {
    level: LevelFilter,
    vm: Option<JavaVM>,
}

impl Log for BridgeLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let forwarded = self
            .vm
            .as_ref()
            .and_then(|vm| vm.get_env().ok())
            .is_some_and(|mut env| forward(&mut env, record));
        if !forwarded {
            eprintln!("{}", format_record(record));
        }
    }

    fn flush(&self) {}
}

fn format_record(record: &Record<'_>) -> String {
    format!("[{TAG}] {:<5} {}: {}", record.level(), record.target(), record.args())
}

/// `android.util.Log` priority for `level`.
fn priority(level: Level) -> jint {
    match level {
        Level::Trace => 2,
        Level::Debug => 3,
        Level::Info => 4,
        Level::Warn => 5,
        Level::Error => 6,
    }
}

/// Hands `record` to `android.util.Log`. Returns `false` when it was not
/// delivered; a pending exception is left untouched and none is left behind.
///
/// Failures are never reported through `log`, which would recurse.
fn forward(env: &mut JNIEnv<'_>, record: &Record<'_>) -> bool {
    if env.exception_check().unwrap_or(true) {
        return false;
    }
    let message = format!("{}: {}", record.target(), record.args());
    let sent = env.with_local_frame(4, |env| -> jni::errors::Result<()> {
        let tag = JObject::from(env.new_string(TAG)?);
        let text = JObject::from(env.new_string(&message)?);
        env.call_static_method(
            LOG_CLASS,
            "println",
            PRINTLN_SIG,
            &[
                JValue::Int(priority(record.level())),
                JValue::Object(&tag),
                JValue::Object(&text),
            ],
        )?;
        Ok(())
    });
    if sent.is_err() {
        // ClassNotFound and friends raised by the attempt itself.
        let _ = env.exception_clear();
    }
    sent.is_ok()
}

/// Installs the logger at `level`. With a `vm` on Android, records go to
/// logcat; otherwise they are written to stderr.
///
/// # Errors
///
/// Fails if the process already has a `log` logger; that logger is left in
/// place.
pub fn init(level: LevelFilter, vm: Option<JavaVM>) -> Result<(), SetLoggerError> {
    let vm = vm.filter(|_| cfg!(target_os = "android"));
    log::set_boxed_logger(Box::new(BridgeLogger { level, vm }))?;
    log::set_max_level(level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_carry_tag_level_and_target() {
        let line = format_record(
            &Record::builder()
                .args(format_args!("decoded {} units", 3))
                .level(Level::Warn)
                .target("textbridge_jni::bridge")
                .build(),
        );
        assert_eq!(line, "[textbridge] WARN  textbridge_jni::bridge: decoded 3 units");
    }

    #[test]
    fn level_filter_is_respected() {
        let logger = BridgeLogger {
            level: LevelFilter::Info,
            vm: None,
        };
        let debug = Metadata::builder().level(Level::Debug).build();
        let error = Metadata::builder().level(Level::Error).build();
        assert!(!logger.enabled(&debug));
        assert!(logger.enabled(&error));
    }

    #[test]
    fn levels_map_to_logcat_priorities() {
        // VERBOSE, DEBUG, INFO, WARN, ERROR
        let priorities = [Level::Trace, Level::Debug, Level::Info, Level::Warn, Level::Error]
            .map(priority);
        assert_eq!(priorities, [2, 3, 4, 5, 6]);
    }

    #[cfg(feature = "invocation")]
    mod jvm {
        use jni::InitArgsBuilder;
        use once_cell::sync::Lazy;

        use super::*;

        static JVM: Lazy<JavaVM> = Lazy::new(|| {
            let args = InitArgsBuilder::new().build().expect("JVM init args");
            JavaVM::new(args).expect("start JVM")
        });

        fn forward_warning(env: &mut JNIEnv<'_>) -> bool {
            forward(
                env,
                &Record::builder()
                    .args(format_args!("ignoring configuration"))
                    .level(Level::Warn)
                    .target("textbridge_jni")
                    .build(),
            )
        }

        #[test]
        fn forward_without_android_log_leaves_no_exception() {
            let mut env = JVM.attach_current_thread().expect("attach");
            // A desktop JVM has no android.util.Log.
            assert!(!forward_warning(&mut env));
            assert!(!env.exception_check().expect("exception check"));
        }

        #[test]
        fn forward_keeps_pending_exception() {
            let mut env = JVM.attach_current_thread().expect("attach");
            env.throw_new("java/lang/IllegalStateException", "pending")
                .expect("throw");

            assert!(!forward_warning(&mut env));
            assert!(env.exception_check().expect("exception check"));
            env.exception_clear().expect("exception clear");
        }
    }
}
