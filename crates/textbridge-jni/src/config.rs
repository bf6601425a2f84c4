use log::LevelFilter;
use once_cell::sync::OnceCell;
use textbridge::{DecodeOptions, MalformedPolicy, UnknownPolicy};
use thiserror::Error;

/// Environment variable selecting the malformed UTF-8 policy
/// (`replace`, `skip` or `strict`).
pub const POLICY_VAR: &str = "TEXTBRIDGE_UTF8_POLICY";

/// Environment variable selecting the log level (`off` .. `trace`).
pub const LOG_VAR: &str = "TEXTBRIDGE_LOG";

static CONFIG: OnceCell<BridgeConfig> = OnceCell::new();

/// Process-wide configuration, read from the environment on first use.
pub fn config() -> &'static BridgeConfig {
    CONFIG.get_or_init(BridgeConfig::from_env)
}

/// A configuration value that was present but could not be used.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `TEXTBRIDGE_UTF8_POLICY` named no known policy.
    #[error("TEXTBRIDGE_UTF8_POLICY: {0}")]
    Policy(UnknownPolicy),
    /// `TEXTBRIDGE_LOG` named no known level.
    #[error("TEXTBRIDGE_LOG: unknown log level {0:?}")]
    LogLevel(String),
}

/// Settings for the exported natives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Policy used by `fastDecodeUtf8`.
    pub malformed: MalformedPolicy,
    /// Maximum level passed to the logger installed by `JNI_OnLoad`.
    pub log_level: LevelFilter,
    /// Values that were ignored in favour of the defaults.
    pub rejected: Vec<ConfigError>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            malformed: MalformedPolicy::Replace,
            log_level: LevelFilter::Warn,
            rejected: Vec::new(),
        }
    }
}

impl BridgeConfig {
    /// Reads [`POLICY_VAR`] and [`LOG_VAR`] from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from `lookup`. Unset keys keep their defaults;
    /// unparsable ones keep their defaults and are recorded in `rejected`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(POLICY_VAR) {
            match raw.parse() {
                Ok(policy) => config.malformed = policy,
                Err(err) => config.rejected.push(ConfigError::Policy(err)),
            }
        }

        if let Some(raw) = lookup(LOG_VAR) {
            match raw.trim().parse() {
                Ok(level) => config.log_level = level,
                Err(_) => config.rejected.push(ConfigError::LogLevel(raw)),
            }
        }

        config
    }

    /// Decode options for `fastDecodeUtf8`.
    #[must_use]
    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            malformed: self.malformed,
            ..DecodeOptions::default()
        }
    }
}
