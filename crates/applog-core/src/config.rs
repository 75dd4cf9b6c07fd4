//! Logger configuration
//!
//! A [`LoggerConfig`] picks the production or development policy and the
//! record destination. Facade initialization calls [`LoggerConfig::build`]
//! exactly once.

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use std::sync::Arc;

use applog_core_types::schema::{ENV_LEVEL, ENV_NAME, ENV_PROFILE};

use crate::encoder::{ConsoleEncoder, Encoder, EncoderConfig, JsonEncoder};
use crate::errors::{LogError, Result};
use crate::level::Severity;
use crate::logger::{Logger, LoggerOptions};
use crate::sink::{Sink, WriterSink};

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Profile {
    /// Console output on stderr, debug and above, DPanic escalates
    Development,
    /// JSON output on stdout, info and above
    Production,
}

impl Profile {
    pub fn from_production(production: bool) -> Self {
        if production {
            Profile::Production
        } else {
            Profile::Development
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Profile::Production)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Profile::Development => "development",
            Profile::Production => "production",
        }
    }

    /// Lowest severity written by default
    pub fn min_level(&self) -> Severity {
        match self {
            Profile::Development => Severity::Debug,
            Profile::Production => Severity::Info,
        }
    }

    /// Lowest severity that captures a stacktrace
    pub fn stacktrace_level(&self) -> Severity {
        match self {
            Profile::Development => Severity::Warn,
            Profile::Production => Severity::Error,
        }
    }

    pub fn encoder_config(&self) -> EncoderConfig {
        match self {
            Profile::Development => EncoderConfig::development(),
            Profile::Production => EncoderConfig::production(),
        }
    }

    fn encoder(&self) -> Box<dyn Encoder> {
        match self {
            Profile::Development => Box::new(ConsoleEncoder::new(self.encoder_config())),
            Profile::Production => Box::new(JsonEncoder::new(self.encoder_config())),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Profile {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Profile::Production),
            "development" | "dev" => Ok(Profile::Development),
            _ => Err(LogError::InvalidProfile(s.to_string())),
        }
    }
}

/// Where records go
pub enum Output {
    Stdout,
    Stderr,
    /// Any writer, encoded with the profile's encoder
    Writer(Box<dyn Write + Send>),
    /// A ready-made sink; the profile's encoder and level are not applied
    Sink(Arc<dyn Sink>),
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Stdout => f.write_str("Stdout"),
            Output::Stderr => f.write_str("Stderr"),
            Output::Writer(_) => f.write_str("Writer(..)"),
            Output::Sink(sink) => f.debug_tuple("Sink").field(sink).finish(),
        }
    }
}

#[derive(Debug)]
pub struct LoggerConfig {
    pub profile: Profile,
    pub name: Option<String>,
    /// Overrides the profile's minimum severity
    pub level: Option<Severity>,
    pub output: Output,
}

impl LoggerConfig {
    pub fn new(profile: Profile) -> Self {
        let output = match profile {
            Profile::Development => Output::Stderr,
            Profile::Production => Output::Stdout,
        };
        Self {
            profile,
            name: None,
            level: None,
            output,
        }
    }

    pub fn production() -> Self {
        Self::new(Profile::Production)
    }

    pub fn development() -> Self {
        Self::new(Profile::Development)
    }

    /// Switch to `profile`, moving the output to that profile's stream
    pub fn with_profile(self, profile: Profile) -> Self {
        Self {
            profile,
            output: Self::new(profile).output,
            ..self
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_level(mut self, level: Severity) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_output(mut self, output: Output) -> Self {
        self.output = output;
        self
    }

    /// Read `APPLOG_PROFILE`, `APPLOG_LEVEL` and `APPLOG_NAME`.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::InvalidProfile`] or [`LogError::InvalidLevel`] for
    /// unrecognized values.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) against any variable lookup.
    ///
    /// Unset and empty variables fall back to the development defaults.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::InvalidProfile`] or [`LogError::InvalidLevel`] for
    /// unrecognized values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let profile = match read(ENV_PROFILE) {
            Some(raw) => raw.parse()?,
            None => Profile::Development,
        };
        let mut config = Self::new(profile);
        if let Some(raw) = read(ENV_LEVEL) {
            config.level = Some(raw.parse()?);
        }
        config.name = read(ENV_NAME);
        Ok(config)
    }

    pub fn min_level(&self) -> Severity {
        self.level.unwrap_or_else(|| self.profile.min_level())
    }

    /// Build the logger described by this configuration
    pub fn build(self) -> Logger {
        let min_level = self.min_level();
        let LoggerConfig {
            profile,
            name,
            output,
            ..
        } = self;

        let writer = |out: Box<dyn Write + Send>| -> Arc<dyn Sink> {
            Arc::new(WriterSink::from_parts(profile.encoder(), out, min_level))
        };
        let sink = match output {
            Output::Stdout => writer(Box::new(io::stdout())),
            Output::Stderr => writer(Box::new(io::stderr())),
            Output::Writer(out) => writer(out),
            Output::Sink(sink) => sink,
        };

        Logger::new(
            sink,
            LoggerOptions {
                name,
                development: !profile.is_production(),
                stacktrace_level: Some(profile.stacktrace_level()),
                escalate: true,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_profile_parsing() {
        assert_eq!("production".parse::<Profile>().unwrap(), Profile::Production);
        assert_eq!("Dev".parse::<Profile>().unwrap(), Profile::Development);
        let err = "staging".parse::<Profile>().unwrap_err();
        assert_eq!(err.code(), "ERR_INVALID_PROFILE");
    }

    #[test]
    fn test_profile_policies() {
        assert_eq!(Profile::Production.min_level(), Severity::Info);
        assert_eq!(Profile::Development.min_level(), Severity::Debug);
        assert_eq!(Profile::Production.stacktrace_level(), Severity::Error);
        assert_eq!(Profile::Development.stacktrace_level(), Severity::Warn);
        assert_eq!(Profile::from_production(true), Profile::Production);
    }

    #[test]
    fn test_default_outputs() {
        assert!(matches!(LoggerConfig::production().output, Output::Stdout));
        assert!(matches!(LoggerConfig::development().output, Output::Stderr));
    }

    #[test]
    fn test_from_lookup() {
        let config = LoggerConfig::from_lookup(lookup(&[
            ("APPLOG_PROFILE", "production"),
            ("APPLOG_LEVEL", "warn"),
            ("APPLOG_NAME", "billing"),
        ]))
        .unwrap();
        assert_eq!(config.profile, Profile::Production);
        assert_eq!(config.min_level(), Severity::Warn);
        assert_eq!(config.name.as_deref(), Some("billing"));
    }

    #[test]
    fn test_with_profile_keeps_name_and_level() {
        let config = LoggerConfig::from_lookup(lookup(&[
            ("APPLOG_NAME", "billing"),
            ("APPLOG_LEVEL", "error"),
        ]))
        .unwrap()
        .with_profile(Profile::Production);

        assert_eq!(config.profile, Profile::Production);
        assert!(matches!(config.output, Output::Stdout));
        assert_eq!(config.name.as_deref(), Some("billing"));
        assert_eq!(config.min_level(), Severity::Error);
    }

    #[test]
    fn test_from_lookup_defaults_and_errors() {
        let config = LoggerConfig::from_lookup(lookup(&[("APPLOG_PROFILE", "")])).unwrap();
        assert_eq!(config.profile, Profile::Development);
        assert_eq!(config.min_level(), Severity::Debug);
        assert!(config.name.is_none());

        let err = LoggerConfig::from_lookup(lookup(&[("APPLOG_LEVEL", "loud")])).unwrap_err();
        assert_eq!(err.code(), "ERR_INVALID_LEVEL");
    }

    #[test]
    fn test_build_applies_level_override() {
        let logger = LoggerConfig::production()
            .with_level(Severity::Error)
            .with_output(Output::Writer(Box::new(io::sink())))
            .with_name("svc")
            .build();
        assert!(!logger.sink().enabled(Severity::Warn));
        assert!(logger.sink().enabled(Severity::Error));
        assert_eq!(logger.name(), Some("svc"));
        assert!(!logger.is_development());
    }
}
