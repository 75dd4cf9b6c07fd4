//! Process-wide logger facade
//!
//! A [`Facade`] starts bound to a no-op logger and is initialized at most
//! once. The first caller to win the compare-and-swap on the lifecycle tag
//! builds the active logger; every other caller waits for that build to
//! finish and observes its result. Steady-state logging reads the active
//! logger without locking.
//!
//! The process-wide facade is reachable through [`global`] and the free
//! functions of this module.
//!
//! # Example
//!
//! ```no_run
//! use applog_core::{initialize, infow, Field};
//!
//! initialize(true);
//! infow("service started", &[Field::new("port", 8080)]);
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::OnceLock;

use applog_core_types::Field;

use crate::config::{LoggerConfig, Profile};
use crate::errors::Result;
use crate::level::Severity;
use crate::logger::{Log, Logger};
use crate::record::{Message, Outcome};

const UNINITIALIZED: u8 = 0;
const INITIALIZING: u8 = 1;
const INITIALIZED: u8 = 2;

/// Observable lifecycle of a facade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Initializing,
    Initialized(Profile),
}

#[derive(Debug)]
struct Active {
    profile: Profile,
    logger: Logger,
}

#[derive(Debug)]
pub struct Facade {
    state: AtomicU8,
    active: OnceLock<Active>,
    nop: Logger,
}

impl Default for Facade {
    fn default() -> Self {
        Self::new()
    }
}

impl Facade {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(UNINITIALIZED),
            active: OnceLock::new(),
            nop: Logger::nop(),
        }
    }

    /// Initialize with the production or development profile.
    ///
    /// Returns `true` only for the call that applied the configuration.
    pub fn initialize(&self, production: bool) -> bool {
        self.init(Profile::from_production(production))
    }

    pub fn init(&self, profile: Profile) -> bool {
        self.init_with(LoggerConfig::new(profile))
    }

    /// Initialize from an explicit configuration.
    ///
    /// Losing callers return `false` once the winner has finished, so the
    /// configuration is in place when any call returns.
    pub fn init_with(&self, config: LoggerConfig) -> bool {
        if self
            .state
            .compare_exchange(UNINITIALIZED, INITIALIZING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            self.wait_initialized();
            return false;
        }

        let profile = config.profile;
        let logger = config.build();
        // Only the compare-and-swap winner reaches this point
        let _ = self.active.set(Active { profile, logger });
        self.state.store(INITIALIZED, Ordering::Release);

        tracing::debug!(profile = %profile, "logging facade initialized");
        true
    }

    fn wait_initialized(&self) {
        while self.state.load(Ordering::Acquire) == INITIALIZING {
            std::thread::yield_now();
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        match (self.state.load(Ordering::Acquire), self.active.get()) {
            (INITIALIZED, Some(active)) => Lifecycle::Initialized(active.profile),
            (UNINITIALIZED, _) => Lifecycle::Uninitialized,
            _ => Lifecycle::Initializing,
        }
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.lifecycle(), Lifecycle::Initialized(_))
    }

    /// The raw active logger; the no-op logger before initialization
    pub fn sugared_logger(&self) -> Logger {
        self.current().clone()
    }

    pub(crate) fn current(&self) -> &Logger {
        self.initialized_logger().unwrap_or(&self.nop)
    }

    pub(crate) fn initialized_logger(&self) -> Option<&Logger> {
        self.active.get().map(|active| &active.logger)
    }

    pub(crate) fn nop_logger(&self) -> &Logger {
        &self.nop
    }
}

impl Log for Facade {
    #[track_caller]
    fn log(&self, severity: Severity, message: Message<'_>, fields: &[Field]) -> Outcome {
        self.current().log(severity, message, fields)
    }

    fn sync(&self) -> Result<()> {
        self.current().sync()
    }
}

static GLOBAL: OnceLock<Facade> = OnceLock::new();

/// The process-wide facade
pub fn global() -> &'static Facade {
    GLOBAL.get_or_init(Facade::new)
}

pub fn initialize(production: bool) -> bool {
    global().initialize(production)
}

pub fn init(profile: Profile) -> bool {
    global().init(profile)
}

pub fn init_with(config: LoggerConfig) -> bool {
    global().init_with(config)
}

pub fn lifecycle() -> Lifecycle {
    global().lifecycle()
}

pub fn sugared_logger() -> Logger {
    global().sugared_logger()
}

/// Flush the process-wide logger.
///
/// # Errors
///
/// Returns [`LogError::Flush`](crate::LogError::Flush) when the sink fails
/// to flush.
pub fn sync() -> Result<()> {
    global().sync()
}

#[track_caller]
pub fn debug(args: &[&dyn fmt::Display]) {
    global().debug(args)
}

#[track_caller]
pub fn debugf(args: fmt::Arguments<'_>) {
    global().debugf(args)
}

#[track_caller]
pub fn debugw(msg: &str, fields: &[Field]) {
    global().debugw(msg, fields)
}

#[track_caller]
pub fn info(args: &[&dyn fmt::Display]) {
    global().info(args)
}

#[track_caller]
pub fn infof(args: fmt::Arguments<'_>) {
    global().infof(args)
}

#[track_caller]
pub fn infow(msg: &str, fields: &[Field]) {
    global().infow(msg, fields)
}

#[track_caller]
pub fn warn(args: &[&dyn fmt::Display]) {
    global().warn(args)
}

#[track_caller]
pub fn warnf(args: fmt::Arguments<'_>) {
    global().warnf(args)
}

#[track_caller]
pub fn warnw(msg: &str, fields: &[Field]) {
    global().warnw(msg, fields)
}

#[track_caller]
pub fn error(args: &[&dyn fmt::Display]) {
    global().error(args)
}

#[track_caller]
pub fn errorf(args: fmt::Arguments<'_>) {
    global().errorf(args)
}

#[track_caller]
pub fn errorw(msg: &str, fields: &[Field]) {
    global().errorw(msg, fields)
}

#[track_caller]
pub fn dpanic(args: &[&dyn fmt::Display]) -> Outcome {
    global().dpanic(args)
}

#[track_caller]
pub fn dpanicf(args: fmt::Arguments<'_>) -> Outcome {
    global().dpanicf(args)
}

#[track_caller]
pub fn dpanicw(msg: &str, fields: &[Field]) -> Outcome {
    global().dpanicw(msg, fields)
}

#[track_caller]
pub fn panic(args: &[&dyn fmt::Display]) -> Outcome {
    global().panic(args)
}

#[track_caller]
pub fn panicf(args: fmt::Arguments<'_>) -> Outcome {
    global().panicf(args)
}

#[track_caller]
pub fn panicw(msg: &str, fields: &[Field]) -> Outcome {
    global().panicw(msg, fields)
}

#[track_caller]
pub fn fatal(args: &[&dyn fmt::Display]) -> Outcome {
    global().fatal(args)
}

#[track_caller]
pub fn fatalf(args: fmt::Arguments<'_>) -> Outcome {
    global().fatalf(args)
}

#[track_caller]
pub fn fatalw(msg: &str, fields: &[Field]) -> Outcome {
    global().fatalw(msg, fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Output;
    use crate::test_capture::CaptureSink;
    use std::sync::Arc;

    fn capture_config(profile: Profile, sink: &CaptureSink) -> LoggerConfig {
        LoggerConfig::new(profile).with_output(Output::Sink(Arc::new(sink.clone())))
    }

    #[test]
    fn test_starts_uninitialized_and_silent() {
        let facade = Facade::new();
        assert_eq!(facade.lifecycle(), Lifecycle::Uninitialized);
        assert!(facade.sugared_logger().is_nop());

        facade.info(&[&"dropped"]);
        assert_eq!(facade.panic(&[&"p"]), Outcome::Continue);
        assert!(facade.sync().is_ok());
    }

    #[test]
    fn test_first_init_wins() {
        let facade = Facade::new();
        let first = CaptureSink::new();
        let second = CaptureSink::new();

        assert!(facade.init_with(capture_config(Profile::Production, &first)));
        assert!(!facade.init_with(capture_config(Profile::Development, &second)));
        assert!(!facade.initialize(false));

        assert_eq!(facade.lifecycle(), Lifecycle::Initialized(Profile::Production));
        facade.infow("hello", &[]);
        assert_eq!(first.records().len(), 1);
        assert!(second.records().is_empty());
    }

    #[test]
    fn test_dpanic_follows_profile() {
        let dev = Facade::new();
        dev.init_with(capture_config(Profile::Development, &CaptureSink::new()));
        assert!(!dev.dpanicf(format_args!("bad state")).is_continue());

        let prod = Facade::new();
        prod.init_with(capture_config(Profile::Production, &CaptureSink::new()));
        assert!(prod.dpanicf(format_args!("bad state")).is_continue());
    }
}
