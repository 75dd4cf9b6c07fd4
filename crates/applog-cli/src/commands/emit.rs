//! Emit command
//!
//! Usage: applog emit [--production] [--context-id <ID>] [--user-id <ID>] <SEVERITY> <MESSAGE>
//!
//! The configuration starts from `APPLOG_PROFILE`, `APPLOG_LEVEL` and
//! `APPLOG_NAME`; flags override it.

use std::sync::Arc;

use applog_core::{
    enhance, enhance_with_caller_info, install_tracing_subscriber, log_at, ContextKey,
    ContextValues, Log, LogError, LoggerConfig, Output, Profile, RequestContext, Severity,
    TracingSink,
};
use clap::{Args, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SinkKind {
    /// Encoded records on stdout (production) or stderr (development)
    Writer,
    /// `tracing` events through the installed subscriber
    Tracing,
}

#[derive(Debug, Args)]
pub struct EmitArgs {
    /// Record severity (debug, info, warn, error, dpanic, panic, fatal)
    pub severity: Severity,

    /// Record message
    pub message: String,

    /// Use the production profile instead of `APPLOG_PROFILE`
    #[arg(long)]
    pub production: bool,

    /// Logger name (default: `APPLOG_NAME`)
    #[arg(long)]
    pub name: Option<String>,

    /// Minimum severity written (default: `APPLOG_LEVEL`, then the profile's)
    #[arg(long)]
    pub level: Option<Severity>,

    /// Request context id to attach
    #[arg(long)]
    pub context_id: Option<String>,

    /// Request user id to attach
    #[arg(long)]
    pub user_id: Option<String>,

    /// Attach a `caller` field naming the call site
    #[arg(long)]
    pub caller_info: bool,

    /// Record destination
    #[arg(long, value_enum, default_value_t = SinkKind::Writer)]
    pub sink: SinkKind,
}

impl EmitArgs {
    fn config(&self) -> Result<LoggerConfig, LogError> {
        let mut config = LoggerConfig::from_env()?;
        if self.production {
            config = config.with_profile(Profile::Production);
        }
        if let Some(name) = &self.name {
            config = config.with_name(name.clone());
        }
        if let Some(level) = self.level {
            config = config.with_level(level);
        }
        if self.sink == SinkKind::Tracing {
            install_tracing_subscriber(config.profile);
            config = config.with_output(Output::Sink(Arc::new(TracingSink::new())));
        }
        Ok(config)
    }

    /// A request context when any context value was given
    fn request_context(&self) -> Option<RequestContext> {
        let values = [
            (ContextKey::ContextId, &self.context_id),
            (ContextKey::UserId, &self.user_id),
        ];
        if values.iter().all(|(_, value)| value.is_none()) {
            return None;
        }
        let ctx = values
            .into_iter()
            .fold(RequestContext::new(), |ctx, (key, value)| match value {
                Some(value) => ctx.attach(key, value.as_str()),
                None => ctx,
            });
        Some(ctx)
    }
}

/// Execute emit command
pub fn execute(args: EmitArgs) -> Result<(), Box<dyn std::error::Error>> {
    applog_core::init_with(args.config()?);

    let ctx = args.request_context();
    let ctx = ctx.as_ref().map(|c| c as &dyn ContextValues);
    let log = if args.caller_info {
        enhance_with_caller_info(ctx)
    } else {
        enhance(ctx)
    };

    let outcome = log_at!(log, args.severity, "{}", args.message);
    log.sync()?;
    outcome.escalate();

    Ok(())
}
