//! Request-context enrichment
//!
//! Lifts recognized string values out of a request context into structured
//! fields on a fresh [`LogInstance`]. Unrecognized keys and non-string values
//! are ignored; enrichment never fails.

use applog_core_types::{ContextKey, ContextValues, Field, Value};

use crate::facade::{global, Facade};
use crate::instance::LogInstance;

/// Fields for every recognized key holding a string value, in key order
pub fn context_fields(ctx: &dyn ContextValues) -> Vec<Field> {
    ContextKey::ALL
        .iter()
        .filter_map(|key| match ctx.value(key.as_str()) {
            Some(Value::Str(value)) => Some(Field::string(key.as_str(), value.clone())),
            _ => None,
        })
        .collect()
}

impl Facade {
    /// Log instance enriched from `ctx`, without caller info
    pub fn enhance(&self, ctx: Option<&dyn ContextValues>) -> LogInstance {
        self.enhanced(ctx, false)
    }

    /// Log instance enriched from `ctx` that also attaches a `caller` field
    /// to every record.
    ///
    /// Caller info is dropped when the facade is uninitialized or `ctx` is
    /// absent.
    pub fn enhance_with_caller_info(&self, ctx: Option<&dyn ContextValues>) -> LogInstance {
        self.enhanced(ctx, true)
    }

    fn enhanced(&self, ctx: Option<&dyn ContextValues>, with_caller_info: bool) -> LogInstance {
        let Some(logger) = self.initialized_logger() else {
            return LogInstance::new(self.nop_logger().clone(), false);
        };
        let Some(ctx) = ctx else {
            return LogInstance::new(logger.clone(), false);
        };
        LogInstance::new(logger.with(&context_fields(ctx)), with_caller_info)
    }
}

/// [`Facade::enhance`] on the process-wide facade
pub fn enhance(ctx: Option<&dyn ContextValues>) -> LogInstance {
    global().enhance(ctx)
}

/// [`Facade::enhance_with_caller_info`] on the process-wide facade.
///
/// Log through the [`log_at!`](crate::log_at) family so the caller names the
/// function each record is logged from.
pub fn enhance_with_caller_info(ctx: Option<&dyn ContextValues>) -> LogInstance {
    global().enhance_with_caller_info(ctx)
}
