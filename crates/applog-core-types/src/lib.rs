//! Core types shared across applog crates
//!
//! This crate provides the vocabulary used by the logging facade:
//!
//! - **Context types**: ContextId, ContextKey, RequestContext, ContextValues
//! - **Field model**: Field and the closed Value variant
//! - **Schema constants**: Canonical record keys and caller sentinels

pub mod context;
pub mod schema;
pub mod value;

pub use context::{attach_context, ContextId, ContextKey, ContextValues, RequestContext};
pub use value::{merge_fields, Field, Value};
