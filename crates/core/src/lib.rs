//! # sqlweave-core: Foundation types for the sqlweave template engine
//!
//! This crate provides the value model and the binding-context abstraction
//! consumed by `sqlweave-template`: the `Value` union covering every type a
//! placeholder can resolve to, the `Context` lookup trait, and the concrete
//! `Bindings` map implementation.

pub mod context;
pub mod value;

// Re-export core traits and types
pub use context::{Bindings, Context};
pub use value::Value;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
