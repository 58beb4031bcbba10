//! Schema loading and reference resolution
//!
//! Schemas are stored as ordinary documents. The resolver fetches them,
//! inlines every `$ref` marker (local `#/` fragments and cross-schema
//! references alike), detects reference cycles, and caches the resolved
//! result per schema id.

mod errors;
mod introspect;
mod resolver;

pub use errors::{SchemaError, SchemaResult};
pub use introspect::{default_values, required_fields};
pub use resolver::SchemaResolver;
