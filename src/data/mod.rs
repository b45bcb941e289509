//! Schema data model, path addressing, and the field registry.
//!
//! Everything the engine knows about a form lives here:
//!
//! - [`path`] - structured paths and their flat serialized form
//! - [`schema`] - parse-time classification of the schema document
//! - [`registry`] - live per-field state keyed by path

/// Structural path addressing.
pub mod path;

/// Live field state keyed by path.
pub mod registry;

/// Schema document classification.
pub mod schema;

pub use path::FieldPath;
pub use registry::{FieldEntry, FieldRegistry, FieldValue};
pub use schema::{FieldConfig, FieldKind, GroupNode, OptionSource, SchemaNode, SchemaRoot};
