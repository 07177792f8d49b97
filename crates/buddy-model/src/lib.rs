//! Schema model for schema-governed CSV tables.
//!
//! A [`Schema`] is an ordered list of [`ColumnSpec`]s normalized once from
//! raw declarations, either programmatically through [`SchemaEntry`] or from
//! a JSON descriptor with [`Schema::from_json`]. Each column carries an
//! optional display header, a [`ColumnDefault`], a required flag and a
//! validation [`Rule`].
//!
//! # Example
//!
//! ```
//! use buddy_model::{ColumnParams, Schema, SchemaEntry, Value, ValueKind};
//!
//! let schema = Schema::new([
//!     SchemaEntry::from("name"),
//!     SchemaEntry::named("age", ColumnParams::new().kind(ValueKind::Integer).default(0)),
//! ])?;
//!
//! let age = schema.column("age").unwrap();
//! assert!(age.validate(&Value::Integer(30)));
//! assert!(!age.validate(&Value::from("thirty")));
//! # Ok::<(), buddy_model::SchemaError>(())
//! ```

mod column;
mod descriptor;
mod error;
mod schema;
mod value;

// === Error Types ===
pub use descriptor::DescriptorError;
pub use error::{Result, SchemaError};

// === Schema ===
pub use column::{ColumnDefault, ColumnParams, ColumnSpec, Rule};
pub use schema::{Schema, SchemaEntry};

// === Values ===
pub use value::{Value, ValueKind};
