//! Schema-governed CSV row buffer.
//!
//! A [`Table`] holds one rectangular table in memory. Rows are built cell by
//! cell (or parsed from text with [`Table::load`]), closed with
//! [`Table::close_row`], and serialized with [`Table::render`].
//!
//! # Features
//!
//! - **Write-once cells**: a cell of the open row cannot be overwritten.
//! - **Closure**: defaults fill missing cells, required columns are checked.
//! - **Header reconciliation**: strict positional or lenient by-name matching,
//!   with display header overrides remapped to column ids.
//! - **Round trip**: `render` output loads back with the same schema.
//!
//! # Example
//!
//! ```
//! use buddy_model::Schema;
//! use buddy_table::Table;
//!
//! let mut table = Table::new(Schema::new(["id", "value"])?);
//! table.load("id,value\n1,foo\n2,bar\n")?;
//! table.finish()?;
//!
//! assert_eq!(table.len(), 2);
//! assert_eq!(table.row(1).and_then(|row| row.get("value")), Some(&"bar".into()));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod delimited;
mod error;
mod options;
mod row;
mod table;

// === Error Types ===
pub use error::{Result, TableError};

// === Configuration ===
pub use options::{HeaderMode, TableOptions, UnknownColumns};

// === Table ===
pub use row::{Row, RowState};
pub use table::Table;
