//! Header normalization and reconciliation against the schema.

use buddy_model::Schema;
use tracing::{debug, warn};

use crate::error::{Result, TableError};
use crate::options::HeaderMode;

/// Drops a leading byte order mark. Lenient mode also trims whitespace;
/// strict mode compares the rest verbatim.
pub(crate) fn normalize_header(value: &str, mode: HeaderMode) -> String {
    let value = value.strip_prefix('\u{feff}').unwrap_or(value);
    match mode {
        HeaderMode::Strict => value.to_string(),
        HeaderMode::Lenient => value.trim().to_string(),
    }
}

/// Maps each header field to the id of the column it feeds.
///
/// `None` marks a field that is skipped (lenient mode only).
pub(crate) fn reconcile(
    schema: &Schema,
    fields: &[String],
    mode: HeaderMode,
) -> Result<Vec<Option<String>>> {
    match mode {
        HeaderMode::Strict => reconcile_strict(schema, fields),
        HeaderMode::Lenient => Ok(reconcile_lenient(schema, fields)),
    }
}

fn reconcile_strict(schema: &Schema, fields: &[String]) -> Result<Vec<Option<String>>> {
    if fields.len() != schema.len() {
        return Err(TableError::ColumnCount {
            expected: schema.len(),
            found: fields.len(),
        });
    }

    let mut slots = Vec::with_capacity(fields.len());
    for (position, (column, field)) in schema.iter().zip(fields).enumerate() {
        if field == column.id() {
            slots.push(Some(column.id().to_string()));
        } else if column.header_override() == Some(field.as_str()) {
            debug!(position, column = column.id(), "remapped header to column id");
            slots.push(Some(column.id().to_string()));
        } else {
            return Err(TableError::HeaderMismatch {
                position,
                expected: column.header().to_string(),
                found: field.clone(),
            });
        }
    }
    Ok(slots)
}

fn reconcile_lenient(schema: &Schema, fields: &[String]) -> Vec<Option<String>> {
    fields
        .iter()
        .enumerate()
        .map(|(position, field)| {
            let column = schema.iter().find(|column| column.matches_header(field));
            if column.is_none() {
                warn!(position, field = %field, "skipping header field not declared in schema");
            }
            column.map(|column| column.id().to_string())
        })
        .collect()
}
