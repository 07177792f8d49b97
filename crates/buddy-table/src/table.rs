//! The row buffer: cell writes, row closure and row access.

use std::collections::BTreeMap;
use std::fmt;

use buddy_model::{Schema, SchemaEntry, Value};
use tracing::{debug, trace};

use crate::error::{Result, TableError};
use crate::options::{TableOptions, UnknownColumns};
use crate::row::Row;

/// Whether a write runs the column's validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Check {
    /// Programmatic writes.
    Validate,
    /// Raw fields from loaded text.
    Trust,
}

/// A single rectangular table governed by a [`Schema`].
///
/// Rows are written cell by cell into the open row, then closed. Closing
/// fills defaults and checks required columns. The open row is created by
/// the first write after a closure.
///
/// ```
/// use buddy_model::{ColumnParams, Schema, SchemaEntry, Value, ValueKind};
/// use buddy_table::Table;
///
/// let schema = Schema::new([
///     SchemaEntry::from("name"),
///     SchemaEntry::named("age", ColumnParams::new().kind(ValueKind::Integer).default(0)),
/// ])?;
/// let mut table = Table::new(schema);
/// table.add_row([("name", Value::from("Alice")), ("age", Value::from(30))])?;
/// table.add_row([("name", "Bob")])?;
///
/// assert_eq!(table.render()?, "name,age\nAlice,30\nBob,0\n");
/// # Ok::<(), buddy_table::TableError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Table {
    pub(crate) schema: Schema,
    pub(crate) options: TableOptions,
    pub(crate) rows: Vec<Row>,
    pub(crate) open: Option<Row>,
}

impl Table {
    pub fn new(schema: Schema) -> Self {
        Self::with_options(schema, TableOptions::default())
    }

    pub fn with_options(schema: Schema, options: TableOptions) -> Self {
        Self {
            schema,
            options,
            rows: Vec::new(),
            open: None,
        }
    }

    /// Normalizes raw schema entries and creates an empty table.
    pub fn from_entries<I, E>(entries: I, options: TableOptions) -> Result<Self>
    where
        I: IntoIterator<Item = E>,
        E: Into<SchemaEntry>,
    {
        Ok(Self::with_options(Schema::new(entries)?, options))
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    /// Index of the open row, equal to the number of closed rows.
    pub fn cursor(&self) -> usize {
        self.rows.len()
    }

    // === Cell Writes ===

    /// Writes a validated value into the open row.
    ///
    /// # Errors
    ///
    /// - [`TableError::UnknownColumn`] when the column is not declared and
    ///   unknown columns are rejected.
    /// - [`TableError::Validation`] when the value fails the column rule.
    /// - [`TableError::DuplicateCell`] when the cell already holds a value.
    pub fn set(&mut self, column: &str, value: impl Into<Value>) -> Result<&mut Self> {
        self.put(column, value.into(), Check::Validate)?;
        Ok(self)
    }

    /// Same as [`Table::set`].
    pub fn set_column(&mut self, column: &str, value: impl Into<Value>) -> Result<&mut Self> {
        self.set(column, value)
    }

    /// Reads a cell of the open row.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.open.as_ref()?.get(column)
    }

    /// Writes every given cell, then closes the row.
    ///
    /// All cells are checked before any is written, so a rejected cell
    /// leaves the open row untouched.
    pub fn add_row<I, K, V>(&mut self, cells: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut staged = Vec::new();
        let mut filled = BTreeMap::new();
        for (column, value) in cells {
            let column = column.as_ref();
            let value = value.into();
            let Some(position) = self.prepare(column, &value, Check::Validate)? else {
                continue;
            };
            if filled.get(&position).copied().unwrap_or(false) {
                return Err(TableError::DuplicateCell {
                    column: column.to_string(),
                    row: self.cursor(),
                });
            }
            filled.insert(position, !value.is_empty());
            staged.push((position, value));
        }
        for (position, value) in staged {
            self.write(position, value);
        }
        self.close_row()
    }

    pub(crate) fn put(&mut self, column: &str, value: Value, check: Check) -> Result<()> {
        if let Some(position) = self.prepare(column, &value, check)? {
            self.write(position, value);
        }
        Ok(())
    }

    /// Resolves the column position and checks the write without touching
    /// the table. `None` means the write is dropped.
    fn prepare(&self, column: &str, value: &Value, check: Check) -> Result<Option<usize>> {
        let Some(position) = self.resolve(column, value, check)? else {
            return Ok(None);
        };
        if self.open.as_ref().is_some_and(|row| row.is_filled(column)) {
            return Err(TableError::DuplicateCell {
                column: column.to_string(),
                row: self.cursor(),
            });
        }
        Ok(Some(position))
    }

    /// Unknown-column policy and validation rule, without the write-once check.
    fn resolve(&self, column: &str, value: &Value, check: Check) -> Result<Option<usize>> {
        let Some(position) = self.schema.position(column) else {
            return match self.options.unknown_columns {
                UnknownColumns::Reject => Err(TableError::UnknownColumn {
                    column: column.to_string(),
                }),
                UnknownColumns::Ignore => {
                    debug!(column, "ignoring write to undeclared column");
                    Ok(None)
                }
            };
        };
        if check == Check::Validate && !self.schema.columns()[position].validate(value) {
            return Err(TableError::Validation {
                column: column.to_string(),
                value: value.to_string(),
            });
        }
        Ok(Some(position))
    }

    fn write(&mut self, position: usize, value: Value) {
        let cursor = self.rows.len();
        let row = self.open.get_or_insert_with(|| Row::open(cursor));
        row.insert(self.schema.columns()[position].id(), value);
    }

    /// Materializes the open row even if no cell gets written.
    pub(crate) fn begin_row(&mut self) {
        let cursor = self.rows.len();
        self.open.get_or_insert_with(|| Row::open(cursor));
    }

    // === Row Closure ===

    /// Closes the open row.
    ///
    /// Missing or null cells take the column default for this row index.
    /// Required columns must then be non-null, except in row 0 which is
    /// exempt. Without an open row this does nothing.
    ///
    /// # Errors
    ///
    /// [`TableError::RequiredField`] names the first empty required column.
    /// The open row is left as it was.
    pub fn close_row(&mut self) -> Result<&mut Self> {
        let Some(row) = self.open.take() else {
            return Ok(self);
        };
        match self.complete(&row) {
            Ok(cells) => {
                trace!(row = row.index(), "closed row");
                self.rows.push(row.close(cells));
                Ok(self)
            }
            Err(err) => {
                self.open = Some(row);
                Err(err)
            }
        }
    }

    /// Cells of `row` with defaults applied, after the required check.
    fn complete(&self, row: &Row) -> Result<BTreeMap<String, Value>> {
        let index = row.index();
        let mut cells = row.cells().clone();
        for column in &self.schema {
            let slot = cells.entry(column.id().to_string()).or_default();
            if slot.is_null() {
                *slot = column.default_for(index);
            }
        }

        if index > 0
            && let Some(column) = self.schema.iter().find(|column| {
                column.is_required() && cells.get(column.id()).is_none_or(Value::is_null)
            })
        {
            return Err(TableError::RequiredField {
                column: column.id().to_string(),
                row: index,
            });
        }
        Ok(cells)
    }

    /// Same as [`Table::close_row`].
    pub fn new_row(&mut self) -> Result<&mut Self> {
        self.close_row()
    }

    /// Same as [`Table::close_row`].
    pub fn end_row(&mut self) -> Result<&mut Self> {
        self.close_row()
    }

    /// Closes a dangling open row, for example the last row of a load.
    pub fn finish(&mut self) -> Result<&mut Self> {
        self.close_row()
    }

    // === Row Replacement ===

    /// Replaces the closed row at `index` with a row built from `cells`.
    ///
    /// Cells are checked as in [`Table::add_row`]; defaults and the required
    /// check then apply for `index`. On error the stored row is kept.
    ///
    /// # Errors
    ///
    /// [`TableError::RowOutOfRange`] when `index` is not a closed row, or any
    /// error of [`Table::add_row`].
    pub fn replace_row<I, K, V>(&mut self, index: usize, cells: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        if index >= self.rows.len() {
            return Err(TableError::RowOutOfRange {
                index,
                len: self.rows.len(),
            });
        }
        let mut row = Row::open(index);
        for (column, value) in cells {
            let column = column.as_ref();
            let value = value.into();
            let Some(position) = self.resolve(column, &value, Check::Validate)? else {
                continue;
            };
            let id = self.schema.columns()[position].id();
            if row.is_filled(id) {
                return Err(TableError::DuplicateCell {
                    column: column.to_string(),
                    row: index,
                });
            }
            row.insert(id, value);
        }
        let cells = self.complete(&row)?;
        self.rows[index] = row.close(cells);
        trace!(row = index, "replaced row");
        Ok(self)
    }

    /// Removes and returns the closed row at `index`.
    ///
    /// Later rows, and the open row, move up by one. Stored cells are kept
    /// as they are, including defaults resolved for the old index.
    pub fn remove_row(&mut self, index: usize) -> Option<Row> {
        if index >= self.rows.len() {
            return None;
        }
        let removed = self.rows.remove(index);
        for row in self.rows.iter_mut().skip(index) {
            row.set_index(row.index() - 1);
        }
        if let Some(open) = self.open.as_mut() {
            open.set_index(self.rows.len());
        }
        trace!(row = index, "removed row");
        Some(removed)
    }

    /// Drops every row.
    pub fn clear(&mut self) {
        self.rows.clear();
        self.open = None;
    }

    // === Row Access ===

    /// Number of closed rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when there are neither closed rows nor an open row.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.open.is_none()
    }

    /// Closed row by index, or the open row at [`Table::cursor`].
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows
            .get(index)
            .or_else(|| self.open.as_ref().filter(|row| row.index() == index))
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn open_row(&self) -> Option<&Row> {
        self.open.as_ref()
    }

    /// Iterates closed rows.
    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    /// Closed rows followed by the open row, if any.
    pub(crate) fn all_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().chain(self.open.as_ref())
    }

    /// Dumps the stored cells as a JSON array of objects, closed rows first.
    ///
    /// Cells are emitted as stored: no default substitution for the open row.
    pub fn to_json(&self) -> serde_json::Value {
        let rows = self
            .all_rows()
            .map(|row| {
                let object = self
                    .schema
                    .ids()
                    .filter_map(|id| row.get(id).map(|value| (id.to_string(), value.to_json())))
                    .collect::<serde_json::Map<_, _>>();
                serde_json::Value::Object(object)
            })
            .collect();
        serde_json::Value::Array(rows)
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Renders the table as CSV.
impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.render().map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buddy_model::{ColumnParams, ValueKind};

    fn people() -> Table {
        Table::from_entries(
            [
                SchemaEntry::named("name", ColumnParams::new().required(true)),
                SchemaEntry::named("age", ColumnParams::new().kind(ValueKind::Integer).default(0)),
            ],
            TableOptions::default(),
        )
        .expect("schema")
    }

    #[test]
    fn first_write_materializes_open_row() {
        let mut table = people();
        assert!(table.is_empty());
        assert!(table.open_row().is_none());

        table.set("name", "Alice").expect("set name");
        assert_eq!(table.get("name"), Some(&Value::from("Alice")));
        assert_eq!(table.cursor(), 0);
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn failed_write_does_not_open_row() {
        let mut table = people();
        let err = table.set("age", "thirty").expect_err("kind rule");
        assert!(matches!(err, TableError::Validation { .. }));
        assert!(table.open_row().is_none());
    }

    #[test]
    fn close_without_open_row_is_noop() {
        let mut table = people();
        table.close_row().expect("close");
        table.close_row().expect("close");
        assert_eq!(table.cursor(), 0);
        assert!(table.is_empty());
    }

    #[test]
    fn close_fills_every_column() {
        let mut table = people();
        table.set("name", "Alice").expect("set");
        table.close_row().expect("close");

        let row = table.row(0).expect("row 0");
        assert!(row.is_closed());
        assert_eq!(row.len(), 2);
        assert_eq!(row.get("age"), Some(&Value::Integer(0)));
        assert_eq!(table.cursor(), 1);
        assert!(table.open_row().is_none());
    }

    #[test]
    fn required_failure_restores_open_row() {
        let mut table = people();
        table.add_row([("name", "Alice")]).expect("row 0");
        table.set("age", 40).expect("set age");

        let err = table.close_row().expect_err("required name");
        assert!(matches!(err, TableError::RequiredField { ref column, row: 1 } if column == "name"));
        let open = table.open_row().expect("open row kept");
        assert_eq!(open.get("age"), Some(&Value::Integer(40)));
        assert!(open.get("name").is_none());

        table.set("name", "Bob").expect("fill name");
        table.close_row().expect("close");
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn add_row_is_checked_before_writing() {
        let mut table = people();
        let err = table
            .add_row([("name", Value::from("Alice")), ("age", Value::from("x"))])
            .expect_err("invalid age");
        assert!(matches!(err, TableError::Validation { .. }));
        assert!(table.open_row().is_none());

        let err = table
            .add_row([("name", "Alice"), ("name", "Alicia")])
            .expect_err("same cell twice");
        assert!(matches!(err, TableError::DuplicateCell { row: 0, .. }));
        assert!(table.open_row().is_none());
    }

    #[test]
    fn row_access_includes_open_row_at_cursor() {
        let mut table = people();
        table.add_row([("name", "Alice")]).expect("row 0");
        table.set("name", "Bob").expect("open row");

        assert_eq!(table.row(0).map(Row::is_closed), Some(true));
        assert_eq!(table.row(1).map(Row::is_closed), Some(false));
        assert!(table.row(2).is_none());
        assert_eq!(table.iter().count(), 1);
        assert_eq!((&table).into_iter().count(), 1);
    }

    #[test]
    fn computed_default_uses_closing_row_index() {
        let mut table = Table::from_entries(
            [
                SchemaEntry::from("name"),
                SchemaEntry::named(
                    "seq",
                    ColumnParams::new().computed_default(|row| Value::Integer(row as i64 * 10)),
                ),
            ],
            TableOptions::default(),
        )
        .expect("schema");
        for name in ["a", "b", "c"] {
            table.add_row([("name", name)]).expect("add row");
        }
        table.add_row([("name", "d"), ("seq", "manual")]).expect("explicit seq");

        let seq: Vec<_> = table.iter().map(|row| row.get("seq").cloned()).collect();
        assert_eq!(
            seq,
            vec![
                Some(Value::Integer(0)),
                Some(Value::Integer(10)),
                Some(Value::Integer(20)),
                Some(Value::from("manual")),
            ]
        );
    }

    #[test]
    fn replace_row_checks_and_fills_defaults() {
        let mut table = people();
        table.add_row([("name", "Alice")]).expect("row 0");
        table
            .add_row([("name", Value::from("Bob")), ("age", Value::from(7))])
            .expect("row 1");

        table.replace_row(1, [("name", "Carol")]).expect("replace");
        let row = table.row(1).expect("row 1");
        assert!(row.is_closed());
        assert_eq!(row.get("name"), Some(&Value::from("Carol")));
        assert_eq!(row.get("age"), Some(&Value::Integer(0)));

        let err = table.replace_row(1, [("age", 3)]).expect_err("required name");
        assert!(matches!(err, TableError::RequiredField { row: 1, .. }));
        let err = table
            .replace_row(0, [("age", Value::from("old"))])
            .expect_err("kind rule");
        assert!(matches!(err, TableError::Validation { .. }));
        assert_eq!(
            table.row(1).and_then(|row| row.get("name")),
            Some(&Value::from("Carol"))
        );

        let err = table.replace_row(2, [("name", "Dan")]).expect_err("no row 2");
        assert!(matches!(err, TableError::RowOutOfRange { index: 2, len: 2 }));
    }

    #[test]
    fn remove_row_shifts_later_rows() {
        let mut table = people();
        for name in ["Alice", "Bob", "Carol"] {
            table.add_row([("name", name)]).expect("add row");
        }
        table.set("name", "Dan").expect("open row");

        let removed = table.remove_row(1).expect("row 1");
        assert_eq!(removed.get("name"), Some(&Value::from("Bob")));
        assert_eq!(table.len(), 2);
        let names: Vec<_> = table
            .iter()
            .map(|row| (row.index(), row.get("name").cloned()))
            .collect();
        assert_eq!(
            names,
            vec![(0, Some(Value::from("Alice"))), (1, Some(Value::from("Carol")))]
        );
        assert_eq!(table.open_row().map(Row::index), Some(2));
        assert_eq!(table.cursor(), 2);
        assert!(table.remove_row(2).is_none());
    }

    #[test]
    fn clear_drops_rows() {
        let mut table = people();
        table.add_row([("name", "Alice")]).expect("row 0");
        table.set("name", "Bob").expect("open row");
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.cursor(), 0);
    }
}
