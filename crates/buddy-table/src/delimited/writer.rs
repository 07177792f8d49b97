//! Serialization to delimited text.

use std::io::{self, Write};

use csv::{Terminator, WriterBuilder};

use crate::error::{Result, TableError};
use crate::row::Row;
use crate::table::Table;

impl Table {
    /// Writes the header record and every row, including the open row.
    ///
    /// Missing or null cells are rendered from the column default for that
    /// row index.
    pub fn render_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = WriterBuilder::new()
            .delimiter(self.options.delimiter)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(writer);

        writer.write_record(self.schema.headers())?;
        for row in self.all_rows() {
            writer.write_record(self.render_row(row))?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Renders the table into a string.
    pub fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.render_to(&mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| TableError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
    }

    /// Same as [`Table::render`].
    pub fn to_csv(&self) -> Result<String> {
        self.render()
    }

    fn render_row(&self, row: &Row) -> Vec<String> {
        self.schema
            .iter()
            .map(|column| match row.get(column.id()) {
                Some(value) if !value.is_null() => value.to_string(),
                _ => column.default_for(row.index()).to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use buddy_model::{ColumnParams, Schema, SchemaEntry, Value};

    use crate::{Table, TableOptions};

    #[test]
    fn empty_table_renders_header_only() {
        let table = Table::new(Schema::new(["id", "value"]).expect("schema"));
        assert_eq!(table.render().expect("render"), "id,value\n");
    }

    #[test]
    fn uses_display_headers_and_delimiter() {
        let schema = Schema::new([
            SchemaEntry::from("id"),
            SchemaEntry::named("amt", ColumnParams::new().header("Amount")),
        ])
        .expect("schema");
        let mut table = Table::with_options(schema, TableOptions::default().with_delimiter(b';'));
        table
            .add_row([("id", Value::from("1")), ("amt", Value::from("a;b"))])
            .expect("row");
        assert_eq!(table.render().expect("render"), "id;Amount\n1;\"a;b\"\n");
    }

    #[test]
    fn open_row_defaults_resolve_at_render_time() {
        let schema = Schema::new([
            SchemaEntry::from("name"),
            SchemaEntry::named(
                "line",
                ColumnParams::new().computed_default(|row| Value::Integer(row as i64 * 10)),
            ),
        ])
        .expect("schema");
        let mut table = Table::new(schema);
        table.add_row([("name", "a")]).expect("row 0");
        table.set("name", "b").expect("open row");

        assert_eq!(table.render().expect("render"), "name,line\na,0\nb,10\n");
        // The open row itself is not filled by rendering.
        assert!(table.get("line").is_none());
    }

    #[test]
    fn display_matches_render() {
        let mut table = Table::new(Schema::new(["id"]).expect("schema"));
        table.set("id", 7).expect("set");
        assert_eq!(table.to_string(), table.to_csv().expect("render"));
    }
}
