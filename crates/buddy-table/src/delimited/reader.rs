//! Bulk ingestion of delimited text.

use std::io::Read;

use buddy_model::Value;
use csv::ReaderBuilder;
use tracing::{debug, warn};

use crate::error::{Result, TableError};
use crate::table::{Check, Table};

use super::header::{normalize_header, reconcile};

impl Table {
    /// Loads delimited text, replacing the current rows.
    ///
    /// The first record is the header and is reconciled against the schema
    /// according to [`HeaderMode`](crate::HeaderMode). Each data record is
    /// written into a new row without running validation rules, and the
    /// previous row is closed first. The row of the last record stays open.
    ///
    /// Fields are stored verbatim as text, empty ones included. Only cells
    /// missing from a short record resolve to the column default.
    ///
    /// On error the table is left exactly as it was before the call.
    pub fn load(&mut self, text: &str) -> Result<&mut Self> {
        self.load_from(text.as_bytes())
    }

    /// Same as [`Table::load`], reading from any byte source.
    pub fn load_from<R: Read>(&mut self, reader: R) -> Result<&mut Self> {
        let mut staged = Table::with_options(self.schema.clone(), self.options);
        staged.ingest(reader)?;
        self.rows = staged.rows;
        self.open = staged.open;
        Ok(self)
    }

    fn ingest<R: Read>(&mut self, reader: R) -> Result<()> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.options.delimiter)
            .from_reader(reader);
        let mut records = reader.records();

        let header = records.next().ok_or(TableError::EmptyInput)??;
        let mode = self.options.header_mode;
        let fields: Vec<String> = header
            .iter()
            .map(|field| normalize_header(field, mode))
            .collect();
        let slots = reconcile(&self.schema, &fields, mode)?;
        debug!(
            fields = fields.len(),
            mapped = slots.iter().flatten().count(),
            mode = ?self.options.header_mode,
            "reconciled header"
        );

        for (line, record) in records.enumerate() {
            let record = record?;
            self.close_row()?;
            self.begin_row();

            if record.len() > slots.len() {
                warn!(
                    record = line + 1,
                    found = record.len(),
                    expected = slots.len(),
                    "ignoring fields beyond header width"
                );
            }
            for (field, slot) in record.iter().zip(&slots) {
                let Some(column) = slot else {
                    continue;
                };
                self.put(column, Value::from(field), Check::Trust)?;
            }
        }

        debug!(
            closed = self.rows.len(),
            open = self.open.is_some(),
            "loaded table"
        );
        Ok(())
    }
}
