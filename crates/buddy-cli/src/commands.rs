//! Subcommand implementations.
//!
//! Each `run_*` function returns its result instead of printing, so `main`
//! decides where output goes.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use buddy_model::{Schema, Value};
use buddy_table::{Table, TableOptions};
use tracing::info;

use crate::cli::{InputArgs, OutputArgs, SchemaArgs};

/// Outcome of `check`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub input: PathBuf,
    pub rows: usize,
    pub columns: usize,
    /// Columns that must be non-empty from row 1 on.
    pub required: usize,
}

/// Builds table options from the global flags.
pub fn table_options(delimiter: u8, lenient: bool) -> TableOptions {
    let options = if lenient {
        TableOptions::lenient()
    } else {
        TableOptions::default()
    };
    options.with_delimiter(delimiter)
}

pub fn load_schema(path: &Path) -> Result<Schema> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read schema {}", path.display()))?;
    Schema::from_json_str(&text).with_context(|| format!("invalid schema {}", path.display()))
}

/// Loads the input file and closes its last row.
pub fn load_table(args: &InputArgs, options: TableOptions) -> Result<Table> {
    let schema = load_schema(&args.schema.schema)?;
    let file = File::open(&args.input)
        .with_context(|| format!("failed to open {}", args.input.display()))?;
    let mut table = Table::with_options(schema, options);
    table
        .load_from(file)
        .and_then(Table::finish)
        .with_context(|| format!("failed to load {}", args.input.display()))?;
    info!(rows = table.len(), input = %args.input.display(), "loaded table");
    Ok(table)
}

pub fn run_check(args: &InputArgs, options: TableOptions) -> Result<CheckReport> {
    let table = load_table(args, options)?;
    let schema = table.schema();
    Ok(CheckReport {
        input: args.input.clone(),
        rows: table.len(),
        columns: schema.len(),
        required: schema.iter().filter(|column| column.is_required()).count(),
    })
}

/// Re-renders the input with every default resolved.
pub fn run_normalize(args: &OutputArgs, options: TableOptions) -> Result<String> {
    let table = load_table(&args.input, options)?;
    table.render().context("failed to render table")
}

pub fn run_json(args: &InputArgs, options: TableOptions) -> Result<String> {
    let table = load_table(args, options)?;
    serde_json::to_string_pretty(&table.to_json()).context("failed to serialize rows")
}

pub fn run_show(args: &InputArgs, options: TableOptions) -> Result<Table> {
    load_table(args, options)
}

/// Adds each object of a JSON array as a row, then renders the table.
pub fn run_build(args: &OutputArgs, options: TableOptions) -> Result<String> {
    let input = &args.input;
    let schema = load_schema(&input.schema.schema)?;
    let text = fs::read_to_string(&input.input)
        .with_context(|| format!("failed to read {}", input.input.display()))?;
    let rows = parse_rows(&text)
        .with_context(|| format!("invalid rows in {}", input.input.display()))?;

    let mut table = Table::with_options(schema, options);
    for (index, cells) in rows.into_iter().enumerate() {
        table
            .add_row(cells)
            .with_context(|| format!("failed to add row {index}"))?;
    }
    info!(rows = table.len(), "built table");
    table.render().context("failed to render table")
}

pub fn run_schema(args: &SchemaArgs) -> Result<Schema> {
    load_schema(&args.schema)
}

/// Writes command output to a file, or to stdout when no path is given.
pub fn write_output(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
            info!(output = %path.display(), "wrote output");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .and_then(|()| stdout.flush())
                .context("failed to write to stdout")?;
        }
    }
    Ok(())
}

/// Parses a JSON array of objects into per-row cell lists.
fn parse_rows(text: &str) -> Result<Vec<Vec<(String, Value)>>> {
    let json: serde_json::Value = serde_json::from_str(text)?;
    let serde_json::Value::Array(items) = json else {
        bail!("expected a JSON array of row objects");
    };
    items
        .iter()
        .enumerate()
        .map(|(index, item)| -> Result<Vec<(String, Value)>> {
            let serde_json::Value::Object(map) = item else {
                bail!("row {index} is not an object");
            };
            map.iter()
                .map(|(column, value)| match Value::from_json(value) {
                    Some(value) => Ok((column.clone(), value)),
                    None => bail!("row {index}: column '{column}' holds a non-scalar value"),
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rows_keeps_scalars() {
        let rows = parse_rows(r#"[{"name": "Alice", "age": 30}, {"name": null}]"#)
            .expect("parse rows");
        assert_eq!(rows.len(), 2);
        assert!(rows[0].contains(&("age".to_string(), Value::Integer(30))));
        assert_eq!(rows[1], vec![("name".to_string(), Value::Null)]);
    }

    #[test]
    fn parse_rows_rejects_nested_values() {
        let err = parse_rows(r#"[{"tags": ["a"]}]"#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "row 0: column 'tags' holds a non-scalar value"
        );
        assert!(parse_rows(r#"{"name": "Alice"}"#).is_err());
        assert!(parse_rows(r#"["Alice"]"#).is_err());
    }

    #[test]
    fn lenient_flag_relaxes_options() {
        let options = table_options(b';', true);
        assert_eq!(options, TableOptions::lenient().with_delimiter(b';'));
        assert_eq!(table_options(b',', false), TableOptions::default());
    }
}
