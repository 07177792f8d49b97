//! Terminal tables for `check`, `show` and `schema`.

use buddy_model::{ColumnDefault, Schema, Value};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::commands::CheckReport;

pub fn print_check(report: &CheckReport) {
    println!("Input: {}", report.input.display());
    println!("{}", check_table(report));
}

pub fn check_table(report: &CheckReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Rows"),
        header_cell("Columns"),
        header_cell("Required"),
    ]);
    apply_table_style(&mut table);
    for index in 0..3 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(report.rows)
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        Cell::new(report.columns),
        count_cell(report.required),
    ]);
    table
}

/// One line per row, columns in schema order, headers as written to CSV.
pub fn rows_table(data: &buddy_table::Table) -> Table {
    let schema = data.schema();
    let mut table = Table::new();
    let mut header = vec![header_cell("#")];
    header.extend(schema.headers().map(header_cell));
    table.set_header(header);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);

    for row in data.iter().chain(data.open_row()) {
        let mut cells = vec![dim_cell(row.index())];
        cells.extend(schema.iter().map(|column| match row.get(column.id()) {
            Some(Value::Null) | None => dim_cell("null"),
            Some(value) => Cell::new(value),
        }));
        table.add_row(cells);
    }
    table
}

pub fn schema_table(schema: &Schema) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Id"),
        header_cell("Header"),
        header_cell("Required"),
        header_cell("Default"),
        header_cell("Rule"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);

    for (position, column) in schema.iter().enumerate() {
        let header = match column.header_override() {
            Some(header) => Cell::new(header),
            None => dim_cell("-"),
        };
        let required = if column.is_required() {
            Cell::new("✓")
                .fg(Color::Green)
                .add_attribute(Attribute::Bold)
        } else {
            dim_cell("-")
        };
        let default = match column.default() {
            Some(ColumnDefault::Constant(value)) => Cell::new(value.to_json()),
            Some(ColumnDefault::Computed(_)) => Cell::new("computed").fg(Color::Blue),
            None => dim_cell("-"),
        };
        let rule = column
            .rule()
            .map_or_else(|| dim_cell("-"), Cell::new);
        table.add_row(vec![
            dim_cell(position),
            Cell::new(column.id())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            header,
            required,
            default,
            rule,
        ]);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
