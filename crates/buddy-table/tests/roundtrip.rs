//! Render then load reproduces the table.

use buddy_model::{ColumnParams, Schema, SchemaEntry, Value};
use buddy_table::Table;
use proptest::prelude::*;

fn schema() -> Schema {
    Schema::new([
        SchemaEntry::from("id"),
        SchemaEntry::named("amt", ColumnParams::new().header("Amount")),
        SchemaEntry::from("note"),
    ])
    .expect("schema")
}

fn field() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ,;\"']{1,12}"
}

proptest! {
    #[test]
    fn render_then_load_preserves_rows(
        rows in prop::collection::vec((field(), field(), field()), 1..20)
    ) {
        let mut original = Table::new(schema());
        for (id, amt, note) in &rows {
            original
                .add_row([("id", id.as_str()), ("amt", amt.as_str()), ("note", note.as_str())])
                .expect("add row");
        }
        let text = original.render().expect("render");

        let mut loaded = Table::new(schema());
        loaded.load(&text).expect("load");
        loaded.finish().expect("finish");

        prop_assert_eq!(loaded.rows(), original.rows());
    }
}

#[test]
fn omitted_cells_load_back_as_empty_text() {
    let mut original = Table::new(schema());
    original.add_row([("id", "1")]).expect("row 0");
    original.add_row([("id", "2"), ("note", "x")]).expect("row 1");
    let text = original.render().expect("render");
    assert_eq!(text, "id,Amount,note\n1,,\n2,,x\n");

    let mut loaded = Table::new(schema());
    loaded.load(&text).expect("load");
    loaded.finish().expect("finish");
    assert_eq!(loaded.render().expect("render"), text);
    assert_eq!(
        original.row(0).and_then(|row| row.get("amt")),
        Some(&Value::Null)
    );
    assert_eq!(
        loaded.row(0).and_then(|row| row.get("amt")),
        Some(&Value::from(""))
    );
}
