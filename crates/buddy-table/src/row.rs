//! Rows of the buffer.

use std::collections::BTreeMap;

use buddy_model::Value;

/// Whether a row still accepts writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowState {
    Open,
    Closed,
}

/// A row: cells keyed by column id plus its lifecycle state.
///
/// A closed row holds a value for every schema column; an open row may be
/// sparse.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    index: usize,
    state: RowState,
    cells: BTreeMap<String, Value>,
}

impl Row {
    pub(crate) fn open(index: usize) -> Self {
        Self {
            index,
            state: RowState::Open,
            cells: BTreeMap::new(),
        }
    }

    pub(crate) fn close(mut self, cells: BTreeMap<String, Value>) -> Self {
        self.cells = cells;
        self.state = RowState::Closed;
        self
    }

    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    pub(crate) fn insert(&mut self, column: &str, value: Value) {
        self.cells.insert(column.to_string(), value);
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn state(&self) -> RowState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == RowState::Closed
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.cells.get(column)
    }

    /// Returns true if the cell holds a non-empty value.
    pub fn is_filled(&self, column: &str) -> bool {
        self.cells.get(column).is_some_and(|value| !value.is_empty())
    }

    pub fn cells(&self) -> &BTreeMap<String, Value> {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
