//! Ordered column schema and its normalization.

use std::collections::BTreeSet;

use crate::column::{ColumnParams, ColumnSpec};
use crate::error::{Result, SchemaError};

/// One entry of a raw schema declaration.
#[derive(Debug, Clone)]
pub enum SchemaEntry {
    /// Column declared by id only; its header must equal the id.
    Id(String),
    /// Column declared by id with parameters.
    Named(String, ColumnParams),
}

impl SchemaEntry {
    pub fn named(id: impl Into<String>, params: ColumnParams) -> Self {
        SchemaEntry::Named(id.into(), params)
    }
}

impl From<&str> for SchemaEntry {
    fn from(id: &str) -> Self {
        SchemaEntry::Id(id.to_string())
    }
}

impl From<String> for SchemaEntry {
    fn from(id: String) -> Self {
        SchemaEntry::Id(id)
    }
}

impl<S: Into<String>> From<(S, ColumnParams)> for SchemaEntry {
    fn from((id, params): (S, ColumnParams)) -> Self {
        SchemaEntry::Named(id.into(), params)
    }
}

/// Ordered, non-empty list of uniquely identified columns.
#[derive(Debug, Clone)]
pub struct Schema {
    columns: Vec<ColumnSpec>,
}

impl Schema {
    /// Normalizes raw entries into a schema, preserving their order.
    ///
    /// ```
    /// use buddy_model::{ColumnParams, Schema, SchemaEntry, ValueKind};
    ///
    /// let schema = Schema::new([
    ///     SchemaEntry::from("name"),
    ///     SchemaEntry::named("age", ColumnParams::new().kind(ValueKind::Integer).default(0)),
    /// ])?;
    /// assert_eq!(schema.headers().collect::<Vec<_>>(), ["name", "age"]);
    /// # Ok::<(), buddy_model::SchemaError>(())
    /// ```
    pub fn new<I, E>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = E>,
        E: Into<SchemaEntry>,
    {
        let columns = entries
            .into_iter()
            .map(|entry| match entry.into() {
                SchemaEntry::Id(id) => Ok(ColumnSpec::positional(id)),
                SchemaEntry::Named(id, params) => ColumnSpec::named(id, params),
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_columns(columns)
    }

    /// Builds a schema from already normalized columns.
    pub fn from_columns(columns: Vec<ColumnSpec>) -> Result<Self> {
        if columns.is_empty() {
            return Err(SchemaError::Empty);
        }
        let mut seen = BTreeSet::new();
        for column in &columns {
            if !seen.insert(column.id()) {
                return Err(SchemaError::DuplicateColumn {
                    id: column.id().to_string(),
                });
            }
        }
        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn column(&self, id: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|column| column.id() == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Always false; kept for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column ids in schema order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(ColumnSpec::id)
    }

    /// Display headers in schema order.
    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(ColumnSpec::header)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColumnSpec> {
        self.columns.iter()
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a ColumnSpec;
    type IntoIter = std::slice::Iter<'a, ColumnSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}
