//! Table configuration.

/// How a loaded header record is matched against the schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HeaderMode {
    /// Same width as the schema, matched position by position.
    #[default]
    Strict,
    /// Fields are matched by name in any order; unknown fields are skipped.
    Lenient,
}

/// What a write to an undeclared column does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownColumns {
    /// Fail with [`TableError::UnknownColumn`](crate::TableError::UnknownColumn).
    #[default]
    Reject,
    /// Drop the write.
    Ignore,
}

/// Options controlling tokenization and strictness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableOptions {
    /// Field delimiter for load and render.
    pub delimiter: u8,
    pub header_mode: HeaderMode,
    pub unknown_columns: UnknownColumns,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            header_mode: HeaderMode::default(),
            unknown_columns: UnknownColumns::default(),
        }
    }
}

impl TableOptions {
    /// Lenient headers and ignored unknown columns.
    pub fn lenient() -> Self {
        Self {
            header_mode: HeaderMode::Lenient,
            unknown_columns: UnknownColumns::Ignore,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_header_mode(mut self, mode: HeaderMode) -> Self {
        self.header_mode = mode;
        self
    }

    #[must_use]
    pub fn with_unknown_columns(mut self, policy: UnknownColumns) -> Self {
        self.unknown_columns = policy;
        self
    }
}
