//! Column declarations: defaults, validation rules and the normalized spec.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::error::{Result, SchemaError};
use crate::value::{Value, ValueKind};

type DefaultFn = dyn Fn(usize) -> Value + Send + Sync;

/// Value used for a cell that was never written.
#[derive(Clone)]
pub enum ColumnDefault {
    /// Used verbatim.
    Constant(Value),
    /// Computed from the index of the row being closed or rendered.
    Computed(Arc<DefaultFn>),
}

impl ColumnDefault {
    pub fn constant(value: impl Into<Value>) -> Self {
        ColumnDefault::Constant(value.into())
    }

    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(usize) -> Value + Send + Sync + 'static,
    {
        ColumnDefault::Computed(Arc::new(f))
    }

    /// Resolves the default for the given row index.
    pub fn resolve(&self, row: usize) -> Value {
        match self {
            ColumnDefault::Constant(value) => value.clone(),
            ColumnDefault::Computed(f) => f(row),
        }
    }
}

impl fmt::Debug for ColumnDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnDefault::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            ColumnDefault::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Validation rule applied on programmatic writes.
#[derive(Debug, Clone)]
pub enum Rule {
    /// The value, coerced to text, must match.
    Pattern(Regex),
    /// The value's kind must equal the declared kind.
    Kind(ValueKind),
}

impl Rule {
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Rule::Pattern(regex) => regex.is_match(&value.to_string()),
            Rule::Kind(kind) => value.kind() == *kind,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Pattern(regex) => write!(f, "/{}/", regex.as_str()),
            Rule::Kind(kind) => write!(f, "{kind}"),
        }
    }
}

/// Optional parameters of a named schema entry.
///
/// ```
/// use buddy_model::{ColumnParams, ValueKind};
///
/// let params = ColumnParams::new()
///     .header("Amount")
///     .kind(ValueKind::Integer)
///     .default(0)
///     .required(true);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ColumnParams {
    pub header: Option<String>,
    pub default: Option<ColumnDefault>,
    pub required: bool,
    pub pattern: Option<String>,
    pub kind: Option<ValueKind>,
}

impl ColumnParams {
    pub fn new() -> Self {
        <Self as Default>::default()
    }

    /// Display header used in CSV output and accepted on load.
    #[must_use]
    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    #[must_use]
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(ColumnDefault::constant(value));
        self
    }

    #[must_use]
    pub fn computed_default<F>(mut self, f: F) -> Self
    where
        F: Fn(usize) -> Value + Send + Sync + 'static,
    {
        self.default = Some(ColumnDefault::computed(f));
        self
    }

    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Regular expression (regex crate syntax). Takes precedence over `kind`.
    #[must_use]
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: ValueKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

/// A normalized column of a [`Schema`](crate::Schema).
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    id: String,
    header: Option<String>,
    default: Option<ColumnDefault>,
    required: bool,
    rule: Option<Rule>,
}

impl ColumnSpec {
    /// Column declared by id only.
    pub fn positional(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            header: None,
            default: None,
            required: false,
            rule: None,
        }
    }

    /// Column declared by id with parameters. Compiles the pattern rule.
    pub fn named(id: impl Into<String>, params: ColumnParams) -> Result<Self> {
        let id = id.into();
        let rule = match (params.pattern, params.kind) {
            (Some(pattern), _) => {
                let regex = Regex::new(&pattern).map_err(|source| SchemaError::InvalidPattern {
                    column: id.clone(),
                    source,
                })?;
                Some(Rule::Pattern(regex))
            }
            (None, Some(kind)) => Some(Rule::Kind(kind)),
            (None, None) => None,
        };
        Ok(Self {
            id,
            header: params.header,
            default: params.default,
            required: params.required,
            rule,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display header: the override when declared, else the id.
    pub fn header(&self) -> &str {
        self.header.as_deref().unwrap_or(&self.id)
    }

    pub fn header_override(&self) -> Option<&str> {
        self.header.as_deref()
    }

    /// Returns true if a header field names this column, by id or override.
    pub fn matches_header(&self, field: &str) -> bool {
        field == self.id || self.header_override() == Some(field)
    }

    pub fn default(&self) -> Option<&ColumnDefault> {
        self.default.as_ref()
    }

    /// Resolves the default for a row, `Null` when none is declared.
    pub fn default_for(&self, row: usize) -> Value {
        self.default
            .as_ref()
            .map_or(Value::Null, |default| default.resolve(row))
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn rule(&self) -> Option<&Rule> {
        self.rule.as_ref()
    }

    /// Columns without a rule accept any value.
    pub fn validate(&self, value: &Value) -> bool {
        self.rule.as_ref().is_none_or(|rule| rule.accepts(value))
    }
}
