//! JSON schema descriptors.
//!
//! Two shapes are accepted and may be mixed:
//!
//! ```json
//! ["id", {"id": "amt", "header": "Amount"}, {"qty": {"type": "integer"}}]
//! ```
//!
//! ```json
//! {"id": null, "amt": {"header": "Amount", "required": true}}
//! ```
//!
//! Parameter keys: `header`, `default`, `required`, `regex` (alias
//! `pattern`) and `type`.

use serde_json::{Map, Value as Json};

use crate::column::ColumnParams;
use crate::error::{Result, SchemaError};
use crate::schema::{Schema, SchemaEntry};
use crate::value::{Value, ValueKind};

impl Schema {
    /// Normalizes a JSON schema descriptor.
    pub fn from_json(descriptor: &Json) -> Result<Self> {
        let entries = match descriptor {
            Json::Array(items) => items
                .iter()
                .enumerate()
                .map(|(position, item)| positional_entry(position, item))
                .collect::<Result<Vec<_>>>()?,
            Json::Object(map) => map
                .iter()
                .enumerate()
                .map(|(position, (id, params))| named_entry(position, id, params))
                .collect::<Result<Vec<_>>>()?,
            other => {
                return Err(SchemaError::UnexpectedEntry {
                    position: 0,
                    found: other.to_string(),
                });
            }
        };
        Schema::new(entries)
    }

    /// Parses a JSON schema descriptor from text.
    pub fn from_json_str(text: &str) -> std::result::Result<Self, DescriptorError> {
        let descriptor: Json = serde_json::from_str(text)?;
        Ok(Self::from_json(&descriptor)?)
    }
}

/// Failure to read a descriptor from text.
#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    #[error("invalid schema JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

fn positional_entry(position: usize, item: &Json) -> Result<SchemaEntry> {
    match item {
        Json::String(id) => Ok(SchemaEntry::Id(id.clone())),
        Json::Object(map) => {
            if let Some(Json::String(id)) = map.get("id") {
                let params = parse_params(id, map, &["id"])?;
                return Ok(SchemaEntry::Named(id.clone(), params));
            }
            // Single-key `{ "<id>": { params } }` form.
            let mut fields = map.iter();
            match (fields.next(), fields.next()) {
                (Some((id, params)), None) => named_entry(position, id, params),
                _ => Err(unexpected(position, item)),
            }
        }
        _ => Err(unexpected(position, item)),
    }
}

fn named_entry(position: usize, id: &str, params: &Json) -> Result<SchemaEntry> {
    match params {
        Json::Null => Ok(SchemaEntry::Named(id.to_string(), ColumnParams::new())),
        Json::Object(map) => Ok(SchemaEntry::Named(
            id.to_string(),
            parse_params(id, map, &[])?,
        )),
        _ => Err(unexpected(position, params)),
    }
}

fn unexpected(position: usize, item: &Json) -> SchemaError {
    SchemaError::UnexpectedEntry {
        position,
        found: item.to_string(),
    }
}

fn parse_params(column: &str, map: &Map<String, Json>, skip: &[&str]) -> Result<ColumnParams> {
    let mut params = ColumnParams::new();
    for (key, value) in map {
        if skip.contains(&key.as_str()) {
            continue;
        }
        match key.as_str() {
            "header" => params.header = Some(expect_str(column, key, value)?.to_string()),
            "default" => {
                let default = Value::from_json(value).ok_or_else(|| SchemaError::InvalidDefault {
                    column: column.to_string(),
                })?;
                params = params.default(default);
            }
            "required" => {
                params.required = value
                    .as_bool()
                    .ok_or_else(|| invalid(column, key, "a boolean"))?;
            }
            "regex" | "pattern" => {
                params.pattern = Some(expect_str(column, key, value)?.to_string());
            }
            "type" => {
                let name = expect_str(column, key, value)?;
                let kind = name
                    .parse::<ValueKind>()
                    .map_err(|_| SchemaError::UnknownKind {
                        column: column.to_string(),
                        kind: name.to_string(),
                    })?;
                params.kind = Some(kind);
            }
            _ => {
                return Err(SchemaError::UnknownParameter {
                    column: column.to_string(),
                    parameter: key.clone(),
                });
            }
        }
    }
    Ok(params)
}

fn expect_str<'a>(column: &str, key: &str, value: &'a Json) -> Result<&'a str> {
    value.as_str().ok_or_else(|| invalid(column, key, "a string"))
}

fn invalid(column: &str, key: &str, expected: &'static str) -> SchemaError {
    SchemaError::InvalidParameter {
        column: column.to_string(),
        parameter: key.to_string(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Rule;
    use serde_json::json;

    #[test]
    fn parses_positional_descriptor() {
        let schema = Schema::from_json(&json!(["id", "value"])).expect("schema");
        assert_eq!(schema.ids().collect::<Vec<_>>(), ["id", "value"]);
        assert!(schema.columns().iter().all(|c| c.header_override().is_none()));
    }

    #[test]
    fn parses_mixed_entries() {
        let schema = Schema::from_json(&json!([
            "id",
            {"id": "amt", "header": "Amount", "required": true},
            {"qty": {"type": "integer", "default": 0}}
        ]))
        .expect("schema");

        let amt = schema.column("amt").expect("amt");
        assert_eq!(amt.header(), "Amount");
        assert!(amt.is_required());

        let qty = schema.column("qty").expect("qty");
        assert!(matches!(qty.rule(), Some(Rule::Kind(ValueKind::Integer))));
        assert_eq!(qty.default_for(7), Value::Integer(0));
    }

    #[test]
    fn parses_named_descriptor() {
        let schema = Schema::from_json(&json!({
            "code": {"regex": "^[0-9]+$"},
            "label": null
        }))
        .expect("schema");
        assert_eq!(schema.len(), 2);
        assert!(matches!(
            schema.column("code").and_then(crate::ColumnSpec::rule),
            Some(Rule::Pattern(_))
        ));
    }

    #[test]
    fn rejects_unexpected_entries() {
        let err = Schema::from_json(&json!(["id", 42])).expect_err("number entry");
        assert!(matches!(err, SchemaError::UnexpectedEntry { position: 1, .. }));

        let err = Schema::from_json(&json!({"id": "Identifier"})).expect_err("string params");
        assert!(matches!(err, SchemaError::UnexpectedEntry { position: 0, .. }));

        let err = Schema::from_json(&json!("id")).expect_err("bare string");
        assert!(matches!(err, SchemaError::UnexpectedEntry { .. }));
    }

    #[test]
    fn rejects_bad_parameters() {
        let err = Schema::from_json(&json!([{"id": "a", "colour": "red"}])).expect_err("unknown");
        assert!(matches!(err, SchemaError::UnknownParameter { .. }));

        let err = Schema::from_json(&json!([{"id": "a", "required": "yes"}])).expect_err("type");
        assert!(matches!(err, SchemaError::InvalidParameter { .. }));

        let err = Schema::from_json(&json!([{"id": "a", "type": "date"}])).expect_err("kind");
        assert!(matches!(err, SchemaError::UnknownKind { .. }));

        let err = Schema::from_json(&json!([{"id": "a", "default": [1]}])).expect_err("default");
        assert!(matches!(err, SchemaError::InvalidDefault { .. }));
    }

    #[test]
    fn from_json_str_reports_syntax_errors() {
        let err = Schema::from_json_str("[\"id\",").expect_err("truncated json");
        assert!(matches!(err, DescriptorError::Json(_)));

        let err = Schema::from_json_str("[]").expect_err("empty schema");
        assert!(matches!(err, DescriptorError::Schema(SchemaError::Empty)));
    }
}
