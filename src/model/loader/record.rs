//! A single semantic layer record, validated from one JSON line.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::RecordError;
use crate::model::field::{Field, FieldKind};

/// Attribute names with a fixed meaning. Each entry lists the preferred key
/// first, followed by the key used by older semantic layer exports.
const CUBE_KEYS: &[&str] = &["cube", "cube_name"];
const FIELD_KEYS: &[&str] = &["field", "name"];
const KIND_KEYS: &[&str] = &["kind", "group"];
const DESCRIPTION_KEYS: &[&str] = &["description", "hint"];
const TYPE_KEY: &str = "type";
const UNIT_KEY: &str = "unit";
const VARIANTS_KEY: &str = "variants";
const CUBE_DESCRIPTION_KEY: &str = "cube_description";

/// A record that passed schema validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub cube: String,
    pub cube_description: Option<String>,
    pub field: Field,
}

impl Record {
    /// Parse and validate one line of the source.
    pub fn from_line(line: &str) -> Result<Self, RecordError> {
        let value: Value = serde_json::from_str(line).map_err(|e| RecordError::Malformed {
            message: e.to_string(),
        })?;

        match value {
            Value::Object(map) => Self::from_object(map),
            other => Err(RecordError::Malformed {
                message: format!("expected a JSON object, found {}", json_type_name(&other)),
            }),
        }
    }

    /// Validate an already-decoded object against the record schema.
    pub fn from_object(mut map: Map<String, Value>) -> Result<Self, RecordError> {
        let cube = take_required(&mut map, CUBE_KEYS)?;
        let name = take_required(&mut map, FIELD_KEYS)?;
        let kind_raw = take_required(&mut map, KIND_KEYS)?;

        let kind = kind_raw
            .parse::<FieldKind>()
            .map_err(|kind| RecordError::UnknownFieldKind { kind })?;

        // Older exports qualify the field name with its cube: "Orders.net_sales".
        let name = match name.strip_prefix(&format!("{}.", cube)) {
            Some(stripped) if !stripped.is_empty() => stripped.to_string(),
            _ => name,
        };

        let description = take_optional(&mut map, DESCRIPTION_KEYS)?.unwrap_or_default();
        let data_type = take_optional(&mut map, &[TYPE_KEY])?;
        let unit = take_optional(&mut map, &[UNIT_KEY])?;
        // "None" and blank are how exports spell "no variants".
        let variants = take_optional(&mut map, &[VARIANTS_KEY])?
            .filter(|v| !v.trim().is_empty() && v != "None");
        let cube_description = take_optional(&mut map, &[CUBE_DESCRIPTION_KEY])?
            .filter(|d| !d.trim().is_empty());

        let metadata: BTreeMap<String, Value> = map.into_iter().collect();

        Ok(Record {
            cube,
            cube_description,
            field: Field {
                name,
                kind,
                description,
                data_type,
                unit,
                variants,
                metadata,
            },
        })
    }
}

/// Remove the first present key of `keys` and require a non-blank string.
fn take_required(map: &mut Map<String, Value>, keys: &[&'static str]) -> Result<String, RecordError> {
    match take_optional(map, keys)? {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(RecordError::MissingAttribute {
            attribute: keys[0].to_string(),
        }),
    }
}

/// Remove the first present key of `keys`. `null` counts as absent; any other
/// non-string value is a malformed record.
fn take_optional(
    map: &mut Map<String, Value>,
    keys: &[&'static str],
) -> Result<Option<String>, RecordError> {
    let Some(key) = keys.iter().find(|k| map.contains_key(**k)) else {
        return Ok(None);
    };

    match map.remove(*key) {
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Null) | None => Ok(None),
        Some(other) => Err(RecordError::Malformed {
            message: format!(
                "attribute '{}' must be a string, found {}",
                key,
                json_type_name(&other)
            ),
        }),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
