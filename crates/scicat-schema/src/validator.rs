//! Payload validation against an entity's field table.
//!
//! One walk serves both directions: inbound payloads from read endpoints and
//! outbound payloads for create/update bodies. The walk never mutates its
//! input; it produces a normalized copy or fails on the first violation.

use scicat_model::{DatasetType, EntityKind};
use serde_json::{Map, Number, Value};
use tracing::debug;

use crate::config::{RegistryConfig, UnknownFieldPolicy};
use crate::entities::schema_for;
use crate::error::{Result, SchemaError};
use crate::field::{EntitySchema, FieldSpec, Shape};

/// Which way a payload is travelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Body of a create request. Audit fields and server-assigned ids are
    /// forbidden.
    Create,
    /// Body of an update request. Every declared field may be sent.
    Update,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Read,
    Write {
        direction: Direction,
        /// Strip forbidden create fields instead of failing on them.
        strip: bool,
    },
}

impl Flow {
    fn creating(self) -> bool {
        matches!(
            self,
            Flow::Write {
                direction: Direction::Create,
                ..
            }
        )
    }
}

pub(crate) struct Walk<'a> {
    pub config: &'a RegistryConfig,
    pub flow: Flow,
    /// Unknown keys kept under `UnknownFieldPolicy::Retain` on reads,
    /// qualified with their path.
    pub overflow: Map<String, Value>,
}

impl<'a> Walk<'a> {
    pub fn new(config: &'a RegistryConfig, flow: Flow) -> Self {
        Self {
            config,
            flow,
            overflow: Map::new(),
        }
    }

    /// Validate `payload` against `schema` and return the normalized object.
    pub fn object(
        &mut self,
        schema: &EntitySchema,
        payload: &Map<String, Value>,
        prefix: &str,
    ) -> Result<Map<String, Value>> {
        let entity = schema.kind;
        let mut normalized = Map::new();

        for field in &schema.fields {
            let path = qualify(prefix, field.name);
            let value = match payload.get(field.name) {
                Some(value) => value,
                None if field.is_required(self.flow.creating()) => {
                    return Err(SchemaError::MissingRequiredField {
                        field: path,
                        entity,
                    });
                }
                None => continue,
            };

            if self.flow.creating() && field.forbidden_on_create() {
                match self.flow {
                    Flow::Write { strip: true, .. } => {
                        debug!(entity = %entity, field = %path, "omitting server-assigned field on create");
                        continue;
                    }
                    _ => {
                        return Err(SchemaError::ForbiddenFieldOnCreate {
                            entity,
                            field: path,
                        });
                    }
                }
            }

            let normalized_value = self.value(entity, field, value, &path)?;
            normalized.insert(field.name.to_string(), normalized_value);
        }

        for (key, value) in payload {
            if schema.declares(key) {
                continue;
            }
            let path = qualify(prefix, key);
            match self.config.unknown_fields {
                UnknownFieldPolicy::Reject => {
                    return Err(SchemaError::UnknownField {
                        entity,
                        field: path,
                    });
                }
                UnknownFieldPolicy::Retain if self.flow == Flow::Read => {
                    self.overflow.insert(path, value.clone());
                }
                UnknownFieldPolicy::Retain | UnknownFieldPolicy::Drop => {
                    debug!(entity = %entity, field = %path, "dropping undeclared field");
                }
            }
        }

        Ok(normalized)
    }

    fn value(
        &mut self,
        entity: EntityKind,
        field: &FieldSpec,
        value: &Value,
        path: &str,
    ) -> Result<Value> {
        if value.is_null() {
            return if field.nullable(self.flow.creating()) {
                Ok(Value::Null)
            } else {
                Err(mismatch(entity, path, field.shape, value))
            };
        }

        match field.shape {
            Shape::String | Shape::Timestamp => match value {
                Value::String(_) => Ok(value.clone()),
                _ => Err(mismatch(entity, path, field.shape, value)),
            },
            Shape::Integer => self
                .integer(value)
                .ok_or_else(|| mismatch(entity, path, field.shape, value)),
            Shape::Boolean => match value {
                Value::Bool(_) => Ok(value.clone()),
                _ => Err(mismatch(entity, path, field.shape, value)),
            },
            Shape::StringList => match value {
                Value::Array(items) if items.iter().all(Value::is_string) => Ok(value.clone()),
                _ => Err(mismatch(entity, path, field.shape, value)),
            },
            Shape::MapList => match value {
                Value::Array(items) if items.iter().all(Value::is_object) => Ok(value.clone()),
                _ => Err(mismatch(entity, path, field.shape, value)),
            },
            Shape::Map => match value {
                Value::Object(_) => Ok(value.clone()),
                _ => Err(mismatch(entity, path, field.shape, value)),
            },
            Shape::Json => Ok(value.clone()),
            Shape::DatasetTag => {
                let found = value
                    .as_str()
                    .and_then(|tag| tag.parse::<DatasetType>().ok())
                    .ok_or_else(|| mismatch(entity, path, field.shape, value))?;
                match entity.dataset_type() {
                    Some(expected) if expected != found => Err(SchemaError::TypeTagMismatch {
                        entity,
                        expected,
                        found,
                    }),
                    _ => Ok(value.clone()),
                }
            }
            Shape::Records(kind) => {
                let Value::Array(items) = value else {
                    return Err(mismatch(entity, path, field.shape, value));
                };
                let nested = schema_for(kind);
                let mut records = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    let item_path = format!("{path}[{index}]");
                    let Value::Object(object) = item else {
                        return Err(SchemaError::TypeMismatch {
                            entity: kind,
                            field: item_path,
                            expected: field.shape,
                            received: describe(item),
                        });
                    };
                    records.push(Value::Object(self.object(nested, object, &item_path)?));
                }
                Ok(Value::Array(records))
            }
        }
    }

    fn integer(&self, value: &Value) -> Option<Value> {
        let Value::Number(number) = value else {
            return None;
        };
        if number.is_i64() {
            return Some(value.clone());
        }
        if !self.config.coerce_integral_floats {
            return None;
        }
        let float = number.as_f64()?;
        // `i64::MAX as f64` rounds up to 2^63, which no i64 can hold.
        let in_range = float >= i64::MIN as f64 && float < i64::MAX as f64;
        if number.is_f64() && float.fract() == 0.0 && in_range {
            Some(Value::Number(Number::from(float as i64)))
        } else {
            None
        }
    }
}

fn qualify(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn mismatch(entity: EntityKind, field: &str, expected: Shape, received: &Value) -> SchemaError {
    SchemaError::TypeMismatch {
        entity,
        field: field.to_string(),
        expected,
        received: describe(received),
    }
}

/// Short rendering of a received value for error messages.
pub(crate) fn describe(value: &Value) -> String {
    const MAX: usize = 64;
    let rendered = value.to_string();
    let kind = match value {
        Value::Null => return rendered,
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    if rendered.chars().count() > MAX {
        let truncated: String = rendered.chars().take(MAX).collect();
        format!("{kind} {truncated}...")
    } else {
        format!("{kind} {rendered}")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn read(kind: EntityKind, payload: Value) -> Result<Map<String, Value>> {
        read_with(&RegistryConfig::default(), kind, payload)
    }

    fn read_with(
        config: &RegistryConfig,
        kind: EntityKind,
        payload: Value,
    ) -> Result<Map<String, Value>> {
        let Value::Object(payload) = payload else {
            panic!("fixture must be an object");
        };
        Walk::new(config, Flow::Read).object(schema_for(kind), &payload, "")
    }

    #[test]
    fn nested_errors_carry_the_path() {
        let result = read(
            EntityKind::OrigDatablock,
            json!({
                "size": 1,
                "datasetId": "pid/1",
                "dataFileList": [{ "path": "a", "size": 1 }, { "path": "b" }]
            }),
        );
        match result {
            Err(SchemaError::MissingRequiredField { field, entity }) => {
                assert_eq!(field, "dataFileList[1].size");
                assert_eq!(entity, EntityKind::DataFile);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn whole_floats_become_integers() {
        let normalized = read(
            EntityKind::DataFile,
            json!({ "path": "a.tif", "size": 1024.0 }),
        )
        .unwrap();
        assert_eq!(normalized["size"], json!(1024));

        let err = read(EntityKind::DataFile, json!({ "path": "a.tif", "size": 10.5 }))
            .unwrap_err();
        assert!(matches!(err, SchemaError::TypeMismatch { .. }));

        let err = read(
            EntityKind::DataFile,
            json!({ "path": "a.tif", "size": 9223372036854775808.0 }),
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::TypeMismatch { ref field, .. } if field == "size"));

        let normalized = read(
            EntityKind::DataFile,
            json!({ "path": "a.tif", "size": -9223372036854775808.0 }),
        )
        .unwrap();
        assert_eq!(normalized["size"], json!(i64::MIN));
    }

    #[test]
    fn whole_floats_rejected_without_coercion() {
        let config = RegistryConfig {
            coerce_integral_floats: false,
            ..RegistryConfig::default()
        };
        let err = read_with(
            &config,
            EntityKind::DataFile,
            json!({ "path": "a.tif", "size": 1024.0 }),
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::TypeMismatch { .. }));
    }

    #[test]
    fn required_field_rejects_null() {
        let err = read(EntityKind::DataFile, json!({ "path": null, "size": 1 })).unwrap_err();
        match err {
            SchemaError::TypeMismatch {
                field, received, ..
            } => {
                assert_eq!(field, "path");
                assert_eq!(received, "null");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn list_elements_are_checked() {
        let err = read(
            EntityKind::Proposal,
            json!({ "proposalId": "p", "email": "e", "MeasurementPeriodList": [{}, 3] }),
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::TypeMismatch { ref field, .. } if field == "MeasurementPeriodList"));
    }

    #[test]
    fn base_dataset_rejects_unknown_tag() {
        let err = read(
            EntityKind::Dataset,
            json!({ "type": "processed", "contactEmail": "a", "owner": "o", "sourceFolder": "/" }),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SchemaError::TypeMismatch {
                expected: Shape::DatasetTag,
                ..
            }
        ));
    }

    #[test]
    fn create_strips_or_rejects_assigned_fields() {
        let payload = json!({ "path": "a", "size": 1, "createdAt": "2024-01-01T00:00:00Z" });
        let Value::Object(payload) = payload else {
            unreachable!()
        };
        let config = RegistryConfig::default();
        let schema = schema_for(EntityKind::DataFile);

        let stripped = Walk::new(
            &config,
            Flow::Write {
                direction: Direction::Create,
                strip: true,
            },
        )
        .object(schema, &payload, "")
        .unwrap();
        assert!(!stripped.contains_key("createdAt"));

        let err = Walk::new(
            &config,
            Flow::Write {
                direction: Direction::Create,
                strip: false,
            },
        )
        .object(schema, &payload, "")
        .unwrap_err();
        assert!(matches!(err, SchemaError::ForbiddenFieldOnCreate { ref field, .. } if field == "createdAt"));

        let updated = Walk::new(
            &config,
            Flow::Write {
                direction: Direction::Update,
                strip: false,
            },
        )
        .object(schema, &payload, "")
        .unwrap();
        assert!(updated.contains_key("createdAt"));
    }

    #[test]
    fn retained_nested_keys_are_qualified() {
        let config = RegistryConfig::permissive();
        let Value::Object(payload) = json!({
            "size": 1,
            "datasetId": "pid/1",
            "dataFileList": [{ "path": "a", "size": 1, "inode": 7 }]
        }) else {
            unreachable!()
        };
        let mut walk = Walk::new(&config, Flow::Read);
        let normalized = walk
            .object(schema_for(EntityKind::OrigDatablock), &payload, "")
            .unwrap();
        assert_eq!(walk.overflow.get("dataFileList[0].inode"), Some(&json!(7)));
        assert!(normalized["dataFileList"][0].get("inode").is_none());
    }

    #[test]
    fn describe_truncates_long_values() {
        let long = Value::String("x".repeat(200));
        let described = describe(&long);
        assert!(described.starts_with("string \"xxx"));
        assert!(described.ends_with("..."));
        assert_eq!(describe(&json!(3)), "number 3");
    }
}
