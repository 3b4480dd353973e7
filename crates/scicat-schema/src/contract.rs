//! JSON Schema contracts generated from the field tables.
//!
//! Exported documents follow draft 2020-12 and let non-Rust clients (or a
//! gateway) check payloads against the same rules. [`ContractSet`] compiles
//! them with `jsonschema` for a structural pre-check.

use std::collections::HashMap;

use jsonschema::Validator;
use scicat_model::EntityKind;
use serde_json::{json, Map, Value};

use crate::entities::schema_for;
use crate::error::{Result, SchemaError};
use crate::field::{EntitySchema, Shape};
use crate::validator::Direction;

const DRAFT_2020_12: &str = "https://json-schema.org/draft/2020-12/schema";

/// Which payloads a contract describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    /// Records as returned by read endpoints.
    Read,
    /// Create request bodies: no audit fields, no server-assigned ids.
    Create,
    /// Update request bodies.
    Update,
}

impl From<Direction> for Surface {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Create => Surface::Create,
            Direction::Update => Surface::Update,
        }
    }
}

/// Build the JSON Schema document for an entity.
///
/// With `strict`, every entity object (nested records included) gets
/// `additionalProperties: false`. Free-form maps stay open.
pub fn json_schema(kind: EntityKind, surface: Surface, strict: bool) -> Value {
    let mut document = object_schema(schema_for(kind), surface, strict);
    if let Value::Object(map) = &mut document {
        map.insert("$schema".to_string(), Value::String(DRAFT_2020_12.to_string()));
    }
    document
}

fn object_schema(schema: &EntitySchema, surface: Surface, strict: bool) -> Value {
    let creating = surface == Surface::Create;
    let mut properties = Map::new();
    let mut required = Vec::new();

    for field in &schema.fields {
        if creating && field.forbidden_on_create() {
            continue;
        }

        let shape = shape_schema(schema.kind, field.shape, surface, strict);
        let mut property = if field.nullable(creating) {
            json!({ "anyOf": [shape, { "type": "null" }] })
        } else {
            shape
        };
        if let (Some(default), Value::Object(map)) = (field.default_value(), &mut property) {
            map.insert("default".to_string(), default);
        }
        properties.insert(field.name.to_string(), property);

        if field.is_required(creating) {
            required.push(Value::String(field.name.to_string()));
        }
    }

    let mut document = json!({
        "title": schema.kind.name(),
        "type": "object",
        "properties": properties,
        "required": required,
    });
    if strict {
        if let Value::Object(map) = &mut document {
            map.insert("additionalProperties".to_string(), Value::Bool(false));
        }
    }
    document
}

fn shape_schema(entity: EntityKind, shape: Shape, surface: Surface, strict: bool) -> Value {
    match shape {
        Shape::String => json!({ "type": "string" }),
        Shape::Timestamp => json!({ "type": "string", "format": "date-time" }),
        Shape::Integer => json!({ "type": "integer" }),
        Shape::Boolean => json!({ "type": "boolean" }),
        Shape::StringList => json!({ "type": "array", "items": { "type": "string" } }),
        Shape::MapList => json!({ "type": "array", "items": { "type": "object" } }),
        Shape::Map => json!({ "type": "object" }),
        Shape::Json => json!({}),
        Shape::DatasetTag => match entity.dataset_type() {
            Some(tag) => json!({ "const": tag.as_str() }),
            None => json!({ "enum": ["raw", "derived"] }),
        },
        Shape::Records(kind) => json!({
            "type": "array",
            "items": object_schema(schema_for(kind), surface, strict),
        }),
    }
}

/// Compiled contracts for every entity kind on one surface.
pub struct ContractSet {
    validators: HashMap<EntityKind, Validator>,
    surface: Surface,
}

impl ContractSet {
    /// Compile the contracts of all entity kinds.
    pub fn compile(surface: Surface, strict: bool) -> Result<Self> {
        let mut validators = HashMap::with_capacity(EntityKind::ALL.len());
        for kind in EntityKind::ALL {
            let document = json_schema(kind, surface, strict);
            let compiled = jsonschema::validator_for(&document)
                .map_err(|err| SchemaError::CompileFailed(format!("{kind}: {err}")))?;
            validators.insert(kind, compiled);
        }
        Ok(Self {
            validators,
            surface,
        })
    }

    /// Validate JSON payload bytes against an entity's contract.
    pub fn validate(&self, kind: EntityKind, payload: &[u8]) -> Result<()> {
        let value: Value = serde_json::from_slice(payload)?;
        self.validate_value(kind, &value)
    }

    /// Validate an already parsed payload against an entity's contract.
    pub fn validate_value(&self, kind: EntityKind, payload: &Value) -> Result<()> {
        let Some(validator) = self.validators.get(&kind) else {
            return Err(SchemaError::ValidationFailed {
                entity: kind,
                message: "no contract compiled".to_string(),
            });
        };

        let mut errors = validator.iter_errors(payload);
        if let Some(first) = errors.next() {
            let mut message = first.to_string();
            for err in errors.take(3) {
                message.push_str("; ");
                message.push_str(&err.to_string());
            }
            return Err(SchemaError::ValidationFailed {
                entity: kind,
                message,
            });
        }

        Ok(())
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }
}
