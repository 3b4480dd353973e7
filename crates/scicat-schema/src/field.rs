//! Field descriptors: name, shape, presence rule and role.

use std::fmt;

use scicat_model::{DatasetType, EntityKind};
use serde_json::Value;

/// The semantic type a field's value must have on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    String,
    /// A string carrying a date-time. Not parsed.
    Timestamp,
    Integer,
    Boolean,
    StringList,
    /// A list of free-form objects.
    MapList,
    /// A free-form object.
    Map,
    /// Any JSON value, carried opaquely.
    Json,
    /// The dataset `type` discriminator.
    DatasetTag,
    /// A list of embedded records of the given kind.
    Records(EntityKind),
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::String => f.write_str("string"),
            Shape::Timestamp => f.write_str("timestamp string"),
            Shape::Integer => f.write_str("integer"),
            Shape::Boolean => f.write_str("boolean"),
            Shape::StringList => f.write_str("list of strings"),
            Shape::MapList => f.write_str("list of objects"),
            Shape::Map => f.write_str("object"),
            Shape::Json => f.write_str("any JSON value"),
            Shape::DatasetTag => f.write_str("dataset type (\"raw\" or \"derived\")"),
            Shape::Records(kind) => write!(f, "list of {kind} records"),
        }
    }
}

/// A default the service applies when the field is omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    Bool(bool),
    Tag(DatasetType),
}

impl FieldDefault {
    pub fn to_value(self) -> Value {
        match self {
            FieldDefault::Bool(flag) => Value::Bool(flag),
            FieldDefault::Tag(tag) => Value::String(tag.as_str().to_string()),
        }
    }
}

/// When a field must be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Always required, in both directions.
    Required,
    /// Required in create payloads; read payloads may omit it.
    RequiredOnCreate,
    Optional,
    /// Optional, with a default applied by the service (or the record type).
    Defaulted(FieldDefault),
}

/// Who owns a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Supplied by the client.
    Data,
    /// Populated by the service on writes (`createdAt`, `updatedBy`, ...).
    Audit,
    /// Identifier assigned by the service (`pid`, `id`).
    ServerAssigned,
}

/// One declared field of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub shape: Shape,
    pub presence: Presence,
    pub role: Role,
}

impl FieldSpec {
    pub const fn required(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            shape,
            presence: Presence::Required,
            role: Role::Data,
        }
    }

    pub const fn optional(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            shape,
            presence: Presence::Optional,
            role: Role::Data,
        }
    }

    pub const fn defaulted(name: &'static str, shape: Shape, default: FieldDefault) -> Self {
        Self {
            name,
            shape,
            presence: Presence::Defaulted(default),
            role: Role::Data,
        }
    }

    pub const fn required_on_create(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            shape,
            presence: Presence::RequiredOnCreate,
            role: Role::Data,
        }
    }

    pub const fn audit(name: &'static str) -> Self {
        Self {
            name,
            shape: Shape::String,
            presence: Presence::Optional,
            role: Role::Audit,
        }
    }

    /// A server-assigned string identifier.
    pub const fn assigned_id(name: &'static str, presence: Presence) -> Self {
        Self {
            name,
            shape: Shape::String,
            presence,
            role: Role::ServerAssigned,
        }
    }

    /// Audit fields and server-assigned ids never appear in create payloads.
    pub fn forbidden_on_create(&self) -> bool {
        !matches!(self.role, Role::Data)
    }

    /// Whether an explicit `null` is an acceptable value in a payload flowing
    /// the given way. A field required on create must carry a real value there.
    pub fn nullable(&self, creating: bool) -> bool {
        match self.presence {
            Presence::Required => false,
            Presence::RequiredOnCreate if creating => false,
            _ => !matches!(self.shape, Shape::DatasetTag),
        }
    }

    /// Whether the field must be present in a payload flowing the given way.
    pub fn is_required(&self, creating: bool) -> bool {
        if creating && self.forbidden_on_create() {
            return false;
        }
        match self.presence {
            Presence::Required => true,
            Presence::RequiredOnCreate => creating,
            Presence::Optional | Presence::Defaulted(_) => false,
        }
    }

    pub fn default_value(&self) -> Option<Value> {
        match self.presence {
            Presence::Defaulted(default) => Some(default.to_value()),
            _ => None,
        }
    }
}

/// The complete, fixed field set of one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySchema {
    pub kind: EntityKind,
    pub fields: Vec<FieldSpec>,
}

impl EntitySchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn declares(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Names of fields required in read payloads.
    pub fn required_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields
            .iter()
            .filter(|field| field.is_required(false))
            .map(|field| field.name)
    }
}
