use scicat_model::{DatasetType, EntityKind, ModelError};

use crate::field::Shape;

/// Errors that can occur while validating, decoding or encoding records.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// A required field is absent.
    #[error("{entity}: missing required field `{field}`")]
    MissingRequiredField { field: String, entity: EntityKind },

    /// A field value does not have the declared shape.
    #[error("{entity}: field `{field}` expected {expected}, got {received}")]
    TypeMismatch {
        entity: EntityKind,
        field: String,
        expected: Shape,
        received: String,
    },

    /// A dataset variant received the other variant's type tag.
    #[error("{entity}: type tag must be \"{expected}\", got \"{found}\"")]
    TypeTagMismatch {
        entity: EntityKind,
        expected: DatasetType,
        found: DatasetType,
    },

    /// A server-populated field appears in a create payload.
    #[error("{entity}: field `{field}` is assigned by the service and cannot be sent on create")]
    ForbiddenFieldOnCreate { entity: EntityKind, field: String },

    /// The payload carries a field the entity does not declare.
    #[error("{entity}: unknown field `{field}`")]
    UnknownField { entity: EntityKind, field: String },

    /// The payload is not valid JSON.
    #[error("payload is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The payload is valid JSON but not an object.
    #[error("{entity}: payload must be a JSON object, got {received}")]
    NotAnObject { entity: EntityKind, received: String },

    /// A validated payload could not be converted into its record type.
    #[error("{entity}: record conversion failed: {source}")]
    Conversion {
        entity: EntityKind,
        source: serde_json::Error,
    },

    /// A generated JSON Schema contract could not be compiled.
    #[error("failed to compile schema: {0}")]
    CompileFailed(String),

    /// The payload failed JSON Schema contract validation.
    #[error("{entity}: contract validation failed: {message}")]
    ValidationFailed { entity: EntityKind, message: String },

    /// Entity or endpoint resolution failed.
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl SchemaError {
    /// The field the error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            SchemaError::MissingRequiredField { field, .. }
            | SchemaError::TypeMismatch { field, .. }
            | SchemaError::ForbiddenFieldOnCreate { field, .. }
            | SchemaError::UnknownField { field, .. } => Some(field.as_str()),
            SchemaError::TypeTagMismatch { .. } => Some("type"),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SchemaError>;
