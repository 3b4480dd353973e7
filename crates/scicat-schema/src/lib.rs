//! Schema registry, validation and wire codec for SciCat catalog records.
//!
//! Sits between an HTTP client and application code. Inbound payloads are
//! checked against the entity's field table and decoded into typed records;
//! outbound records are encoded with the create/update rules of the catalog
//! service (no audit fields or server-assigned ids on create).
//!
//! Validation is all-or-nothing: a call either returns a complete record or
//! payload, or the first violation found.

pub mod config;
pub mod contract;
pub mod entities;
pub mod error;
pub mod field;
pub mod registry;
pub mod validator;

pub use config::{RegistryConfig, UnknownFieldPolicy};
pub use contract::{json_schema, ContractSet, Surface};
pub use entities::schema_for;
pub use error::{Result, SchemaError};
pub use field::{EntitySchema, FieldDefault, FieldSpec, Presence, Role, Shape};
pub use registry::{Decoded, SchemaRegistry};
pub use validator::Direction;
