use scicat_model::{
    AnyRecord, Attachment, DataFile, Datablock, Dataset, DatasetRecord, DatasetType,
    DerivedDataset, EntityKind, Instrument, Job, OrigDatablock, Proposal, PublishedData,
    RawDataset, Record, Sample, User,
};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::trace;

use crate::config::RegistryConfig;
use crate::entities::schema_for;
use crate::error::{Result, SchemaError};
use crate::field::{EntitySchema, Shape};
use crate::validator::{describe, Direction, Flow, Walk};

/// A successfully decoded record plus any undeclared keys kept aside.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<R> {
    pub record: R,
    /// Undeclared keys, populated only under `UnknownFieldPolicy::Retain`.
    /// Nested keys are qualified with their path (`dataFileList[0].inode`).
    pub overflow: Map<String, Value>,
}

impl<R> Decoded<R> {
    pub fn into_record(self) -> R {
        self.record
    }

    pub fn map<U>(self, f: impl FnOnce(R) -> U) -> Decoded<U> {
        Decoded {
            record: f(self.record),
            overflow: self.overflow,
        }
    }
}

/// Validates, decodes and encodes catalog records.
///
/// The field tables are process-wide and immutable; the registry only adds
/// configuration, so it is cheap to build and safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    config: RegistryConfig,
}

impl SchemaRegistry {
    /// Create a registry with default config.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a registry with explicit config.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self { config }
    }

    /// Decode a payload into a typed record.
    pub fn decode<R: Record>(&self, payload: &Value) -> Result<Decoded<R>> {
        let object = as_object(R::KIND, payload)?;
        let mut walk = Walk::new(&self.config, Flow::Read);
        let normalized = walk.object(schema_for(R::KIND), object, "")?;
        let record = serde_json::from_value(Value::Object(normalized)).map_err(|source| {
            SchemaError::Conversion {
                entity: R::KIND,
                source,
            }
        })?;

        trace!(entity = %R::KIND, overflow = walk.overflow.len(), "decoded record");
        Ok(Decoded {
            record,
            overflow: walk.overflow,
        })
    }

    /// Decode a payload from JSON text.
    pub fn decode_str<R: Record>(&self, json: &str) -> Result<Decoded<R>> {
        let payload: Value = serde_json::from_str(json)?;
        self.decode(&payload)
    }

    /// Decode a payload from JSON bytes.
    pub fn decode_slice<R: Record>(&self, json: &[u8]) -> Result<Decoded<R>> {
        let payload: Value = serde_json::from_slice(json)?;
        self.decode(&payload)
    }

    /// Decode a payload whose entity kind is only known at runtime.
    pub fn decode_kind(&self, kind: EntityKind, payload: &Value) -> Result<Decoded<AnyRecord>> {
        match kind {
            EntityKind::User => self.decode_any::<User>(payload),
            EntityKind::Proposal => self.decode_any::<Proposal>(payload),
            EntityKind::Sample => self.decode_any::<Sample>(payload),
            EntityKind::Job => self.decode_any::<Job>(payload),
            EntityKind::Instrument => self.decode_any::<Instrument>(payload),
            EntityKind::Dataset => self.decode_any::<Dataset>(payload),
            EntityKind::RawDataset => self.decode_any::<RawDataset>(payload),
            EntityKind::DerivedDataset => self.decode_any::<DerivedDataset>(payload),
            EntityKind::DataFile => self.decode_any::<DataFile>(payload),
            EntityKind::Datablock => self.decode_any::<Datablock>(payload),
            EntityKind::OrigDatablock => self.decode_any::<OrigDatablock>(payload),
            EntityKind::Attachment => self.decode_any::<Attachment>(payload),
            EntityKind::PublishedData => self.decode_any::<PublishedData>(payload),
        }
    }

    /// Decode a payload returned by the endpoint at `path`, e.g.
    /// `/api/v3/RawDatasets/abc`.
    pub fn decode_endpoint(&self, path: &str, payload: &Value) -> Result<Decoded<AnyRecord>> {
        let kind = EntityKind::from_endpoint(path)?;
        self.decode_kind(kind, payload)
    }

    /// Decode a dataset into its variant, chosen by the payload's type tag.
    pub fn decode_dataset(&self, payload: &Value) -> Result<Decoded<DatasetRecord>> {
        let object = as_object(EntityKind::Dataset, payload)?;
        let tag = object
            .get("type")
            .ok_or_else(|| SchemaError::MissingRequiredField {
                field: "type".to_string(),
                entity: EntityKind::Dataset,
            })?;
        let dataset_type = tag
            .as_str()
            .and_then(|tag| tag.parse::<DatasetType>().ok())
            .ok_or_else(|| SchemaError::TypeMismatch {
                entity: EntityKind::Dataset,
                field: "type".to_string(),
                expected: Shape::DatasetTag,
                received: describe(tag),
            })?;

        trace!(variant = %dataset_type.kind(), "dispatching dataset on type tag");
        match dataset_type {
            DatasetType::Raw => Ok(self.decode::<RawDataset>(payload)?.map(DatasetRecord::Raw)),
            DatasetType::Derived => Ok(self
                .decode::<DerivedDataset>(payload)?
                .map(DatasetRecord::Derived)),
        }
    }

    /// Encode a typed record as a request body.
    ///
    /// Fields that are absent are omitted. On `Direction::Create`, audit
    /// fields and server-assigned ids are omitted too, or rejected when
    /// `strip_forbidden_on_create` is off.
    pub fn encode<R: Record>(&self, record: &R, direction: Direction) -> Result<Map<String, Value>> {
        self.encode_as(R::KIND, record, direction)
    }

    /// Encode a record whose kind is only known at runtime.
    pub fn encode_any(&self, record: &AnyRecord, direction: Direction) -> Result<Map<String, Value>> {
        match record {
            AnyRecord::User(record) => self.encode(record, direction),
            AnyRecord::Proposal(record) => self.encode(record, direction),
            AnyRecord::Sample(record) => self.encode(record, direction),
            AnyRecord::Job(record) => self.encode(record, direction),
            AnyRecord::Instrument(record) => self.encode(record, direction),
            AnyRecord::Dataset(record) => self.encode(record, direction),
            AnyRecord::RawDataset(record) => self.encode(record, direction),
            AnyRecord::DerivedDataset(record) => self.encode(record, direction),
            AnyRecord::DataFile(record) => self.encode(record, direction),
            AnyRecord::Datablock(record) => self.encode(record, direction),
            AnyRecord::OrigDatablock(record) => self.encode(record, direction),
            AnyRecord::Attachment(record) => self.encode(record, direction),
            AnyRecord::PublishedData(record) => self.encode(record, direction),
        }
    }

    /// Encode either dataset variant.
    pub fn encode_dataset(
        &self,
        record: &DatasetRecord,
        direction: Direction,
    ) -> Result<Map<String, Value>> {
        match record {
            DatasetRecord::Raw(dataset) => self.encode(dataset, direction),
            DatasetRecord::Derived(dataset) => self.encode(dataset, direction),
        }
    }

    /// Check a raw outbound payload built outside the typed records.
    ///
    /// Unlike [`encode`](Self::encode), nothing is stripped: a create payload
    /// carrying audit fields or server-assigned ids fails with
    /// `SchemaError::ForbiddenFieldOnCreate`. Returns the normalized payload.
    pub fn check_outbound(
        &self,
        kind: EntityKind,
        payload: &Map<String, Value>,
        direction: Direction,
    ) -> Result<Map<String, Value>> {
        let flow = Flow::Write {
            direction,
            strip: false,
        };
        Walk::new(&self.config, flow).object(schema_for(kind), payload, "")
    }

    /// The field table of an entity.
    pub fn schema(&self, kind: EntityKind) -> &'static EntitySchema {
        schema_for(kind)
    }

    /// Kinds known to the registry.
    pub fn kinds(&self) -> Vec<EntityKind> {
        EntityKind::ALL.to_vec()
    }

    /// Get registry configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    fn decode_any<R>(&self, payload: &Value) -> Result<Decoded<AnyRecord>>
    where
        R: Record + Into<AnyRecord>,
    {
        Ok(self.decode::<R>(payload)?.map(Into::into))
    }

    fn encode_as<T: Serialize>(
        &self,
        kind: EntityKind,
        record: &T,
        direction: Direction,
    ) -> Result<Map<String, Value>> {
        let value = serde_json::to_value(record)
            .map_err(|source| SchemaError::Conversion { entity: kind, source })?;
        let object = as_object(kind, &value)?;
        let flow = Flow::Write {
            direction,
            strip: self.config.strip_forbidden_on_create,
        };
        let encoded = Walk::new(&self.config, flow).object(schema_for(kind), object, "")?;

        trace!(entity = %kind, ?direction, fields = encoded.len(), "encoded record");
        Ok(encoded)
    }
}

fn as_object(entity: EntityKind, payload: &Value) -> Result<&Map<String, Value>> {
    payload.as_object().ok_or_else(|| SchemaError::NotAnObject {
        entity,
        received: describe(payload),
    })
}

#[cfg(test)]
mod tests {
    use scicat_model::{DatasetCore, Maybe, Ownership};
    use serde_json::json;

    use super::*;
    use crate::config::UnknownFieldPolicy;

    fn minimal_dataset() -> Value {
        json!({
            "contactEmail": "a@b.com",
            "owner": "grp1",
            "sourceFolder": "/data/x",
            "type": "raw",
            "principalInvestigator": "Dr. X",
            "creationLocation": "Lab1"
        })
    }

    #[test]
    fn decode_minimal_dataset() {
        let registry = SchemaRegistry::new();
        let dataset = registry
            .decode::<Dataset>(&minimal_dataset())
            .unwrap()
            .into_record();

        assert_eq!(dataset.dataset_type, DatasetType::Raw);
        assert_eq!(dataset.core.source_folder, "/data/x");
        assert!(dataset.core.pid.is_absent());
        assert!(dataset.core.is_published.is_absent());
        assert!(dataset.ownership.owner_group.is_absent());
        assert!(dataset.audit.is_empty());
    }

    #[test]
    fn decode_missing_source_folder() {
        let registry = SchemaRegistry::new();
        let mut payload = minimal_dataset();
        payload.as_object_mut().unwrap().remove("sourceFolder");

        match registry.decode::<Dataset>(&payload) {
            Err(SchemaError::MissingRequiredField { field, entity }) => {
                assert_eq!(field, "sourceFolder");
                assert_eq!(entity, EntityKind::Dataset);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn raw_dataset_rejects_derived_tag() {
        let registry = SchemaRegistry::new();
        let mut payload = minimal_dataset();
        payload["type"] = json!("derived");

        assert!(matches!(
            registry.decode::<RawDataset>(&payload),
            Err(SchemaError::TypeTagMismatch {
                entity: EntityKind::RawDataset,
                expected: DatasetType::Raw,
                found: DatasetType::Derived,
            })
        ));
    }

    #[test]
    fn decode_dataset_dispatches_on_tag() {
        let registry = SchemaRegistry::new();
        let raw = registry.decode_dataset(&minimal_dataset()).unwrap();
        assert_eq!(raw.record.dataset_type(), DatasetType::Raw);

        let mut derived = minimal_dataset();
        derived["type"] = json!("derived");
        assert!(matches!(
            registry.decode_dataset(&derived),
            Err(SchemaError::MissingRequiredField { ref field, entity: EntityKind::DerivedDataset }) if field == "investigator"
        ));

        derived["investigator"] = json!("Dr. Y");
        derived["inputDatasets"] = json!(["pid/1"]);
        derived["usedSoftware"] = json!(["reduce"]);
        let decoded = registry.decode_dataset(&derived).unwrap();
        assert_eq!(decoded.record.dataset_type(), DatasetType::Derived);

        let mut untagged = minimal_dataset();
        untagged.as_object_mut().unwrap().remove("type");
        assert!(matches!(
            registry.decode_dataset(&untagged),
            Err(SchemaError::MissingRequiredField { entity: EntityKind::Dataset, .. })
        ));
    }

    #[test]
    fn decode_endpoint_selects_kind() {
        let registry = SchemaRegistry::new();
        let decoded = registry
            .decode_endpoint("/api/v3/RawDatasets", &minimal_dataset())
            .unwrap();
        assert_eq!(decoded.record.kind(), EntityKind::RawDataset);

        assert!(matches!(
            registry.decode_endpoint("/api/v3/Nothing", &minimal_dataset()),
            Err(SchemaError::Model(_))
        ));
    }

    #[test]
    fn decode_rejects_non_objects_and_bad_json() {
        let registry = SchemaRegistry::new();
        assert!(matches!(
            registry.decode::<Sample>(&json!([1, 2])),
            Err(SchemaError::NotAnObject { entity: EntityKind::Sample, .. })
        ));
        assert!(matches!(
            registry.decode_str::<Sample>("{not json"),
            Err(SchemaError::InvalidJson(_))
        ));
        assert!(registry.decode_slice::<Sample>(b"{}").is_ok());
    }

    #[test]
    fn unknown_field_policies() {
        let mut payload = minimal_dataset();
        payload["legacyField"] = json!(1);

        let dropped = SchemaRegistry::new().decode::<Dataset>(&payload).unwrap();
        assert!(dropped.overflow.is_empty());

        let retained = SchemaRegistry::with_config(RegistryConfig::permissive())
            .decode::<Dataset>(&payload)
            .unwrap();
        assert_eq!(retained.overflow.get("legacyField"), Some(&json!(1)));

        let strict = SchemaRegistry::with_config(RegistryConfig {
            unknown_fields: UnknownFieldPolicy::Reject,
            ..RegistryConfig::default()
        });
        assert!(matches!(
            strict.decode::<Dataset>(&payload),
            Err(SchemaError::UnknownField { ref field, .. }) if field == "legacyField"
        ));
    }

    #[test]
    fn encode_create_omits_assigned_fields() {
        let registry = SchemaRegistry::new();
        let mut dataset = RawDataset::new(
            DatasetCore::new("a@b.com", "me", "/data/x"),
            Ownership::new("grp1"),
        );
        dataset.core.pid = Maybe::Present("20.500/abc".to_string());
        dataset.audit.created_at = Maybe::Present("2024-01-01T00:00:00Z".to_string());

        let created = registry.encode(&dataset, Direction::Create).unwrap();
        assert!(!created.contains_key("pid"));
        assert!(!created.contains_key("createdAt"));
        assert_eq!(created["type"], json!("raw"));

        let updated = registry.encode(&dataset, Direction::Update).unwrap();
        assert_eq!(updated["pid"], json!("20.500/abc"));
        assert_eq!(updated["createdAt"], json!("2024-01-01T00:00:00Z"));

        let strict = SchemaRegistry::with_config(RegistryConfig::strict());
        assert!(matches!(
            strict.encode(&dataset, Direction::Create),
            Err(SchemaError::ForbiddenFieldOnCreate { entity: EntityKind::RawDataset, .. })
        ));
    }

    #[test]
    fn encode_create_requires_owner_group() {
        let registry = SchemaRegistry::new();
        let dataset = RawDataset::new(
            DatasetCore::new("a@b.com", "me", "/data/x"),
            Ownership::default(),
        );

        assert!(matches!(
            registry.encode(&dataset, Direction::Create),
            Err(SchemaError::MissingRequiredField { ref field, .. }) if field == "ownerGroup"
        ));
        assert!(registry.encode(&dataset, Direction::Update).is_ok());
    }

    #[test]
    fn encode_create_rejects_null_owner_group() {
        let registry = SchemaRegistry::new();
        let mut dataset = RawDataset::new(
            DatasetCore::new("a@b.com", "me", "/data/x"),
            Ownership::new("grp1"),
        );
        dataset.ownership.owner_group = Maybe::Null;

        assert!(matches!(
            registry.encode(&dataset, Direction::Create),
            Err(SchemaError::TypeMismatch { ref field, ref received, .. })
                if field == "ownerGroup" && received == "null"
        ));
        let updated = registry.encode(&dataset, Direction::Update).unwrap();
        assert_eq!(updated["ownerGroup"], Value::Null);
    }

    #[test]
    fn derived_dataset_rejects_raw_tag() {
        let registry = SchemaRegistry::new();
        let mut payload = minimal_dataset();
        payload["investigator"] = json!("Dr. Y");
        payload["inputDatasets"] = json!(["pid/1"]);
        payload["usedSoftware"] = json!(["reduce"]);

        assert!(matches!(
            registry.decode::<DerivedDataset>(&payload),
            Err(SchemaError::TypeTagMismatch {
                entity: EntityKind::DerivedDataset,
                expected: DatasetType::Derived,
                found: DatasetType::Raw,
            })
        ));
    }

    #[test]
    fn encode_rejects_variant_with_foreign_tag() {
        let registry = SchemaRegistry::new();
        let mut dataset = RawDataset::new(
            DatasetCore::new("a@b.com", "me", "/data/x"),
            Ownership::new("grp1"),
        );
        dataset.dataset_type = DatasetType::Derived;

        assert!(matches!(
            registry.encode(&dataset, Direction::Update),
            Err(SchemaError::TypeTagMismatch { .. })
        ));
    }

    #[test]
    fn check_outbound_never_strips() {
        let registry = SchemaRegistry::new();
        let Value::Object(payload) = json!({
            "uniqueName": "beamline-7",
            "name": "Beamline 7",
            "pid": "instr/7"
        }) else {
            unreachable!()
        };

        assert!(matches!(
            registry.check_outbound(EntityKind::Instrument, &payload, Direction::Create),
            Err(SchemaError::ForbiddenFieldOnCreate { ref field, .. }) if field == "pid"
        ));
        let normalized = registry
            .check_outbound(EntityKind::Instrument, &payload, Direction::Update)
            .unwrap();
        assert_eq!(normalized, payload);
    }

    #[test]
    fn check_outbound_unknown_field_policies() {
        let Value::Object(payload) = json!({
            "uniqueName": "beamline-7",
            "name": "Beamline 7",
            "legacyField": 1
        }) else {
            unreachable!()
        };

        let retained = SchemaRegistry::with_config(RegistryConfig::permissive())
            .check_outbound(EntityKind::Instrument, &payload, Direction::Create)
            .unwrap();
        assert!(!retained.contains_key("legacyField"));
        assert_eq!(retained.len(), 2);

        let strict = SchemaRegistry::with_config(RegistryConfig {
            unknown_fields: UnknownFieldPolicy::Reject,
            ..RegistryConfig::default()
        });
        assert!(matches!(
            strict.check_outbound(EntityKind::Instrument, &payload, Direction::Update),
            Err(SchemaError::UnknownField { entity: EntityKind::Instrument, ref field })
                if field == "legacyField"
        ));
    }

    #[test]
    fn encode_any_and_dataset_union() {
        let registry = SchemaRegistry::new();
        let dataset = DatasetRecord::from(RawDataset::new(
            DatasetCore::new("a@b.com", "me", "/data/x"),
            Ownership::new("grp1"),
        ));

        let via_union = registry.encode_dataset(&dataset, Direction::Create).unwrap();
        let via_any = registry
            .encode_any(&AnyRecord::from(dataset), Direction::Create)
            .unwrap();
        assert_eq!(via_union, via_any);
    }

    #[test]
    fn config_access() {
        let config = RegistryConfig::strict();
        let registry = SchemaRegistry::with_config(config);
        assert_eq!(registry.config(), &config);
        assert_eq!(registry.kinds().len(), EntityKind::ALL.len());
        assert_eq!(registry.schema(EntityKind::Job).kind, EntityKind::Job);
    }
}
