//! The schema-definition table.
//!
//! Built once on first use and read-only afterwards. Entities are composed
//! from shared field groups (audit, ownership, dataset core) plus their own
//! fields; field order follows the service's model definitions.

use std::sync::LazyLock;

use scicat_model::{DatasetType, EntityKind};

use crate::field::{EntitySchema, FieldDefault, FieldSpec, Presence, Shape};

const AUDIT: &[FieldSpec] = &[
    FieldSpec::audit("createdBy"),
    FieldSpec::audit("updatedBy"),
    FieldSpec::audit("createdAt"),
    FieldSpec::audit("updatedAt"),
];

const OWNERSHIP: &[FieldSpec] = &[
    FieldSpec::required_on_create("ownerGroup", Shape::String),
    FieldSpec::optional("accessGroups", Shape::StringList),
    FieldSpec::optional("instrumentGroup", Shape::String),
];

const UNPUBLISHED: FieldDefault = FieldDefault::Bool(false);

const USER: &[FieldSpec] = &[
    FieldSpec::required("realm", Shape::String),
    FieldSpec::required("username", Shape::String),
    FieldSpec::required("email", Shape::String),
    FieldSpec::defaulted("emailVerified", Shape::Boolean, FieldDefault::Bool(false)),
    FieldSpec::assigned_id("id", Presence::Required),
];

const PROPOSAL: &[FieldSpec] = &[
    FieldSpec::required("proposalId", Shape::String),
    FieldSpec::optional("pi_email", Shape::String),
    FieldSpec::optional("pi_firstname", Shape::String),
    FieldSpec::optional("pi_lastname", Shape::String),
    FieldSpec::required("email", Shape::String),
    FieldSpec::optional("firstname", Shape::String),
    FieldSpec::optional("lastname", Shape::String),
    FieldSpec::optional("title", Shape::String),
    FieldSpec::optional("abstract", Shape::String),
    FieldSpec::optional("startTime", Shape::Timestamp),
    FieldSpec::optional("endTime", Shape::Timestamp),
    FieldSpec::optional("MeasurementPeriodList", Shape::MapList),
];

const SAMPLE: &[FieldSpec] = &[
    FieldSpec::optional("sampleId", Shape::String),
    FieldSpec::optional("owner", Shape::String),
    FieldSpec::optional("description", Shape::String),
    FieldSpec::optional("sampleCharacteristics", Shape::Map),
    FieldSpec::defaulted("isPublished", Shape::Boolean, UNPUBLISHED),
];

const JOB: &[FieldSpec] = &[
    FieldSpec::assigned_id("id", Presence::Optional),
    FieldSpec::required("emailJobInitiator", Shape::String),
    FieldSpec::required("type", Shape::String),
    FieldSpec::optional("creationTime", Shape::Timestamp),
    FieldSpec::optional("executionTime", Shape::Timestamp),
    FieldSpec::optional("jobParams", Shape::Map),
    FieldSpec::optional("jobStatusMessage", Shape::String),
    FieldSpec::optional("datasetList", Shape::Json),
    FieldSpec::optional("jobResultObject", Shape::Map),
];

const INSTRUMENT: &[FieldSpec] = &[
    FieldSpec::assigned_id("pid", Presence::Optional),
    FieldSpec::required("uniqueName", Shape::String),
    FieldSpec::required("name", Shape::String),
    FieldSpec::optional("customMetadata", Shape::Map),
];

const DATASET_CORE: &[FieldSpec] = &[
    FieldSpec::assigned_id("pid", Presence::Optional),
    FieldSpec::optional("classification", Shape::String),
    FieldSpec::required("contactEmail", Shape::String),
    FieldSpec::optional("creationTime", Shape::Timestamp),
    FieldSpec::optional("datasetName", Shape::String),
    FieldSpec::optional("description", Shape::String),
    FieldSpec::optional("history", Shape::MapList),
    FieldSpec::optional("instrumentId", Shape::String),
    FieldSpec::defaulted("isPublished", Shape::Boolean, UNPUBLISHED),
    FieldSpec::optional("keywords", Shape::StringList),
    FieldSpec::optional("license", Shape::String),
    FieldSpec::optional("numberOfFiles", Shape::Integer),
    FieldSpec::optional("numberOfFilesArchived", Shape::Integer),
    FieldSpec::optional("orcidOfOwner", Shape::String),
    FieldSpec::optional("packedSize", Shape::Integer),
    FieldSpec::required("owner", Shape::String),
    FieldSpec::optional("ownerEmail", Shape::String),
    FieldSpec::optional("sharedWith", Shape::StringList),
    FieldSpec::optional("size", Shape::Integer),
    FieldSpec::required("sourceFolder", Shape::String),
    FieldSpec::optional("sourceFolderHost", Shape::String),
    FieldSpec::optional("techniques", Shape::MapList),
    FieldSpec::optional("validationStatus", Shape::String),
    FieldSpec::optional("version", Shape::String),
    FieldSpec::optional("scientificMetadata", Shape::Map),
    FieldSpec::optional("principalInvestigator", Shape::String),
    FieldSpec::optional("creationLocation", Shape::String),
];

const DATASET_TAG: &[FieldSpec] = &[FieldSpec::required("type", Shape::DatasetTag)];

const RAW_DATASET: &[FieldSpec] = &[
    FieldSpec::defaulted(
        "type",
        Shape::DatasetTag,
        FieldDefault::Tag(DatasetType::Raw),
    ),
    FieldSpec::optional("dataFormat", Shape::String),
    FieldSpec::optional("endTime", Shape::Timestamp),
    FieldSpec::optional("sampleId", Shape::String),
    FieldSpec::optional("proposalId", Shape::String),
];

const DERIVED_DATASET: &[FieldSpec] = &[
    FieldSpec::defaulted(
        "type",
        Shape::DatasetTag,
        FieldDefault::Tag(DatasetType::Derived),
    ),
    FieldSpec::required("investigator", Shape::String),
    FieldSpec::required("inputDatasets", Shape::StringList),
    FieldSpec::required("usedSoftware", Shape::StringList),
    FieldSpec::optional("jobParameters", Shape::Map),
    FieldSpec::optional("jobLogData", Shape::String),
];

const DATA_FILE: &[FieldSpec] = &[
    FieldSpec::required("path", Shape::String),
    FieldSpec::required("size", Shape::Integer),
    FieldSpec::optional("time", Shape::Timestamp),
    FieldSpec::optional("chk", Shape::String),
    FieldSpec::optional("uid", Shape::String),
    FieldSpec::optional("gid", Shape::String),
    FieldSpec::optional("perm", Shape::String),
];

const DATABLOCK: &[FieldSpec] = &[
    FieldSpec::assigned_id("id", Presence::Optional),
    FieldSpec::required("size", Shape::Integer),
    FieldSpec::optional("packedSize", Shape::Integer),
    FieldSpec::optional("chkAlg", Shape::Integer),
    FieldSpec::optional("version", Shape::String),
    FieldSpec::required("dataFileList", Shape::Records(EntityKind::DataFile)),
    FieldSpec::required("datasetId", Shape::String),
];

const ORIG_DATABLOCK: &[FieldSpec] = &[
    FieldSpec::assigned_id("id", Presence::Optional),
    FieldSpec::required("size", Shape::Integer),
    FieldSpec::required("dataFileList", Shape::Records(EntityKind::DataFile)),
    FieldSpec::required("datasetId", Shape::String),
];

const ATTACHMENT: &[FieldSpec] = &[
    FieldSpec::assigned_id("id", Presence::Optional),
    FieldSpec::required("thumbnail", Shape::String),
    FieldSpec::optional("caption", Shape::String),
    FieldSpec::required("datasetId", Shape::String),
];

const PUBLISHED_DATA: &[FieldSpec] = &[
    FieldSpec::required("doi", Shape::String),
    FieldSpec::optional("affiliation", Shape::String),
    FieldSpec::optional("creator", Shape::StringList),
    FieldSpec::optional("publisher", Shape::String),
    FieldSpec::optional("publicationYear", Shape::Integer),
    FieldSpec::optional("title", Shape::String),
    FieldSpec::optional("url", Shape::String),
    FieldSpec::optional("abstract", Shape::String),
    FieldSpec::optional("dataDescription", Shape::String),
    FieldSpec::optional("resourceType", Shape::String),
    FieldSpec::optional("numberOfFiles", Shape::Integer),
    FieldSpec::optional("sizeOfArchive", Shape::Integer),
    FieldSpec::optional("pidArray", Shape::StringList),
    FieldSpec::optional("authors", Shape::StringList),
    FieldSpec::optional("registeredTime", Shape::Timestamp),
    FieldSpec::optional("status", Shape::String),
    FieldSpec::optional("thumbnail", Shape::String),
];

static SCHEMAS: LazyLock<[EntitySchema; 13]> = LazyLock::new(|| EntityKind::ALL.map(build));

/// The field set of an entity.
pub fn schema_for(kind: EntityKind) -> &'static EntitySchema {
    &SCHEMAS[kind as usize]
}

fn build(kind: EntityKind) -> EntitySchema {
    let groups: &[&[FieldSpec]] = match kind {
        EntityKind::User => &[USER],
        EntityKind::Proposal => &[PROPOSAL, OWNERSHIP, AUDIT],
        EntityKind::Sample => &[SAMPLE, OWNERSHIP, AUDIT],
        EntityKind::Job => &[JOB, AUDIT],
        EntityKind::Instrument => &[INSTRUMENT, AUDIT],
        EntityKind::Dataset => &[DATASET_TAG, DATASET_CORE, OWNERSHIP, AUDIT],
        EntityKind::RawDataset => &[RAW_DATASET, DATASET_CORE, OWNERSHIP, AUDIT],
        EntityKind::DerivedDataset => &[DERIVED_DATASET, DATASET_CORE, OWNERSHIP, AUDIT],
        EntityKind::DataFile => &[DATA_FILE, AUDIT],
        EntityKind::Datablock => &[DATABLOCK, OWNERSHIP, AUDIT],
        EntityKind::OrigDatablock => &[ORIG_DATABLOCK, OWNERSHIP, AUDIT],
        EntityKind::Attachment => &[ATTACHMENT, OWNERSHIP, AUDIT],
        EntityKind::PublishedData => &[PUBLISHED_DATA, AUDIT],
    };

    EntitySchema {
        kind,
        fields: groups.iter().flat_map(|group| group.iter().copied()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::field::Role;

    #[test]
    fn table_is_indexed_by_kind() {
        for kind in EntityKind::ALL {
            assert_eq!(schema_for(kind).kind, kind);
        }
    }

    #[test]
    fn field_names_are_unique_per_entity() {
        for kind in EntityKind::ALL {
            let schema = schema_for(kind);
            let names: HashSet<_> = schema.fields.iter().map(|field| field.name).collect();
            assert_eq!(names.len(), schema.fields.len(), "duplicate field in {kind}");
        }
    }

    #[test]
    fn layers_follow_entity_kind() {
        for kind in EntityKind::ALL {
            let schema = schema_for(kind);
            assert_eq!(schema.declares("ownerGroup"), kind.is_ownable(), "{kind}");
            assert_eq!(schema.declares("createdAt"), kind.is_auditable(), "{kind}");
        }
    }

    #[test]
    fn dataset_required_fields() {
        let required: Vec<_> = schema_for(EntityKind::Dataset).required_fields().collect();
        assert_eq!(required, vec!["type", "contactEmail", "owner", "sourceFolder"]);

        let derived: HashSet<_> = schema_for(EntityKind::DerivedDataset)
            .required_fields()
            .collect();
        assert!(derived.contains("investigator"));
        assert!(derived.contains("inputDatasets"));
        assert!(derived.contains("usedSoftware"));
        assert!(!derived.contains("type"));
    }

    #[test]
    fn variants_extend_the_base_field_set() {
        let base = schema_for(EntityKind::Dataset);
        for variant in [EntityKind::RawDataset, EntityKind::DerivedDataset] {
            let schema = schema_for(variant);
            for field in &base.fields {
                assert!(schema.declares(field.name), "{variant} lacks {}", field.name);
            }
        }
    }

    #[test]
    fn data_file_is_not_ownable_but_audited() {
        let schema = schema_for(EntityKind::DataFile);
        assert!(!schema.declares("ownerGroup"));
        assert_eq!(
            schema.field("createdBy").map(|field| field.role),
            Some(Role::Audit)
        );
    }
}
