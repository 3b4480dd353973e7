//! Datasets: a shared core plus raw/derived variants.
//!
//! `DatasetCore` carries everything common to datasets. [`Dataset`] is the
//! base record with an explicit type tag; [`RawDataset`] and
//! [`DerivedDataset`] flatten the same core and add their own fields with a
//! fixed tag. [`DatasetRecord`] is the tagged union of the two variants.

use serde::{Deserialize, Serialize};

use crate::kind::DatasetType;
use crate::layers::{Audit, Metadata, Ownership};
use crate::maybe::Maybe;

/// Fields shared by every dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetCore {
    /// Persistent identifier, assigned by the service.
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub pid: Maybe<String>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub classification: Maybe<String>,
    pub contact_email: String,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub creation_time: Maybe<String>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub dataset_name: Maybe<String>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub description: Maybe<String>,
    /// Change-log entries, opaque.
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub history: Maybe<Vec<Metadata>>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub instrument_id: Maybe<String>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub is_published: Maybe<bool>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub keywords: Maybe<Vec<String>>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub license: Maybe<String>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub number_of_files: Maybe<i64>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub number_of_files_archived: Maybe<i64>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub orcid_of_owner: Maybe<String>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub packed_size: Maybe<i64>,
    pub owner: String,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub owner_email: Maybe<String>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub shared_with: Maybe<Vec<String>>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub size: Maybe<i64>,
    pub source_folder: String,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub source_folder_host: Maybe<String>,
    /// Entries of the form `{"pid": ..., "name": ...}`.
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub techniques: Maybe<Vec<Metadata>>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub validation_status: Maybe<String>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub version: Maybe<String>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub scientific_metadata: Maybe<Metadata>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub principal_investigator: Maybe<String>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub creation_location: Maybe<String>,
}

impl DatasetCore {
    pub fn new(
        contact_email: impl Into<String>,
        owner: impl Into<String>,
        source_folder: impl Into<String>,
    ) -> Self {
        Self {
            contact_email: contact_email.into(),
            owner: owner.into(),
            source_folder: source_folder.into(),
            ..Self::default()
        }
    }

    /// Published flag; the service treats a missing flag as unpublished.
    pub fn is_published(&self) -> bool {
        self.is_published.or(false)
    }
}

/// A dataset of either type, decoded against the shared field set only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(rename = "type")]
    pub dataset_type: DatasetType,
    #[serde(flatten)]
    pub core: DatasetCore,
    #[serde(flatten)]
    pub ownership: Ownership,
    #[serde(flatten)]
    pub audit: Audit,
}

impl Dataset {
    pub fn new(dataset_type: DatasetType, core: DatasetCore, ownership: Ownership) -> Self {
        Self {
            dataset_type,
            core,
            ownership,
            audit: Audit::default(),
        }
    }
}

fn raw_tag() -> DatasetType {
    DatasetType::Raw
}

fn derived_tag() -> DatasetType {
    DatasetType::Derived
}

/// Raw datasets, from which derived datasets are derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDataset {
    #[serde(rename = "type", default = "raw_tag")]
    pub dataset_type: DatasetType,
    #[serde(flatten)]
    pub core: DatasetCore,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub data_format: Maybe<String>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub end_time: Maybe<String>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub sample_id: Maybe<String>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub proposal_id: Maybe<String>,
    #[serde(flatten)]
    pub ownership: Ownership,
    #[serde(flatten)]
    pub audit: Audit,
}

impl RawDataset {
    pub fn new(core: DatasetCore, ownership: Ownership) -> Self {
        Self {
            dataset_type: DatasetType::Raw,
            core,
            data_format: Maybe::Absent,
            end_time: Maybe::Absent,
            sample_id: Maybe::Absent,
            proposal_id: Maybe::Absent,
            ownership,
            audit: Audit::default(),
        }
    }
}

/// Datasets generated from one or more input datasets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedDataset {
    #[serde(rename = "type", default = "derived_tag")]
    pub dataset_type: DatasetType,
    #[serde(flatten)]
    pub core: DatasetCore,
    pub investigator: String,
    pub input_datasets: Vec<String>,
    pub used_software: Vec<String>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub job_parameters: Maybe<Metadata>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub job_log_data: Maybe<String>,
    #[serde(flatten)]
    pub ownership: Ownership,
    #[serde(flatten)]
    pub audit: Audit,
}

impl DerivedDataset {
    pub fn new(
        core: DatasetCore,
        ownership: Ownership,
        investigator: impl Into<String>,
        input_datasets: Vec<String>,
        used_software: Vec<String>,
    ) -> Self {
        Self {
            dataset_type: DatasetType::Derived,
            core,
            investigator: investigator.into(),
            input_datasets,
            used_software,
            job_parameters: Maybe::Absent,
            job_log_data: Maybe::Absent,
            ownership,
            audit: Audit::default(),
        }
    }
}

/// A dataset resolved to its variant by type tag.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetRecord {
    Raw(RawDataset),
    Derived(DerivedDataset),
}

impl DatasetRecord {
    pub fn dataset_type(&self) -> DatasetType {
        match self {
            DatasetRecord::Raw(_) => DatasetType::Raw,
            DatasetRecord::Derived(_) => DatasetType::Derived,
        }
    }

    pub fn core(&self) -> &DatasetCore {
        match self {
            DatasetRecord::Raw(dataset) => &dataset.core,
            DatasetRecord::Derived(dataset) => &dataset.core,
        }
    }

    pub fn ownership(&self) -> &Ownership {
        match self {
            DatasetRecord::Raw(dataset) => &dataset.ownership,
            DatasetRecord::Derived(dataset) => &dataset.ownership,
        }
    }
}

impl From<RawDataset> for DatasetRecord {
    fn from(dataset: RawDataset) -> Self {
        DatasetRecord::Raw(dataset)
    }
}

impl From<DerivedDataset> for DatasetRecord {
    fn from(dataset: DerivedDataset) -> Self {
        DatasetRecord::Derived(dataset)
    }
}
