//! Entity kinds and the dataset type tag.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Every record type exchanged with the catalog service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    User,
    Proposal,
    Sample,
    Job,
    Instrument,
    Dataset,
    RawDataset,
    DerivedDataset,
    DataFile,
    Datablock,
    OrigDatablock,
    Attachment,
    PublishedData,
}

impl EntityKind {
    /// All kinds, in declaration order.
    pub const ALL: [EntityKind; 13] = [
        EntityKind::User,
        EntityKind::Proposal,
        EntityKind::Sample,
        EntityKind::Job,
        EntityKind::Instrument,
        EntityKind::Dataset,
        EntityKind::RawDataset,
        EntityKind::DerivedDataset,
        EntityKind::DataFile,
        EntityKind::Datablock,
        EntityKind::OrigDatablock,
        EntityKind::Attachment,
        EntityKind::PublishedData,
    ];

    /// Returns the entity name as used in error messages and schemas.
    pub fn name(self) -> &'static str {
        match self {
            EntityKind::User => "User",
            EntityKind::Proposal => "Proposal",
            EntityKind::Sample => "Sample",
            EntityKind::Job => "Job",
            EntityKind::Instrument => "Instrument",
            EntityKind::Dataset => "Dataset",
            EntityKind::RawDataset => "RawDataset",
            EntityKind::DerivedDataset => "DerivedDataset",
            EntityKind::DataFile => "DataFile",
            EntityKind::Datablock => "Datablock",
            EntityKind::OrigDatablock => "OrigDatablock",
            EntityKind::Attachment => "Attachment",
            EntityKind::PublishedData => "PublishedData",
        }
    }

    /// The REST collection serving this kind. DataFile is embedded only.
    pub fn endpoint(self) -> Option<&'static str> {
        match self {
            EntityKind::User => Some("Users"),
            EntityKind::Proposal => Some("Proposals"),
            EntityKind::Sample => Some("Samples"),
            EntityKind::Job => Some("Jobs"),
            EntityKind::Instrument => Some("Instruments"),
            EntityKind::Dataset => Some("Datasets"),
            EntityKind::RawDataset => Some("RawDatasets"),
            EntityKind::DerivedDataset => Some("DerivedDatasets"),
            EntityKind::DataFile => None,
            EntityKind::Datablock => Some("Datablocks"),
            EntityKind::OrigDatablock => Some("OrigDatablocks"),
            EntityKind::Attachment => Some("Attachments"),
            EntityKind::PublishedData => Some("PublishedData"),
        }
    }

    /// Resolve the kind served by an endpoint path such as
    /// `/api/v3/RawDatasets/abc` or `rawdatasets`.
    ///
    /// The first path segment naming a collection wins; matching ignores case.
    pub fn from_endpoint(path: &str) -> Result<Self> {
        path.split(['/', '?'])
            .filter(|segment| !segment.is_empty())
            .find_map(|segment| {
                Self::ALL.into_iter().find(|kind| {
                    kind.endpoint()
                        .is_some_and(|endpoint| endpoint.eq_ignore_ascii_case(segment))
                })
            })
            .ok_or_else(|| ModelError::UnknownEndpoint(path.to_string()))
    }

    /// The fixed dataset tag for the dataset variants.
    pub fn dataset_type(self) -> Option<DatasetType> {
        match self {
            EntityKind::RawDataset => Some(DatasetType::Raw),
            EntityKind::DerivedDataset => Some(DatasetType::Derived),
            _ => None,
        }
    }

    /// True for kinds carrying owner/access group fields.
    pub fn is_ownable(self) -> bool {
        matches!(
            self,
            EntityKind::Proposal
                | EntityKind::Sample
                | EntityKind::Dataset
                | EntityKind::RawDataset
                | EntityKind::DerivedDataset
                | EntityKind::Datablock
                | EntityKind::OrigDatablock
                | EntityKind::Attachment
        )
    }

    /// True for kinds carrying server-populated audit fields.
    pub fn is_auditable(self) -> bool {
        !matches!(self, EntityKind::User)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EntityKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ModelError::UnknownEntityKind(s.to_string()))
    }
}

/// Type tag discriminating raw from derived datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetType {
    Raw,
    Derived,
}

impl DatasetType {
    pub fn as_str(self) -> &'static str {
        match self {
            DatasetType::Raw => "raw",
            DatasetType::Derived => "derived",
        }
    }

    /// The entity kind of the variant carrying this tag.
    pub fn kind(self) -> EntityKind {
        match self {
            DatasetType::Raw => EntityKind::RawDataset,
            DatasetType::Derived => EntityKind::DerivedDataset,
        }
    }
}

impl fmt::Display for DatasetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatasetType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "raw" => Ok(DatasetType::Raw),
            "derived" => Ok(DatasetType::Derived),
            other => Err(ModelError::InvalidDatasetType(other.to_string())),
        }
    }
}
