//! File-level records attached to a dataset.

use serde::{Deserialize, Serialize};

use crate::layers::{Audit, Ownership};
use crate::maybe::Maybe;

/// A file entry. Exists only inside a datablock's file list.
///
/// `path` is relative to the owning dataset's `sourceFolder`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataFile {
    pub path: String,
    /// Size in bytes.
    pub size: i64,
    /// Modification time.
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub time: Maybe<String>,
    /// Checksum.
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub chk: Maybe<String>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub uid: Maybe<String>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub gid: Maybe<String>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub perm: Maybe<String>,
    #[serde(flatten)]
    pub audit: Audit,
}

impl DataFile {
    pub fn new(path: impl Into<String>, size: i64) -> Self {
        Self {
            path: path.into(),
            size,
            time: Maybe::Absent,
            chk: Maybe::Absent,
            uid: Maybe::Absent,
            gid: Maybe::Absent,
            perm: Maybe::Absent,
            audit: Audit::default(),
        }
    }
}

/// A packed (archived) set of files belonging to one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Datablock {
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub id: Maybe<String>,
    pub size: i64,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub packed_size: Maybe<i64>,
    /// Checksum algorithm identifier.
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub chk_alg: Maybe<i64>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub version: Maybe<String>,
    pub data_file_list: Vec<DataFile>,
    pub dataset_id: String,
    #[serde(flatten)]
    pub ownership: Ownership,
    #[serde(flatten)]
    pub audit: Audit,
}

impl Datablock {
    pub fn new(dataset_id: impl Into<String>, ownership: Ownership, files: Vec<DataFile>) -> Self {
        let size = files.iter().map(|file| file.size).sum();
        Self {
            id: Maybe::Absent,
            size,
            packed_size: Maybe::Absent,
            chk_alg: Maybe::Absent,
            version: Maybe::Absent,
            data_file_list: files,
            dataset_id: dataset_id.into(),
            ownership,
            audit: Audit::default(),
        }
    }
}

/// The original (pre-packing) set of files belonging to one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrigDatablock {
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub id: Maybe<String>,
    pub size: i64,
    pub data_file_list: Vec<DataFile>,
    pub dataset_id: String,
    #[serde(flatten)]
    pub ownership: Ownership,
    #[serde(flatten)]
    pub audit: Audit,
}

impl OrigDatablock {
    /// Build a block whose size is the sum of its file sizes.
    pub fn new(dataset_id: impl Into<String>, ownership: Ownership, files: Vec<DataFile>) -> Self {
        let size = files.iter().map(|file| file.size).sum();
        Self {
            id: Maybe::Absent,
            size,
            data_file_list: files,
            dataset_id: dataset_id.into(),
            ownership,
            audit: Audit::default(),
        }
    }
}

/// A base64-encoded attachment, typically a dataset thumbnail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub id: Maybe<String>,
    pub thumbnail: String,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub caption: Maybe<String>,
    pub dataset_id: String,
    #[serde(flatten)]
    pub ownership: Ownership,
    #[serde(flatten)]
    pub audit: Audit,
}

impl Attachment {
    pub fn new(
        dataset_id: impl Into<String>,
        ownership: Ownership,
        thumbnail: impl Into<String>,
    ) -> Self {
        Self {
            id: Maybe::Absent,
            thumbnail: thumbnail.into(),
            caption: Maybe::Absent,
            dataset_id: dataset_id.into(),
            ownership,
            audit: Audit::default(),
        }
    }
}
