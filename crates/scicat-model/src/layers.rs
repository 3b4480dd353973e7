//! Field layers shared across entities.
//!
//! Records embed these with `#[serde(flatten)]`, so their fields appear at the
//! top level of the wire object.

use serde::{Deserialize, Serialize};

use crate::maybe::Maybe;

/// Free-form JSON object carried opaquely (scientific metadata, job params).
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Server-populated creation and modification metadata.
///
/// The service rejects these on create; they only ever arrive on reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Audit {
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub created_by: Maybe<String>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub updated_by: Maybe<String>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub created_at: Maybe<String>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub updated_at: Maybe<String>,
}

impl Audit {
    /// True when no audit field is set at all.
    pub fn is_empty(&self) -> bool {
        self.created_by.is_absent()
            && self.updated_by.is_absent()
            && self.created_at.is_absent()
            && self.updated_at.is_absent()
    }
}

/// Group-based access fields. Carried, never enforced here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ownership {
    /// Required when creating; read projections may omit it.
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub owner_group: Maybe<String>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub access_groups: Maybe<Vec<String>>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub instrument_group: Maybe<String>,
}

impl Ownership {
    pub fn new(owner_group: impl Into<String>) -> Self {
        Self {
            owner_group: Maybe::Present(owner_group.into()),
            ..Self::default()
        }
    }

    pub fn with_access_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.access_groups = Maybe::Present(groups.into_iter().map(Into::into).collect());
        self
    }
}
