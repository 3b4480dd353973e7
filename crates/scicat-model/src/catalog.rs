//! Catalog records other than datasets and their file blocks.

use serde::{Deserialize, Serialize};

use crate::layers::{Audit, Metadata, Ownership};
use crate::maybe::Maybe;

/// A catalog user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub realm: String,
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub email_verified: Maybe<bool>,
    pub id: String,
}

impl User {
    pub fn email_verified(&self) -> bool {
        self.email_verified.or(false)
    }
}

/// The purpose of an experiment, linking it to its principal investigator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub proposal_id: String,
    #[serde(rename = "pi_email", default, skip_serializing_if = "Maybe::is_absent")]
    pub pi_email: Maybe<String>,
    #[serde(rename = "pi_firstname", default, skip_serializing_if = "Maybe::is_absent")]
    pub pi_firstname: Maybe<String>,
    #[serde(rename = "pi_lastname", default, skip_serializing_if = "Maybe::is_absent")]
    pub pi_lastname: Maybe<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub firstname: Maybe<String>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub lastname: Maybe<String>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub title: Maybe<String>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub r#abstract: Maybe<String>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub start_time: Maybe<String>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub end_time: Maybe<String>,
    #[serde(
        rename = "MeasurementPeriodList",
        default,
        skip_serializing_if = "Maybe::is_absent"
    )]
    pub measurement_period_list: Maybe<Vec<Metadata>>,
    #[serde(flatten)]
    pub ownership: Ownership,
    #[serde(flatten)]
    pub audit: Audit,
}

impl Proposal {
    pub fn new(
        proposal_id: impl Into<String>,
        email: impl Into<String>,
        ownership: Ownership,
    ) -> Self {
        Self {
            proposal_id: proposal_id.into(),
            pi_email: Maybe::Absent,
            pi_firstname: Maybe::Absent,
            pi_lastname: Maybe::Absent,
            email: email.into(),
            firstname: Maybe::Absent,
            lastname: Maybe::Absent,
            title: Maybe::Absent,
            r#abstract: Maybe::Absent,
            start_time: Maybe::Absent,
            end_time: Maybe::Absent,
            measurement_period_list: Maybe::Absent,
            ownership,
            audit: Audit::default(),
        }
    }
}

/// A sample investigated by raw datasets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub sample_id: Maybe<String>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub owner: Maybe<String>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub description: Maybe<String>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub sample_characteristics: Maybe<Metadata>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub is_published: Maybe<bool>,
    #[serde(flatten)]
    pub ownership: Ownership,
    #[serde(flatten)]
    pub audit: Audit,
}

impl Sample {
    pub fn new(ownership: Ownership) -> Self {
        Self {
            ownership,
            ..Self::default()
        }
    }

    pub fn is_published(&self) -> bool {
        self.is_published.or(false)
    }
}

/// An archive, retrieval or analysis job tracked by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub id: Maybe<String>,
    pub email_job_initiator: String,
    /// Job type, e.g. `archive` or `retrieve`. Free-form on the wire.
    #[serde(rename = "type")]
    pub job_type: String,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub creation_time: Maybe<String>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub execution_time: Maybe<String>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub job_params: Maybe<Metadata>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub job_status_message: Maybe<String>,
    /// Either a list of `{pid, files}` entries or an object, depending on the
    /// service version.
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub dataset_list: Maybe<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub job_result_object: Maybe<Metadata>,
    #[serde(flatten)]
    pub audit: Audit,
}

impl Job {
    pub fn new(email_job_initiator: impl Into<String>, job_type: impl Into<String>) -> Self {
        Self {
            id: Maybe::Absent,
            email_job_initiator: email_job_initiator.into(),
            job_type: job_type.into(),
            creation_time: Maybe::Absent,
            execution_time: Maybe::Absent,
            job_params: Maybe::Absent,
            job_status_message: Maybe::Absent,
            dataset_list: Maybe::Absent,
            job_result_object: Maybe::Absent,
            audit: Audit::default(),
        }
    }
}

/// An instrument; most of its description lives in `customMetadata`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub pid: Maybe<String>,
    pub unique_name: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub custom_metadata: Maybe<Metadata>,
    #[serde(flatten)]
    pub audit: Audit,
}

impl Instrument {
    pub fn new(unique_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            pid: Maybe::Absent,
            unique_name: unique_name.into(),
            name: name.into(),
            custom_metadata: Maybe::Absent,
            audit: Audit::default(),
        }
    }
}

/// A published data record keyed by its registered DOI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedData {
    pub doi: String,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub affiliation: Maybe<String>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub creator: Maybe<Vec<String>>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub publisher: Maybe<String>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub publication_year: Maybe<i64>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub title: Maybe<String>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub url: Maybe<String>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub r#abstract: Maybe<String>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub data_description: Maybe<String>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub resource_type: Maybe<String>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub number_of_files: Maybe<i64>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub size_of_archive: Maybe<i64>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub pid_array: Maybe<Vec<String>>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub authors: Maybe<Vec<String>>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub registered_time: Maybe<String>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub status: Maybe<String>,
    #[serde(default, skip_serializing_if = "Maybe::is_absent")]
    pub thumbnail: Maybe<String>,
    #[serde(flatten)]
    pub audit: Audit,
}

impl PublishedData {
    pub fn new(doi: impl Into<String>) -> Self {
        Self {
            doi: doi.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn proposal_keeps_legacy_wire_names() {
        let mut proposal = Proposal::new("p-1", "pi@lab.org", Ownership::new("grp1"));
        proposal.pi_email = "pi@lab.org".to_string().into();
        proposal.r#abstract = "beam time".to_string().into();
        proposal.measurement_period_list = Maybe::Present(vec![]);

        let value = serde_json::to_value(&proposal).unwrap();
        assert_eq!(value["pi_email"], "pi@lab.org");
        assert_eq!(value["abstract"], "beam time");
        assert_eq!(value["MeasurementPeriodList"], json!([]));
        assert!(value.get("piEmail").is_none());
    }

    #[test]
    fn job_type_is_named_type_on_the_wire() {
        let job = Job::new("me@lab.org", "archive");
        assert_eq!(
            serde_json::to_value(&job).unwrap(),
            json!({ "emailJobInitiator": "me@lab.org", "type": "archive" })
        );
    }

    #[test]
    fn semantic_defaults_apply_when_absent() {
        let user: User = serde_json::from_value(json!({
            "realm": "ldap",
            "username": "u",
            "email": "u@lab.org",
            "id": "42"
        }))
        .unwrap();
        assert!(user.email_verified.is_absent());
        assert!(!user.email_verified());
        assert!(!Sample::new(Ownership::new("grp1")).is_published());
    }
}
