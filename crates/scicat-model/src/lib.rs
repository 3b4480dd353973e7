//! Typed records for the SciCat scientific-metadata catalog.
//!
//! Each struct mirrors one record type of the catalog's HTTP API, with wire
//! names as the service spells them. Shared field layers (ownership, audit)
//! and the dataset core are composed with `#[serde(flatten)]`; raw and
//! derived datasets are variants over the same core, not subclasses.
//!
//! Optional fields use [`Maybe`] so that an omitted key and an explicit
//! `null` stay distinguishable. Validation against the field tables lives in
//! `scicat-schema`; this crate is plain data.

pub mod block;
pub mod catalog;
pub mod dataset;
pub mod error;
pub mod kind;
pub mod layers;
pub mod maybe;
pub mod record;

pub use block::{Attachment, DataFile, Datablock, OrigDatablock};
pub use catalog::{Instrument, Job, Proposal, PublishedData, Sample, User};
pub use dataset::{Dataset, DatasetCore, DatasetRecord, DerivedDataset, RawDataset};
pub use error::{ModelError, Result};
pub use kind::{DatasetType, EntityKind};
pub use layers::{Audit, Metadata, Ownership};
pub use maybe::Maybe;
pub use record::{AnyRecord, Record};
