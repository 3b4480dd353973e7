use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::block::{Attachment, DataFile, Datablock, OrigDatablock};
use crate::catalog::{Instrument, Job, Proposal, PublishedData, Sample, User};
use crate::dataset::{Dataset, DatasetRecord, DerivedDataset, RawDataset};
use crate::kind::EntityKind;

/// A typed catalog record with a fixed wire shape.
pub trait Record: Serialize + DeserializeOwned + Clone + std::fmt::Debug {
    /// The entity this record type represents.
    const KIND: EntityKind;
}

macro_rules! records {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl Record for $ty {
                const KIND: EntityKind = EntityKind::$ty;
            }
        )+

        /// Any record, for callers that pick the entity kind at runtime.
        #[derive(Debug, Clone, PartialEq)]
        pub enum AnyRecord {
            $($ty($ty),)+
        }

        impl AnyRecord {
            pub fn kind(&self) -> EntityKind {
                match self {
                    $(AnyRecord::$ty(_) => EntityKind::$ty,)+
                }
            }
        }

        $(
            impl From<$ty> for AnyRecord {
                fn from(record: $ty) -> Self {
                    AnyRecord::$ty(record)
                }
            }
        )+
    };
}

records!(
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
);

impl From<DatasetRecord> for AnyRecord {
    fn from(record: DatasetRecord) -> Self {
        match record {
            DatasetRecord::Raw(dataset) => AnyRecord::RawDataset(dataset),
            DatasetRecord::Derived(dataset) => AnyRecord::DerivedDataset(dataset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::Ownership;

    #[test]
    fn any_record_reports_kind() {
        let record = AnyRecord::from(DataFile::new("a.tif", 1));
        assert_eq!(record.kind(), EntityKind::DataFile);
        assert_eq!(<OrigDatablock as Record>::KIND, EntityKind::OrigDatablock);

        let dataset = DatasetRecord::from(RawDataset::new(
            crate::dataset::DatasetCore::new("a@b.com", "me", "/x"),
            Ownership::new("grp1"),
        ));
        assert_eq!(AnyRecord::from(dataset).kind(), EntityKind::RawDataset);
    }
}
