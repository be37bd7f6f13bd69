use serde::{Deserialize, Serialize};

use crate::level::Level;
use crate::record::Record;

/// Collection-root metadata shared by every record of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    pub branch: String,
    pub name_heb: String,
    pub name_eng: String,
    pub credit_heb: String,
    pub credit_eng: String,
    pub owner: String,
    /// Free-text date of the collection as a whole.
    #[serde(default)]
    pub date: String,
}

impl Collection {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

/// All records of one collection, processed together by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    pub collection: Collection,
    pub records: Vec<Record>,
}

impl Batch {
    pub fn new(collection: Collection, records: Vec<Record>) -> Self {
        Self {
            collection,
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, unit_id: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.unit_id == unit_id)
    }

    /// The Section Record, when exactly one is present.
    pub fn section(&self) -> Option<&Record> {
        let mut sections = self.records.iter().filter(|r| r.level == Level::Section);
        let first = sections.next()?;
        sections.next().is_none().then_some(first)
    }
}
