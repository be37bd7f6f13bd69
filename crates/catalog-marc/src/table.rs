use std::collections::BTreeSet;

use serde::Serialize;

use crate::control::ControlField;

/// Column holding the record identifier in the output table.
pub const ID_COLUMN: &str = "UNITID";
pub const LEADER_COLUMN: &str = "LDR";
pub const CONTROL_COLUMN: &str = "008";

/// One encoded output field, e.g. tag `"7001"` occurrence 2 in column `7001_2`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputField {
    /// Tag with indicators, as used for the column name (`"24510"`, `"655 7"`).
    pub tag: String,
    /// Position within an exploded list, starting at 1.
    pub occurrence: Option<usize>,
    pub value: String,
}

impl OutputField {
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            occurrence: None,
            value: value.into(),
        }
    }

    pub fn numbered(tag: impl Into<String>, occurrence: usize, value: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            occurrence: Some(occurrence),
            value: value.into(),
        }
    }

    pub fn column(&self) -> String {
        match self.occurrence {
            Some(n) => format!("{}_{n}", self.tag),
            None => self.tag.clone(),
        }
    }
}

/// Expands a list into sequentially numbered fields, one per non-empty value,
/// in source order.
pub fn explode<I, S>(tag: &str, values: I) -> Vec<OutputField>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .filter(|v| !v.as_ref().trim().is_empty())
        .enumerate()
        .map(|(idx, v)| OutputField::numbered(tag, idx + 1, v.as_ref().trim()))
        .collect()
}

/// Output of one record: leader, control field and ordered data fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedRecord {
    pub unit_id: String,
    pub leader: String,
    pub control: ControlField,
    pub fields: Vec<OutputField>,
}

impl EncodedRecord {
    pub fn new(unit_id: impl Into<String>) -> Self {
        Self {
            unit_id: unit_id.into(),
            leader: String::new(),
            control: ControlField::new(),
            fields: Vec::new(),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.fields.iter().any(|f| f.tag == tag)
    }

    /// Adds a field unless its value is empty or its column is already filled.
    pub fn push(&mut self, field: OutputField) {
        if field.value.is_empty() {
            return;
        }
        let column = field.column();
        if self.fields.iter().any(|f| f.column() == column) {
            return;
        }
        self.fields.push(field);
    }

    pub fn extend(&mut self, fields: impl IntoIterator<Item = OutputField>) {
        for field in fields {
            self.push(field);
        }
    }

    /// Value of a column, including the leader and control columns.
    pub fn get(&self, column: &str) -> Option<String> {
        match column {
            ID_COLUMN => Some(self.unit_id.clone()),
            LEADER_COLUMN => Some(self.leader.clone()).filter(|l| !l.is_empty()),
            CONTROL_COLUMN => Some(self.control.to_string()),
            _ => self
                .fields
                .iter()
                .find(|f| f.column() == column)
                .map(|f| f.value.clone()),
        }
    }

    pub fn values(&self, tag: &str) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.tag == tag)
            .map(|f| f.value.as_str())
            .collect()
    }
}

/// Encoded records of one batch, ready for an external writer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputTable {
    pub records: Vec<EncodedRecord>,
}

impl OutputTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&self, unit_id: &str) -> Option<&EncodedRecord> {
        self.records.iter().find(|r| r.unit_id == unit_id)
    }

    /// Union of every record's columns: identifier, leader and control field
    /// first, then data fields ordered by tag and occurrence.
    pub fn columns(&self) -> Vec<String> {
        let data: BTreeSet<(&str, usize, String)> = self
            .records
            .iter()
            .flat_map(|r| r.fields.iter())
            .map(|f| (f.tag.as_str(), f.occurrence.unwrap_or(0), f.column()))
            .collect();
        [ID_COLUMN, LEADER_COLUMN, CONTROL_COLUMN]
            .into_iter()
            .map(String::from)
            .chain(data.into_iter().map(|(_, _, column)| column))
            .collect()
    }

    /// Rows aligned with [`OutputTable::columns`]; absent cells are empty.
    pub fn rows(&self) -> Vec<Vec<String>> {
        let columns = self.columns();
        self.records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|c| record.get(c).unwrap_or_default())
                    .collect()
            })
            .collect()
    }
}
