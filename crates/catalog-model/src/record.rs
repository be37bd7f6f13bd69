use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::creator::Creator;
use crate::field::FieldName;
use crate::level::Level;

/// Delimiter of multi-valued cells.
pub const VALUE_DELIMITER: char = ';';

/// Splits a multi-valued cell on `;`, trimming and dropping empty values.
pub fn split_values(raw: &str) -> Vec<String> {
    raw.split(VALUE_DELIMITER)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .collect()
}

/// One archival unit (collection, series, file or item).
///
/// Identity and hierarchy are typed; the remaining canonical fields live in a
/// field map keyed by [`FieldName`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub unit_id: String,
    /// Identifier of the nearest ancestor. Empty for the Section Record and
    /// until the hierarchy resolver has run (unless given explicitly).
    pub root_id: String,
    pub level: Level,
    pub start_year: Option<u16>,
    pub end_year: Option<u16>,
    /// Ordered creator list, filled by the creator classifier.
    #[serde(default)]
    pub creators: Vec<Creator>,
    #[serde(default)]
    values: BTreeMap<FieldName, String>,
}

impl Record {
    pub fn new(unit_id: impl Into<String>, level: Level) -> Self {
        Self {
            unit_id: unit_id.into(),
            root_id: String::new(),
            level,
            start_year: None,
            end_year: None,
            creators: Vec::new(),
            values: BTreeMap::new(),
        }
    }

    /// Builder-style setter, mostly for fixtures.
    #[must_use]
    pub fn with(mut self, field: FieldName, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Returns the field value, or `""` when absent.
    pub fn get(&self, field: FieldName) -> &str {
        self.values.get(&field).map_or("", String::as_str)
    }

    pub fn has(&self, field: FieldName) -> bool {
        !self.get(field).is_empty()
    }

    /// Sets a field value; empty values remove the field.
    pub fn set(&mut self, field: FieldName, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            self.values.remove(&field);
        } else {
            self.values.insert(field, value);
        }
    }

    pub fn remove(&mut self, field: FieldName) -> Option<String> {
        self.values.remove(&field)
    }

    /// Split values of a multi-valued field.
    pub fn list(&self, field: FieldName) -> Vec<String> {
        split_values(self.get(field))
    }

    pub fn set_list(&mut self, field: FieldName, values: &[String]) {
        self.set(field, values.join(";"));
    }

    pub fn fields(&self) -> impl Iterator<Item = (FieldName, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn title(&self) -> &str {
        self.get(FieldName::UnitTitle)
    }

    pub fn date_text(&self) -> &str {
        self.get(FieldName::Date)
    }

    pub fn is_section(&self) -> bool {
        self.level == Level::Section
    }
}
