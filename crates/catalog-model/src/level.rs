use std::fmt;

use serde::{Deserialize, Serialize};

/// Hierarchical level of an archival unit, from the collection root down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Level {
    #[serde(rename = "Section Record")]
    Section,
    #[serde(rename = "Fonds Record")]
    Fonds,
    #[serde(rename = "Sub-Fonds Record")]
    SubFonds,
    #[serde(rename = "Series Record")]
    Series,
    #[serde(rename = "Sub-Series Record")]
    SubSeries,
    #[serde(rename = "File Record")]
    File,
    #[serde(rename = "Item Record")]
    Item,
}

impl Level {
    pub const ALL: [Level; 7] = [
        Level::Section,
        Level::Fonds,
        Level::SubFonds,
        Level::Series,
        Level::SubSeries,
        Level::File,
        Level::Item,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Section => "Section Record",
            Level::Fonds => "Fonds Record",
            Level::SubFonds => "Sub-Fonds Record",
            Level::Series => "Series Record",
            Level::SubSeries => "Sub-Series Record",
            Level::File => "File Record",
            Level::Item => "Item Record",
        }
    }

    /// Parses a level label as catalogers write it.
    ///
    /// Accepts the Hebrew labels (with or without inner spaces, including the
    /// `סידרה` spelling variant) and the English labels, with or without the
    /// trailing "Record", case-insensitively.
    pub fn from_label(raw: &str) -> Option<Level> {
        let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        let hebrew = match compact.as_str() {
            "אוסף" => Some(Level::Section),
            "חטיבה" => Some(Level::Fonds),
            "תתחטיבה" => Some(Level::SubFonds),
            "סדרה" | "סידרה" => Some(Level::Series),
            "תתסדרה" | "תתסידרה" => Some(Level::SubSeries),
            "תיק" => Some(Level::File),
            "פריט" => Some(Level::Item),
            _ => None,
        };
        if hebrew.is_some() {
            return hebrew;
        }
        let english = compact.to_ascii_lowercase().replace('-', "");
        let english = english.strip_suffix("record").unwrap_or(&english);
        match english {
            "section" | "collection" => Some(Level::Section),
            "fonds" => Some(Level::Fonds),
            "subfonds" => Some(Level::SubFonds),
            "series" => Some(Level::Series),
            "subseries" => Some(Level::SubSeries),
            "file" => Some(Level::File),
            "item" => Some(Level::Item),
            _ => None,
        }
    }

    /// File and Item records describe physical units and carry access restrictions.
    pub fn is_unit(&self) -> bool {
        matches!(self, Level::File | Level::Item)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
