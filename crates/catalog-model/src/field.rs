//! Canonical catalog field names.
//!
//! Every raw spreadsheet header is resolved once to one of these names by the
//! field normalizer. Downstream stages only ever see `FieldName`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! canonical_fields {
    ($($variant:ident => $name:literal,)*) => {
        /// Canonical (schema) name of a catalog field.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub enum FieldName {
            $($variant,)*
        }

        impl FieldName {
            pub const ALL: &'static [FieldName] = &[$(FieldName::$variant,)*];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(FieldName::$variant => $name,)*
                }
            }
        }

        impl FromStr for FieldName {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(FieldName::$variant),)*
                    other => Err(format!("unknown field name: {other}")),
                }
            }
        }
    };
}

canonical_fields! {
    UnitId => "UNITID",
    RootId => "ROOTID",
    Level => "LEVEL",
    UnitTitle => "UNITITLE",
    UnitTitleEng => "UNITITLE_ENG",
    Extent => "EXTENT",
    Cataloguer => "CATALOGUER",
    DateCataloging => "DATE_CATALOGING",
    RecordCreateDate => "RECORD_CREATE_DATE",
    CombinedCreators => "COMBINED_CREATORS",
    FirstCreatorPers => "FIRST_CREATOR_PERS",
    FirstCreatorCorp => "FIRST_CREATOR_CORP",
    TypeFirstCreatorPers => "TYPE_FIRST_CREATOR_PERS",
    TypeFirstCreatorCorp => "TYPE_FIRST_CREATOR_CORP",
    AddCreators => "ADD_CREATORS",
    AddCreatorPers => "ADD_CREATOR_PERS",
    AddCreatorCorps => "ADD_CREATOR_CORPS",
    Date => "DATE",
    DateNormal => "DATE_NORMAL",
    DateStart => "DATE_START",
    DateEnd => "DATE_END",
    PhotoDateEarly => "PHOTO_DATE_EARLY",
    PhotoDateLate => "PHOTO_DATE_LATE",
    ArchivalMaterial => "ARCHIVAL_MATERIAL",
    MediumFormat => "MEDIUM_FORMAT",
    AccessRestrict => "ACCESSRESTRICT",
    Language => "LANGUAGE",
    PublicationCountry => "PUBLICATION_COUNTRY",
    PersName => "PERSNAME",
    CorpName => "CORPNAME",
    Works => "WORKS",
    Subject => "SUBJECT",
    GeogName => "GEOGNAME",
    ScopeContent => "SCOPECONTENT",
    BiogHist => "BIOGHIST",
    Arrangement => "ARRANGEMENT",
    Appraisal => "APPRAISAL",
    Accruals => "ACCRUALS",
    Bibliography => "BIBLIOGRAPHY",
    RelatedMaterials => "RELATED_MATERIALS",
    CollectionType => "COLLECTION_TYPE",
    Barcode => "BARCODE",
    Container => "CONTAINER",
    PhysLoc => "PHYSLOC",
    ArchiveFileCode => "ARCHIVE_FILE_CODE",
    OriginalId => "ORIGINAL_ID",
    Notes => "NOTES",
    NotesHidden => "NOTES_HIDDEN",
    Technique => "TECHNIQUE",
    Dimensions => "DIMENSIONS",
    Scale => "SCALE",
    Digitization => "DIGITIZATION",
    TwoSideScan => "TWO_SIDE_SCAN",
    EstFilesNum => "EST_FILES_NUM",
    Public => "PUBLIC",
    ToDelete => "TO_DELETE",
}

impl FieldName {
    /// Fields holding a `;`-delimited list of values.
    pub fn is_multi_valued(&self) -> bool {
        matches!(
            self,
            FieldName::CombinedCreators
                | FieldName::AddCreators
                | FieldName::AddCreatorPers
                | FieldName::AddCreatorCorps
                | FieldName::ArchivalMaterial
                | FieldName::MediumFormat
                | FieldName::Language
                | FieldName::PublicationCountry
                | FieldName::PersName
                | FieldName::CorpName
                | FieldName::Works
                | FieldName::Subject
                | FieldName::GeogName
                | FieldName::Bibliography
                | FieldName::Cataloguer
        )
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<FieldName> for String {
    fn from(value: FieldName) -> Self {
        value.as_str().to_string()
    }
}

impl TryFrom<String> for FieldName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_str() {
        for field in FieldName::ALL {
            assert_eq!(field.as_str().parse::<FieldName>(), Ok(*field));
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert!("NOT_A_FIELD".parse::<FieldName>().is_err());
    }

    #[test]
    fn serializes_as_canonical_name() {
        let json = serde_json::to_string(&FieldName::AccessRestrict).unwrap();
        assert_eq!(json, "\"ACCESSRESTRICT\"");
    }
}
