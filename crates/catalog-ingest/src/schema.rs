use serde::{Deserialize, Serialize};

use catalog_model::FieldName;

/// Catalog template generations.
///
/// `V1` catalogs carry one combined-creators column; `V2` catalogs split the
/// first creator (person or corporate body, each with a role column) from the
/// additional creators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVersion {
    #[default]
    V1,
    V2,
}

const SHARED_MANDATORY: &[FieldName] = &[
    FieldName::UnitId,
    FieldName::Level,
    FieldName::UnitTitle,
    FieldName::Extent,
    FieldName::Cataloguer,
    FieldName::DateCataloging,
];

impl SchemaVersion {
    /// Guesses the version from the canonical fields present after normalization.
    pub fn detect(present: &[FieldName]) -> SchemaVersion {
        let v2 = present.iter().any(|f| {
            matches!(
                f,
                FieldName::FirstCreatorPers | FieldName::FirstCreatorCorp
            )
        });
        if v2 { SchemaVersion::V2 } else { SchemaVersion::V1 }
    }

    pub fn mandatory_fields(&self) -> Vec<FieldName> {
        let mut fields = SHARED_MANDATORY.to_vec();
        if *self == SchemaVersion::V1 {
            fields.push(FieldName::CombinedCreators);
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v2_drops_combined_creators() {
        assert!(SchemaVersion::V1
            .mandatory_fields()
            .contains(&FieldName::CombinedCreators));
        assert!(!SchemaVersion::V2
            .mandatory_fields()
            .contains(&FieldName::CombinedCreators));
        assert_eq!(SchemaVersion::V2.mandatory_fields().len(), 6);
    }

    #[test]
    fn detects_split_creator_columns() {
        assert_eq!(
            SchemaVersion::detect(&[FieldName::UnitId, FieldName::FirstCreatorCorp]),
            SchemaVersion::V2
        );
        assert_eq!(
            SchemaVersion::detect(&[FieldName::UnitId, FieldName::CombinedCreators]),
            SchemaVersion::V1
        );
    }
}
