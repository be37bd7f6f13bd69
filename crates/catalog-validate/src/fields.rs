use catalog_model::FieldName;
use catalog_standards::AuthorityKind;

/// Controlled fields and the authority each is validated against, in
/// validation order.
pub const VALIDATED_FIELDS: &[(FieldName, AuthorityKind)] = &[
    (FieldName::ArchivalMaterial, AuthorityKind::ArchivalMaterial),
    (FieldName::MediumFormat, AuthorityKind::MediaFormat),
    (FieldName::Language, AuthorityKind::Language),
    (FieldName::PublicationCountry, AuthorityKind::Country),
    (FieldName::AccessRestrict, AuthorityKind::AccessRestriction),
];

pub fn authority_for(field: FieldName) -> Option<AuthorityKind> {
    VALIDATED_FIELDS
        .iter()
        .find(|(f, _)| *f == field)
        .map(|(_, kind)| *kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_authority_kind_but_roles_is_validated() {
        for kind in AuthorityKind::ALL {
            let validated = VALIDATED_FIELDS.iter().any(|(_, k)| *k == kind);
            let is_role = matches!(kind, AuthorityKind::PersonRole | AuthorityKind::CorporateRole);
            assert_eq!(validated, !is_role, "{kind}");
        }
        assert_eq!(authority_for(FieldName::Subject), None);
    }
}
