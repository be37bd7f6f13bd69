//! Creator Classifier.
//!
//! A combined-creators cell looks like `"כהן, משה [צלם];הבימה [מפיק]"`. Each
//! entry is split into name and bracketed role, and the role is looked up in
//! the person and corporate role authorities. Roles found in neither go
//! through the correction protocol and, failing that, into the run's role
//! report.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, warn};

use catalog_map::{
    CorrectionRequest, DEFAULT_ACCEPT_THRESHOLD, ROLE_CANDIDATE_LIMIT, ResolutionPolicy,
};
use catalog_model::{
    Batch, Creator, CreatorKind, FieldName, Record, RoleDiscrepancy, RoleReport, split_values,
};
use catalog_standards::AuthorityContext;

/// Text between `[` and the following `]`, or `""` without brackets.
pub fn find_role(raw: &str) -> &str {
    let raw = raw.trim();
    match raw.find('[') {
        Some(start) => {
            let rest = &raw[start + 1..];
            let end = rest.find(']').unwrap_or(rest.len());
            rest[..end].trim()
        }
        None => "",
    }
}

/// Text before `[`, right-trimmed.
pub fn find_name(raw: &str) -> &str {
    let name = match raw.find('[') {
        Some(start) => &raw[..start],
        None => raw,
    };
    name.trim()
}

/// Splits a combined-creators cell into ordered creators. Entries without a
/// name are skipped.
pub fn parse_creators(raw: &str) -> Vec<Creator> {
    split_values(raw)
        .iter()
        .map(|entry| Creator::new(find_name(entry), find_role(entry)))
        .filter(|creator| !creator.name.is_empty())
        .collect()
}

/// Builds the combined-creators cell of a split-column catalog: the first
/// creator (person, else corporate body) with its role, then the additional
/// persons and corporate bodies.
pub fn assemble_combined_creators(record: &Record) -> String {
    let first = [
        (FieldName::FirstCreatorPers, FieldName::TypeFirstCreatorPers),
        (FieldName::FirstCreatorCorp, FieldName::TypeFirstCreatorCorp),
    ]
    .into_iter()
    .find(|(name, _)| record.has(*name))
    .map(|(name, role)| {
        let creator = Creator::new(record.get(name).trim(), record.get(role).trim());
        creator.to_string()
    });

    first
        .into_iter()
        .chain(
            [
                FieldName::AddCreators,
                FieldName::AddCreatorPers,
                FieldName::AddCreatorCorps,
            ]
            .into_iter()
            .flat_map(|field| split_values(record.get(field))),
        )
        .collect::<Vec<_>>()
        .join(";")
}

/// Classification by exact membership in one of the role authorities.
pub fn classify_role(role: &str, authorities: &AuthorityContext) -> CreatorKind {
    if authorities.person_roles().contains(role) {
        CreatorKind::Person
    } else if authorities.corporate_roles().contains(role) {
        CreatorKind::Corporate
    } else {
        CreatorKind::Unknown
    }
}

/// Creators split by classification. Unclassified creators are filed with the
/// persons.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatorPartition {
    pub persons: Vec<Creator>,
    pub corporates: Vec<Creator>,
}

/// Order-preserving, de-duplicated partition of `creators`.
pub fn partition_creators(creators: &[Creator]) -> CreatorPartition {
    let mut seen = BTreeSet::new();
    let mut partition = CreatorPartition::default();
    for creator in creators {
        if !seen.insert((creator.name.as_str(), creator.role.as_str())) {
            continue;
        }
        match creator.kind {
            CreatorKind::Corporate => partition.corporates.push(creator.clone()),
            CreatorKind::Person | CreatorKind::Unknown => partition.persons.push(creator.clone()),
        }
    }
    partition
}

/// Main entry and added entries of one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatorEntries {
    pub main: Option<Creator>,
    pub added_persons: Vec<Creator>,
    pub added_corporates: Vec<Creator>,
}

/// The first creator becomes the main entry; the others are added entries,
/// minus any identical (name and role) to the main entry.
pub fn creator_entries(creators: &[Creator]) -> CreatorEntries {
    let Some((main, rest)) = creators.split_first() else {
        return CreatorEntries::default();
    };
    let same_as_main = |c: &Creator| c.name == main.name && c.role == main.role;
    let CreatorPartition {
        persons,
        corporates,
    } = partition_creators(rest);
    CreatorEntries {
        main: Some(main.clone()),
        added_persons: persons.into_iter().filter(|c| !same_as_main(c)).collect(),
        added_corporates: corporates.into_iter().filter(|c| !same_as_main(c)).collect(),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CreatorOptions {
    /// Minimum similarity for a role correction to be offered.
    pub accept_threshold: f32,
    pub candidate_limit: usize,
}

impl Default for CreatorOptions {
    fn default() -> Self {
        Self {
            accept_threshold: DEFAULT_ACCEPT_THRESHOLD,
            candidate_limit: ROLE_CANDIDATE_LIMIT,
        }
    }
}

/// What the classifier found and changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreatorOutcome {
    pub report: RoleReport,
    /// Confirmed role rewrites, `(original, canonical)`.
    pub corrections: Vec<(String, String)>,
    /// Records whose combined-creators cell was assembled from split columns.
    pub assembled: usize,
    /// Keyword access points dropped because they repeat a creator.
    pub keywords_removed: usize,
}

/// Classifies the creators of every record in the batch.
///
/// Unresolved roles never abort the run: each is offered as a correction
/// when its closest authority key clears the threshold, and whatever the
/// policy declines lands in the role report.
pub fn classify_creators(
    batch: &mut Batch,
    authorities: &AuthorityContext,
    policy: &mut ResolutionPolicy,
    options: &CreatorOptions,
) -> CreatorOutcome {
    let mut outcome = CreatorOutcome::default();

    for record in &mut batch.records {
        if record.has(FieldName::CombinedCreators) {
            continue;
        }
        let assembled = assemble_combined_creators(record);
        if !assembled.is_empty() {
            record.set(FieldName::CombinedCreators, assembled);
            outcome.assembled += 1;
        }
    }

    let mut order: Vec<String> = Vec::new();
    let mut unresolved: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for record in &batch.records {
        for creator in parse_creators(record.get(FieldName::CombinedCreators)) {
            if !creator.has_role() || classify_role(&creator.role, authorities) != CreatorKind::Unknown
            {
                continue;
            }
            let ids = unresolved.entry(creator.role.clone()).or_insert_with(|| {
                order.push(creator.role.clone());
                Vec::new()
            });
            if !ids.contains(&record.unit_id) {
                ids.push(record.unit_id.clone());
            }
        }
    }

    let mut rewrites: BTreeMap<String, String> = BTreeMap::new();
    for role in order {
        let unit_ids = unresolved.remove(&role).unwrap_or_default();
        let accepted = authorities
            .role_index()
            .closest(&role, options.accept_threshold)
            .filter(|best| {
                policy.decide(&CorrectionRequest {
                    field: "role",
                    original: &role,
                    suggestion: &best.canonical,
                    score: best.score,
                    unit_ids: &unit_ids,
                })
            });
        if let Some(best) = accepted {
            info!(role = %role, corrected = %best.canonical, records = unit_ids.len(), "role corrected");
            rewrites.insert(role.clone(), best.canonical.clone());
            outcome.corrections.push((role, best.canonical.clone()));
        } else {
            warn!(role = %role, records = unit_ids.len(), "role not found in role authorities");
            let hits = authorities
                .role_index()
                .extract(&role, options.candidate_limit);
            outcome.report.discrepancies.push(RoleDiscrepancy {
                role,
                unit_ids,
                candidates: hits.iter().map(|hit| hit.to_candidate()).collect(),
            });
        }
    }

    for record in &mut batch.records {
        let mut seen = BTreeSet::new();
        let creators: Vec<Creator> = parse_creators(record.get(FieldName::CombinedCreators))
            .into_iter()
            .map(|mut creator| {
                if let Some(role) = rewrites.get(&creator.role) {
                    creator.role.clone_from(role);
                }
                let kind = classify_role(&creator.role, authorities);
                creator.with_kind(kind)
            })
            .filter(|c| seen.insert((c.name.clone(), c.role.clone())))
            .collect();
        let combined: Vec<String> = creators.iter().map(ToString::to_string).collect();
        record.set(FieldName::CombinedCreators, combined.join(";"));
        outcome.keywords_removed += drop_creator_keywords(record, &creators);
        record.creators = creators;
    }

    info!(
        records = batch.records.len(),
        unresolved = outcome.report.len(),
        corrected = outcome.corrections.len(),
        "creators classified"
    );
    outcome
}

/// Removes person/corporate keyword values naming one of the record's
/// creators. Names are compared without bracketed role text on either side.
fn drop_creator_keywords(record: &mut Record, creators: &[Creator]) -> usize {
    let mut removed = 0;
    for field in [FieldName::PersName, FieldName::CorpName] {
        let values = record.list(field);
        let kept: Vec<String> = values
            .iter()
            .filter(|v| {
                let keyword = Creator::new(find_name(v), find_role(v));
                !creators.iter().any(|c| c.same_name(&keyword))
            })
            .cloned()
            .collect();
        if kept.len() != values.len() {
            debug!(unit_id = %record.unit_id, field = %field, "dropping keywords repeating a creator");
            removed += values.len() - kept.len();
            record.set_list(field, &kept);
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_model::{Collection, Level};
    use catalog_standards::{AuthorityEntry, AuthorityKind, AuthorityTable};

    fn authorities() -> AuthorityContext {
        AuthorityContext::new(vec![
            AuthorityTable::new(
                AuthorityKind::PersonRole,
                vec![
                    AuthorityEntry::new("צלם").with_synonym("צלמת"),
                    AuthorityEntry::new("כותב"),
                ],
            ),
            AuthorityTable::new(
                AuthorityKind::CorporateRole,
                vec![AuthorityEntry::new("מפיק")],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn role_and_name_extraction() {
        assert_eq!(find_role("X [Y]"), "Y");
        assert_eq!(find_role("X"), "");
        assert_eq!(find_role(" אפרתי משה [צלם] "), "צלם");
        assert_eq!(find_role("X [open"), "open");
        assert_eq!(find_name("אפרתי משה [צלם]"), "אפרתי משה");
        assert_eq!(find_name("X "), "X");
    }

    #[test]
    fn parse_skips_empty_entries() {
        let creators = parse_creators("לוי [צלם]; ;[מפיק];הבימה");
        assert_eq!(
            creators,
            vec![Creator::new("לוי", "צלם"), Creator::new("הבימה", "")]
        );
    }

    #[test]
    fn assembles_split_columns() {
        let record = Record::new("X-1", Level::File)
            .with(FieldName::FirstCreatorCorp, "הבימה")
            .with(FieldName::TypeFirstCreatorCorp, "מפיק")
            .with(FieldName::AddCreatorPers, "לוי [צלם]; כהן [כותב]")
            .with(FieldName::AddCreatorCorps, "");
        assert_eq!(
            assemble_combined_creators(&record),
            "הבימה [מפיק];לוי [צלם];כהן [כותב]"
        );
        let person_first = record
            .with(FieldName::FirstCreatorPers, "רובינא")
            .with(FieldName::TypeFirstCreatorPers, "");
        assert!(assemble_combined_creators(&person_first).starts_with("רובינא;"));
    }

    #[test]
    fn entries_drop_the_main_creator_from_added() {
        let creators = vec![
            Creator::new("לוי", "צלם").with_kind(CreatorKind::Person),
            Creator::new("הבימה", "מפיק").with_kind(CreatorKind::Corporate),
            Creator::new("לוי", "צלם").with_kind(CreatorKind::Person),
            Creator::new("לוי", "כותב").with_kind(CreatorKind::Person),
        ];
        let entries = creator_entries(&creators);
        assert_eq!(entries.main, Some(creators[0].clone()));
        assert_eq!(entries.added_persons, vec![creators[3].clone()]);
        assert_eq!(entries.added_corporates, vec![creators[1].clone()]);
        assert_eq!(creator_entries(&[]), CreatorEntries::default());
    }

    #[test]
    fn unresolved_roles_are_reported_once() {
        let mut batch = Batch::new(
            Collection::new("X"),
            vec![
                Record::new("X", Level::Section)
                    .with(FieldName::CombinedCreators, "לוי [צלמים]")
                    .with(FieldName::PersName, "לוי;כהן"),
                Record::new("X-1", Level::File)
                    .with(FieldName::CombinedCreators, "לוי [צלמים];הבימה [מפיק]"),
            ],
        );
        let mut policy = ResolutionPolicy::AutoReject;
        let outcome = classify_creators(
            &mut batch,
            &authorities(),
            &mut policy,
            &CreatorOptions::default(),
        );
        assert_eq!(outcome.report.len(), 1);
        let discrepancy = &outcome.report.discrepancies[0];
        assert_eq!(discrepancy.role, "צלמים");
        assert_eq!(discrepancy.unit_ids, vec!["X", "X-1"]);
        assert!(discrepancy.candidates.len() <= ROLE_CANDIDATE_LIMIT);
        assert_eq!(batch.records[0].get(FieldName::PersName), "כהן");
        assert_eq!(batch.records[1].creators[1].kind, CreatorKind::Corporate);
        assert_eq!(batch.records[1].creators[0].kind, CreatorKind::Unknown);
    }

    #[test]
    fn keywords_with_role_text_still_match_creators() {
        let mut batch = Batch::new(
            Collection::new("X"),
            vec![
                Record::new("X", Level::Section)
                    .with(FieldName::CombinedCreators, "לוי [צלם];הבימה [מפיק]")
                    .with(FieldName::PersName, "לוי [צלם];כהן")
                    .with(FieldName::CorpName, "הבימה [תיאטרון];הקאמרי"),
            ],
        );
        let outcome = classify_creators(
            &mut batch,
            &authorities(),
            &mut ResolutionPolicy::AutoReject,
            &CreatorOptions::default(),
        );
        assert_eq!(batch.records[0].get(FieldName::PersName), "כהן");
        assert_eq!(batch.records[0].get(FieldName::CorpName), "הקאמרי");
        assert_eq!(outcome.keywords_removed, 2);
    }

    #[test]
    fn accepted_correction_rewrites_every_record() {
        let mut batch = Batch::new(
            Collection::new("X"),
            vec![
                Record::new("X", Level::Section).with(FieldName::CombinedCreators, "לוי [צלמ]"),
                Record::new("X-1", Level::File).with(FieldName::CombinedCreators, "כהן [צלמ]"),
            ],
        );
        let mut policy = ResolutionPolicy::AutoAccept;
        let outcome = classify_creators(
            &mut batch,
            &authorities(),
            &mut policy,
            &CreatorOptions::default(),
        );
        assert!(outcome.report.is_empty());
        assert_eq!(outcome.corrections, vec![("צלמ".to_string(), "צלם".to_string())]);
        assert_eq!(batch.records[1].get(FieldName::CombinedCreators), "כהן [צלם]");
        assert_eq!(batch.records[1].creators[0].kind, CreatorKind::Person);
    }
}
