//! Raw header canonicalization.
//!
//! A header is cleaned (non-alphanumerics stripped, case folded) and looked up
//! in a static alias table. The table order is the priority order: when several
//! raw headers alias the same field, the earliest alias with a non-empty value
//! wins.

use catalog_model::FieldName;

/// Strips every non-alphanumeric character and lowercases the rest.
pub fn clean_header(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Legacy English spellings still found in older catalogs.
const LEGACY_ALIASES: &[(&str, FieldName)] = &[
    ("accurals", FieldName::Accruals),
    ("oridinalid", FieldName::OriginalId),
    ("archivid", FieldName::ArchiveFileCode),
    ("corpsname", FieldName::CorpName),
    ("relatedmaterial", FieldName::RelatedMaterials),
    ("cataloger", FieldName::Cataloguer),
    ("datecataloguing", FieldName::DateCataloging),
];

/// Hebrew header spellings, already cleaned.
const HEBREW_ALIASES: &[(&str, FieldName)] = &[
    ("סימול", FieldName::UnitId),
    ("סימולהאוסף", FieldName::UnitId),
    ("סימולמספרמזהה", FieldName::UnitId),
    ("סימולפרויקט", FieldName::UnitId),
    ("סימולאב", FieldName::RootId),
    ("רמתתיאור", FieldName::Level),
    ("כותרת", FieldName::UnitTitle),
    ("שם", FieldName::UnitTitle),
    ("שםהאוסף", FieldName::UnitTitle),
    ("כותרתאנגלית", FieldName::UnitTitleEng),
    ("היקף", FieldName::Extent),
    ("היקףהחומר", FieldName::Extent),
    ("שםהרושם", FieldName::Cataloguer),
    ("רושם", FieldName::Cataloguer),
    ("שםהמקטלג", FieldName::Cataloguer),
    ("תאריךהרישום", FieldName::DateCataloging),
    ("תאריךרישום", FieldName::DateCataloging),
    ("תאריךקיטלוג", FieldName::DateCataloging),
    ("תאריךפתיחתרשומה", FieldName::RecordCreateDate),
    ("יוצרים", FieldName::CombinedCreators),
    ("יוצרראשיאיש", FieldName::FirstCreatorPers),
    ("שםיוצרראשיאיש", FieldName::FirstCreatorPers),
    ("שםיוצראיש", FieldName::FirstCreatorPers),
    ("יוצרראשימוסד", FieldName::FirstCreatorCorp),
    ("שםיוצרראשימוסד", FieldName::FirstCreatorCorp),
    ("שםיוצרמוסד", FieldName::FirstCreatorCorp),
    ("סוגיוצרראשיאיש", FieldName::TypeFirstCreatorPers),
    ("סוגיוצראיש", FieldName::TypeFirstCreatorPers),
    ("סוגיוצרראשימוסד", FieldName::TypeFirstCreatorCorp),
    ("סוגיוצרמוסד", FieldName::TypeFirstCreatorCorp),
    ("יוצריםנוספים", FieldName::AddCreators),
    ("יוצריםנוספיםאיש", FieldName::AddCreatorPers),
    ("יוצריהאוסף", FieldName::AddCreatorPers),
    ("יוצריםנוספיםמוסד", FieldName::AddCreatorCorps),
    ("תאריךחופשי", FieldName::Date),
    ("תאריך", FieldName::DateNormal),
    ("תאריךמנורמל", FieldName::DateNormal),
    ("תאריךמנורמלמוקדם", FieldName::DateStart),
    ("תאריךמנורמלמאוחר", FieldName::DateEnd),
    ("תאריךצילוםמנורמלמוקדם", FieldName::PhotoDateEarly),
    ("תאריךתצלוםחפץטקסטמוערמוקדם", FieldName::PhotoDateEarly),
    ("תאריךצילוםמנורמלמאוחר", FieldName::PhotoDateLate),
    ("תאריךתצלוםחפץטקסטמוערמאוחר", FieldName::PhotoDateLate),
    ("סוגחומר", FieldName::ArchivalMaterial),
    ("סוגהחומר", FieldName::ArchivalMaterial),
    ("מדיהפורמט", FieldName::MediumFormat),
    ("מגבלותפרטיות", FieldName::AccessRestrict),
    ("מגבלותלתצוגהבאינטרנט", FieldName::AccessRestrict),
    ("שפה", FieldName::Language),
    ("מדינתהפרסום", FieldName::PublicationCountry),
    ("מדינתהפרסוםהצילום", FieldName::PublicationCountry),
    ("מקוםהפרסום", FieldName::PublicationCountry),
    ("מילותמפתחאישים", FieldName::PersName),
    ("מילותמפתחאישיליבה", FieldName::PersName),
    ("מילותמפתחמוסדות", FieldName::CorpName),
    ("מילותמפתחארגונים", FieldName::CorpName),
    ("מילותמפתחמוסדותליבה", FieldName::CorpName),
    ("מילותמפתחיצירות", FieldName::Works),
    ("מילותמפתחיצירותליבה", FieldName::Works),
    ("מילותמפתחנושאים", FieldName::Subject),
    ("מילותמפתחנושאיליבה", FieldName::Subject),
    ("מילותמפתחמקומות", FieldName::GeogName),
    ("תיאור", FieldName::ScopeContent),
    ("מידענוסף", FieldName::ScopeContent),
    ("היסטוריהארכיונית", FieldName::BiogHist),
    ("מידעעלהצטברותהאוסף", FieldName::BiogHist),
    ("מידעעלהצטברותהחומר", FieldName::BiogHist),
    ("מידעעלסידורהחומר", FieldName::Arrangement),
    ("מידעעלסידורהאוסףשיטתהסידור", FieldName::Arrangement),
    ("תיאורהטיפולבאוסףבפרויקט", FieldName::Appraisal),
    ("תיאורהחומרבפרויקטתרבותחזותיתואמנויותהבמה", FieldName::Appraisal),
    ("אוסףפתוח", FieldName::Accruals),
    ("ביבליוגרפיהומקורותמידע", FieldName::Bibliography),
    ("חומריםקשורים", FieldName::RelatedMaterials),
    ("סוגאוסף", FieldName::CollectionType),
    ("ברקוד", FieldName::Barcode),
    ("מיכל", FieldName::Container),
    ("מספרמיכל", FieldName::Container),
    ("מספרהמיכל", FieldName::Container),
    ("מספרהמיכלבונמצאהתיקפריט", FieldName::Container),
    ("מיקוםפיזי", FieldName::PhysLoc),
    ("קודתיקארכיון", FieldName::ArchiveFileCode),
    ("סימולמקורי", FieldName::OriginalId),
    ("הערות", FieldName::Notes),
    ("הערותגלוילמשתמשקצה", FieldName::Notes),
    ("הערותלאגלוילמשתמש", FieldName::NotesHidden),
    ("הערותלאגלוילמשתמשקצה", FieldName::NotesHidden),
    ("טכניקה", FieldName::Technique),
    ("מידות", FieldName::Dimensions),
    ("קנהמידה", FieldName::Scale),
    ("מסלולדיגיטציה", FieldName::Digitization),
    ("דיגיטציה", FieldName::Digitization),
    ("נשלחלדיגיטציה", FieldName::Digitization),
    ("סריקהדוצדדית", FieldName::TwoSideScan),
    ("סריקתדוצדדית", FieldName::TwoSideScan),
    ("מספרקבציםמוערך", FieldName::EstFilesNum),
    ("מספרקבציםלסריקה", FieldName::EstFilesNum),
    ("פומבי", FieldName::Public),
    ("למחיקה", FieldName::ToDelete),
];

/// Resolves a raw header to its canonical field and its priority rank.
///
/// Canonical English names rank first, then Hebrew spellings in table order,
/// then legacy spellings.
pub fn resolve_header(raw: &str) -> Option<(FieldName, usize)> {
    let cleaned = clean_header(raw);
    if cleaned.is_empty() {
        return None;
    }
    if let Some(field) = FieldName::ALL
        .iter()
        .find(|f| clean_header(f.as_str()) == cleaned)
    {
        return Some((*field, 0));
    }
    HEBREW_ALIASES
        .iter()
        .chain(LEGACY_ALIASES)
        .enumerate()
        .find(|(_, (alias, _))| *alias == cleaned)
        .map(|(pos, (_, field))| (*field, pos + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_header_strips_punctuation_and_case() {
        assert_eq!(clean_header("מילות מפתח_אישים"), "מילותמפתחאישים");
        assert_eq!(clean_header(" Unit-Title (ENG) "), "unittitleeng");
        assert_eq!(clean_header("מדיה + פורמט"), "מדיהפורמט");
    }

    #[test]
    fn hebrew_spellings_resolve() {
        assert_eq!(
            resolve_header("מילות מפתח_אישים").map(|(f, _)| f),
            Some(FieldName::PersName)
        );
        assert_eq!(
            resolve_header("מדינת הפרסום/הצילום").map(|(f, _)| f),
            Some(FieldName::PublicationCountry)
        );
        assert_eq!(
            resolve_header("רמת תיאור").map(|(f, _)| f),
            Some(FieldName::Level)
        );
    }

    #[test]
    fn sheet_spellings_with_final_letters_resolve() {
        let headers = [
            ("היקף החומר", FieldName::Extent),
            ("שם הרושם", FieldName::Cataloguer),
            ("תאריך מנורמל מוקדם", FieldName::DateStart),
            ("מילות מפתח_מקומות", FieldName::GeogName),
            ("מילות מפתח_ארגונים", FieldName::CorpName),
            ("יוצרים נוספים - מוסד", FieldName::AddCreatorCorps),
            ("מספר קבצים מוערך", FieldName::EstFilesNum),
            ("סוג חומר", FieldName::ArchivalMaterial),
        ];
        for (header, field) in headers {
            assert_eq!(resolve_header(header).map(|(f, _)| f), Some(field), "{header}");
        }
    }

    #[test]
    fn canonical_names_outrank_aliases() {
        let (field, rank) = resolve_header("UNITID").unwrap();
        assert_eq!(field, FieldName::UnitId);
        assert_eq!(rank, 0);
        let (_, alias_rank) = resolve_header("סימול").unwrap();
        assert!(alias_rank > rank);
    }

    #[test]
    fn legacy_and_unknown_headers() {
        assert_eq!(
            resolve_header("ACCURALS").map(|(f, _)| f),
            Some(FieldName::Accruals)
        );
        assert_eq!(resolve_header("Unnamed: 3"), None);
        assert_eq!(resolve_header("   "), None);
    }

    #[test]
    fn every_alias_is_unique() {
        let mut seen = std::collections::BTreeSet::new();
        for (alias, _) in HEBREW_ALIASES.iter().chain(LEGACY_ALIASES) {
            assert!(seen.insert(*alias), "duplicate alias {alias}");
            assert_eq!(clean_header(alias), *alias);
        }
    }
}
