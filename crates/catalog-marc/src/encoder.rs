//! Record field encoder.
//!
//! Every record is encoded by a fixed list of stages. A stage owns a set of
//! output tags and is skipped when the record already holds any of them, so
//! encoding an already-encoded table again changes nothing.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use tracing::{debug, info, info_span, warn};

use catalog_core::creator_entries;
use catalog_model::{Batch, Creator, CreatorKind, FieldName, Level, Record};
use catalog_standards::{AuthorityContext, AuthorityKind, columns};

use crate::constants::EncoderSettings;
use crate::control::{COUNTRY_RANGE, DATE_RANGE, LANGUAGE_RANGE};
use crate::linkage::{DigitizationLinkage, encode_907};
use crate::names::{encode_keyword, encode_name};
use crate::table::{EncodedRecord, OutputField, OutputTable, explode};

/// Leader of File and Item records.
pub const UNIT_LEADER: &str = "00000npd#a22######a#4500";
/// Leader of every other level.
pub const AGGREGATE_LEADER: &str = "00000npc#a22########4500";

/// Parenthetical content never used as a genre alternate. The term itself is
/// kept when listed directly.
pub const EXCLUDED_GENRE_TERM: &str = "תצלומים";

static PARENTHETICAL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((.*)\)").expect("Invalid parenthetical regex"));

pub fn leader_for(level: Level) -> &'static str {
    if level.is_unit() {
        UNIT_LEADER
    } else {
        AGGREGATE_LEADER
    }
}

/// `YYYYMM` of a cataloguing date. Short or unparseable values are kept as
/// written.
pub fn format_cataloguing_date(raw: &str) -> String {
    let raw = raw.trim();
    if raw.chars().count() <= 6 {
        return raw.to_string();
    }
    const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d.%m.%Y", "%Y/%m/%d"];
    const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(raw, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
                .map(|dt| dt.date())
        })
        .map_or_else(|| raw.to_string(), |d| d.format("%Y%m").to_string())
}

/// Archival-material values plus the contents of their parentheses,
/// de-duplicated in source order. [`EXCLUDED_GENRE_TERM`] is dropped only as a
/// parenthetical alternate.
pub fn genre_terms(values: &[String]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut terms = Vec::new();
    for value in values {
        let alternate = PARENTHETICAL_REGEX
            .captures(value)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|alternate| alternate != EXCLUDED_GENRE_TERM);
        let base = PARENTHETICAL_REGEX.replace(value, "").trim().to_string();
        for term in [Some(base), alternate].into_iter().flatten() {
            if term.is_empty() {
                continue;
            }
            if seen.insert(term.clone()) {
                terms.push(term);
            }
        }
    }
    terms
}

fn with_subfield_a(code: &str) -> String {
    if code.starts_with("$$") {
        code.to_string()
    } else {
        format!("$$a{code}")
    }
}

fn dedup(values: Vec<String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    values
        .into_iter()
        .filter(|v| seen.insert(v.clone()))
        .collect()
}

/// Encoding stages, in output order. Each owns the tags it writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Title,
    Level,
    Extent,
    Scope,
    Provenance,
    Barcode,
    Notes,
    Digitization,
    Accruals,
    Custodian,
    Collection,
    Host,
    Names,
    Keywords,
    Genre,
    Content,
    Carrier,
    Language,
    Country,
    Access,
    Cataloguing,
    Linkage,
    Constants,
}

impl Stage {
    const ALL: [Stage; 23] = [
        Stage::Title,
        Stage::Level,
        Stage::Extent,
        Stage::Scope,
        Stage::Provenance,
        Stage::Barcode,
        Stage::Notes,
        Stage::Digitization,
        Stage::Accruals,
        Stage::Custodian,
        Stage::Collection,
        Stage::Host,
        Stage::Names,
        Stage::Keywords,
        Stage::Genre,
        Stage::Content,
        Stage::Carrier,
        Stage::Language,
        Stage::Country,
        Stage::Access,
        Stage::Cataloguing,
        Stage::Linkage,
        Stage::Constants,
    ];

    fn name(self) -> &'static str {
        match self {
            Stage::Title => "title",
            Stage::Level => "level",
            Stage::Extent => "extent",
            Stage::Scope => "scope",
            Stage::Provenance => "provenance",
            Stage::Barcode => "barcode",
            Stage::Notes => "notes",
            Stage::Digitization => "digitization",
            Stage::Accruals => "accruals",
            Stage::Custodian => "custodian",
            Stage::Collection => "collection",
            Stage::Host => "host",
            Stage::Names => "names",
            Stage::Keywords => "keywords",
            Stage::Genre => "genre",
            Stage::Content => "content",
            Stage::Carrier => "carrier",
            Stage::Language => "language",
            Stage::Country => "country",
            Stage::Access => "access",
            Stage::Cataloguing => "cataloguing",
            Stage::Linkage => "linkage",
            Stage::Constants => "constants",
        }
    }

    fn tags(self) -> &'static [&'static str] {
        match self {
            Stage::Title => &["24510", "2461"],
            Stage::Level => &["351"],
            Stage::Extent => &["300"],
            Stage::Scope => &["520"],
            Stage::Provenance => &["561"],
            Stage::Barcode => &["091"],
            Stage::Notes => &["500", "581"],
            Stage::Digitization => &["590"],
            Stage::Accruals => &["584"],
            Stage::Custodian => &["5351"],
            Stage::Collection => &["911", "093", "524", "597"],
            Stage::Host => &["77318"],
            Stage::Names => &["1001", "1102", "7001", "7102"],
            Stage::Keywords => &["6001", "6102", "630 4", "650 7", "651 7"],
            Stage::Genre => &["655 7"],
            Stage::Content => &["336"],
            Stage::Carrier => &["534"],
            Stage::Language => &["041"],
            Stage::Country => &["044", "260"],
            Stage::Access => &["5061"],
            Stage::Cataloguing => &["921", "933"],
            Stage::Linkage => &["907"],
            Stage::Constants => &["337", "338", "906", "948", "FMT", "999"],
        }
    }
}

/// Turns a validated batch into an [`OutputTable`].
pub struct MarcEncoder<'a> {
    authorities: &'a AuthorityContext,
    settings: &'a EncoderSettings,
    linkage: Option<&'a dyn DigitizationLinkage>,
}

impl<'a> MarcEncoder<'a> {
    pub fn new(authorities: &'a AuthorityContext, settings: &'a EncoderSettings) -> Self {
        Self {
            authorities,
            settings,
            linkage: None,
        }
    }

    pub fn with_linkage(mut self, linkage: &'a dyn DigitizationLinkage) -> Self {
        self.linkage = Some(linkage);
        self
    }

    pub fn encode_batch(&self, batch: &Batch) -> OutputTable {
        let mut table = OutputTable::default();
        self.encode_into(&mut table, batch);
        table
    }

    /// Encodes `batch` into `table`, reusing the entries already present.
    pub fn encode_into(&self, table: &mut OutputTable, batch: &Batch) {
        let span = info_span!("encode", records = batch.records.len());
        let _guard = span.enter();
        let mut skipped = 0usize;
        for record in &batch.records {
            let position = match table.records.iter().position(|r| r.unit_id == record.unit_id) {
                Some(position) => position,
                None => {
                    table.records.push(EncodedRecord::new(record.unit_id.clone()));
                    table.records.len() - 1
                }
            };
            skipped += self.encode_record(&mut table.records[position], batch, record);
        }
        info!(
            records = table.len(),
            columns = table.columns().len(),
            stages_skipped = skipped,
            "batch encoded"
        );
    }

    /// Returns the number of stages skipped because their output existed.
    fn encode_record(&self, out: &mut EncodedRecord, batch: &Batch, record: &Record) -> usize {
        if out.leader.is_empty() {
            out.leader = leader_for(record.level).to_string();
        }
        self.encode_control(out, record);

        let mut skipped = 0;
        for stage in Stage::ALL {
            if stage.tags().iter().any(|tag| out.has_tag(tag)) {
                debug!(unit_id = %record.unit_id, stage = stage.name(), "stage already encoded");
                skipped += 1;
                continue;
            }
            out.extend(self.run_stage(stage, batch, record));
        }
        skipped
    }

    fn run_stage(&self, stage: Stage, batch: &Batch, record: &Record) -> Vec<OutputField> {
        match stage {
            Stage::Title => self.encode_titles(batch, record),
            Stage::Level => self.encode_level(batch, record),
            Stage::Extent => self.encode_extent(batch, record),
            Stage::Scope => self.encode_scope(batch, record),
            Stage::Provenance => self.encode_provenance(batch, record),
            Stage::Barcode => self.encode_barcode(batch, record),
            Stage::Notes => self.encode_notes(batch, record),
            Stage::Digitization => self.encode_digitization(batch, record),
            Stage::Accruals => self.encode_accruals(batch, record),
            Stage::Custodian => self.encode_custodian(batch, record),
            Stage::Collection => self.encode_collection(batch, record),
            Stage::Host => self.encode_host(batch, record),
            Stage::Names => self.encode_names(batch, record),
            Stage::Keywords => self.encode_keywords(batch, record),
            Stage::Genre => self.encode_genre(batch, record),
            Stage::Content => self.encode_content_type(batch, record),
            Stage::Carrier => self.encode_carrier(batch, record),
            Stage::Language => self.encode_languages(batch, record),
            Stage::Country => self.encode_countries(batch, record),
            Stage::Access => self.encode_access(batch, record),
            Stage::Cataloguing => self.encode_cataloguing(batch, record),
            Stage::Linkage => self.encode_linkage(batch, record),
            Stage::Constants => self.encode_constants(batch, record),
        }
    }

    fn first_code(&self, kind: AuthorityKind, values: &[String]) -> Option<&'a str> {
        let table = self.authorities.table(kind)?;
        values.first().and_then(|v| table.code(v, columns::MARC_CODE))
    }

    fn encode_control(&self, out: &mut EncodedRecord, record: &Record) {
        if out.control.is_untouched(DATE_RANGE) {
            out.control.set_dates(record.start_year, record.end_year);
        }
        if out.control.is_untouched(COUNTRY_RANGE) {
            let countries = record.list(FieldName::PublicationCountry);
            out.control
                .set_country(self.first_code(AuthorityKind::Country, &countries));
        }
        if out.control.is_untouched(LANGUAGE_RANGE) {
            let languages = record.list(FieldName::Language);
            if let Some(code) = self.first_code(AuthorityKind::Language, &languages) {
                out.control.set_language(code);
            }
        }
    }

    fn encode_titles(&self, _: &Batch, record: &Record) -> Vec<OutputField> {
        let mut fields = Vec::new();
        if record.has(FieldName::UnitTitle) {
            fields.push(OutputField::new("24510", format!("$$a{}", record.title())));
        }
        if record.has(FieldName::UnitTitleEng) {
            fields.push(OutputField::new(
                "2461",
                format!(
                    "$$iTranslated title:$$a{}",
                    record.get(FieldName::UnitTitleEng)
                ),
            ));
        }
        fields
    }

    fn encode_level(&self, _: &Batch, record: &Record) -> Vec<OutputField> {
        vec![OutputField::new("351", format!("$$c{}", record.level.as_str()))]
    }

    fn encode_extent(&self, _: &Batch, record: &Record) -> Vec<OutputField> {
        single("300", "$$c", record.get(FieldName::Extent))
    }

    fn encode_scope(&self, _: &Batch, record: &Record) -> Vec<OutputField> {
        single("520", "$$a", record.get(FieldName::ScopeContent))
    }

    fn encode_provenance(&self, _: &Batch, record: &Record) -> Vec<OutputField> {
        single("561", "$$a", record.get(FieldName::OriginalId))
    }

    fn encode_barcode(&self, _: &Batch, record: &Record) -> Vec<OutputField> {
        let barcode = record.get(FieldName::Barcode).trim();
        single("091", "$$a", barcode.strip_suffix(".0").unwrap_or(barcode))
    }

    fn encode_notes(&self, _: &Batch, record: &Record) -> Vec<OutputField> {
        let mut note = String::new();
        for (field, label) in [
            (FieldName::Container, "מספר מיכל"),
            (FieldName::ArchiveFileCode, "קוד תיק ארכיון"),
            (FieldName::Notes, "הערות"),
            (FieldName::GeogName, "מקומות המוזכרים בתיק"),
        ] {
            let value = record.get(field).trim();
            let value = if field == FieldName::ArchiveFileCode {
                value.strip_suffix(".0").unwrap_or(value)
            } else {
                value
            };
            if !value.is_empty() {
                note.push_str(&format!("{label}: {value};"));
            }
        }
        let mut fields = single("500", "$$a", &note);

        if record.is_section() {
            let section_notes = [
                with_prefix("$$a", record.get(FieldName::BiogHist)),
                with_prefix("$$a", record.get(FieldName::Appraisal)),
                with_prefix("$$aסוג האוסף: ", record.get(FieldName::CollectionType)),
            ];
            fields.extend(explode("500", section_notes));
        }
        let bibliography: Vec<String> = record
            .list(FieldName::Bibliography)
            .iter()
            .map(|v| format!("$$a{v}"))
            .collect();
        fields.extend(explode("581", bibliography));
        fields
    }

    fn encode_digitization(&self, _: &Batch, record: &Record) -> Vec<OutputField> {
        let mut note = String::new();
        let route = record.get(FieldName::Digitization).trim();
        match route {
            "" => {}
            "כן" | "לא" => note.push_str(&format!("מיועד לסריקה-{route};")),
            other => note.push_str(&format!("מסלול דיגיטציה-{other};")),
        }
        let two_sided = record.get(FieldName::TwoSideScan).trim();
        if !two_sided.is_empty() {
            note.push_str(&format!("סריקה דו-צדדית-{two_sided};"));
        }
        let files = record.get(FieldName::EstFilesNum).trim();
        if !files.is_empty() {
            note.push_str(&format!("מספר קבצים מוערך-{files};"));
        }
        if let Some(count) = self
            .linkage
            .and_then(|linkage| linkage.file_count(&record.unit_id))
        {
            note.push_str(&format!("מספר קבצים לאחר דיגיטציה-{count};"));
        }
        single("590", "$$aמסלולי דיגיטציה: ", &note)
    }

    fn encode_accruals(&self, _: &Batch, record: &Record) -> Vec<OutputField> {
        let value = match record.get(FieldName::Accruals).trim() {
            "" => return Vec::new(),
            "כן" => "האוסף המקורי ממשיך לצבור חומרים (אוסף פתוח)",
            "לא" => "האוסף המקורי אינו צובר חומרים חדשים (אוסף סגור)",
            other => other,
        };
        single("584", "$$a", value)
    }

    fn encode_custodian(&self, _: &Batch, record: &Record) -> Vec<OutputField> {
        let owner = &self.settings.constants.owner_code;
        let mut fields = vec![OutputField::numbered(
            "5351",
            1,
            format!("$$a{owner} {}", record.unit_id),
        )];
        let location = record.get(FieldName::PhysLoc).trim();
        if !location.is_empty() {
            fields.push(OutputField::numbered("5351", 2, format!("$$b{location}")));
        }
        fields
    }

    fn encode_collection(&self, batch: &Batch, record: &Record) -> Vec<OutputField> {
        let collection = &batch.collection;
        let mut fields = Vec::new();
        for (occurrence, name) in [(1, &collection.name_heb), (2, &collection.name_eng)] {
            if name.is_empty() {
                continue;
            }
            let reference = format!("$$a{}$$c{name}", record.unit_id);
            fields.push(OutputField::numbered("911", occurrence, reference.clone()));
            fields.push(OutputField::numbered("093", occurrence, reference));
        }
        if !collection.name_heb.is_empty() {
            fields.push(OutputField::numbered(
                "524",
                1,
                format!(
                    "$$a{}, הספריה הלאומית, סימול: {}",
                    collection.name_heb, record.unit_id
                ),
            ));
        }
        if !collection.name_eng.is_empty() {
            fields.push(OutputField::numbered(
                "524",
                2,
                format!(
                    "$$a{}, National Library of Israel, Reference code: {}",
                    collection.name_eng, record.unit_id
                ),
            ));
        }
        if !collection.credit_heb.is_empty() || !collection.credit_eng.is_empty() {
            fields.push(OutputField::new(
                "597",
                format!(
                    "$$a{}$$b{}",
                    collection.credit_heb.trim(),
                    collection.credit_eng.trim()
                ),
            ));
        }
        fields
    }

    fn encode_host(&self, batch: &Batch, record: &Record) -> Vec<OutputField> {
        if record.is_section() || record.root_id.is_empty() {
            return Vec::new();
        }
        let title = batch.find(&record.root_id).map_or("", Record::title);
        vec![OutputField::new(
            "77318",
            format!("$$t{title}$$w{}", record.root_id),
        )]
    }

    fn encode_names(&self, _: &Batch, record: &Record) -> Vec<OutputField> {
        let entries = creator_entries(&record.creators);
        let mut fields = Vec::new();
        if let Some(main) = &entries.main {
            let tag = match main.kind {
                CreatorKind::Corporate => "1102",
                CreatorKind::Person | CreatorKind::Unknown => "1001",
            };
            fields.push(OutputField::new(tag, encode_name(main, self.authorities)));
        }
        let encode = |c: &Creator| encode_name(c, self.authorities);
        fields.extend(explode("7001", entries.added_persons.iter().map(encode)));
        fields.extend(explode("7102", entries.added_corporates.iter().map(encode)));
        fields
    }

    fn encode_keywords(&self, _: &Batch, record: &Record) -> Vec<OutputField> {
        let keywords = |field| {
            record
                .list(field)
                .iter()
                .map(|v| encode_keyword(v))
                .collect::<Vec<_>>()
        };
        let local = |field| {
            record
                .list(field)
                .iter()
                .map(|v| format!("$$a{v}$$2local"))
                .collect::<Vec<_>>()
        };
        let mut fields = explode("6001", keywords(FieldName::PersName));
        fields.extend(explode("6102", keywords(FieldName::CorpName)));
        fields.extend(explode("630 4", keywords(FieldName::Works)));
        fields.extend(explode("650 7", local(FieldName::Subject)));
        fields.extend(explode("651 7", local(FieldName::GeogName)));
        fields
    }

    /// Maps values through an authority code column, de-duplicated.
    fn coded(&self, record: &Record, values: &[String], kind: AuthorityKind, column: &str) -> Vec<String> {
        let Some(table) = self.authorities.table(kind) else {
            return Vec::new();
        };
        let codes = values
            .iter()
            .filter_map(|value| match table.code(value, column) {
                Some(code) => Some(with_subfield_a(code)),
                None => {
                    warn!(unit_id = %record.unit_id, authority = %kind, column, "no code for term, skipped");
                    None
                }
            })
            .collect();
        dedup(codes)
    }

    fn encode_genre(&self, _: &Batch, record: &Record) -> Vec<OutputField> {
        let terms = genre_terms(&record.list(FieldName::ArchivalMaterial));
        let codes = self.coded(
            record,
            &terms,
            AuthorityKind::ArchivalMaterial,
            columns::GENRE_FORM,
        );
        explode("655 7", codes)
    }

    fn encode_content_type(&self, _: &Batch, record: &Record) -> Vec<OutputField> {
        let terms = genre_terms(&record.list(FieldName::ArchivalMaterial));
        let codes = self.coded(
            record,
            &terms,
            AuthorityKind::ArchivalMaterial,
            columns::CONTENT_TYPE,
        );
        explode("336", codes)
    }

    fn encode_carrier(&self, _: &Batch, record: &Record) -> Vec<OutputField> {
        let Some(table) = self.authorities.table(AuthorityKind::MediaFormat) else {
            return Vec::new();
        };
        let carriers = record
            .list(FieldName::MediumFormat)
            .iter()
            .filter_map(|v| table.code(v, columns::ORIGINAL_CARRIER))
            .map(|code| format!("$$pמנשא והפורמט הפיזי של הפריט המקורי.$$e{code}"))
            .collect();
        explode("534", dedup(carriers))
    }

    fn encode_languages(&self, _: &Batch, record: &Record) -> Vec<OutputField> {
        let codes = self.coded(
            record,
            &record.list(FieldName::Language),
            AuthorityKind::Language,
            columns::MARC_CODE,
        );
        single("041", "", &codes.concat())
    }

    fn encode_countries(&self, _: &Batch, record: &Record) -> Vec<OutputField> {
        let countries = record.list(FieldName::PublicationCountry);
        if countries.is_empty() {
            return Vec::new();
        }
        let codes = self.coded(record, &countries, AuthorityKind::Country, columns::MARC_CODE);
        let mut fields = single("044", "", &codes.concat());

        let mut place: String = countries
            .iter()
            .map(|c| format!("$$e[{c}]$$9heb"))
            .collect();
        if record.has(FieldName::Date) {
            place.push_str(&format!("$$g{}", record.date_text()));
        }
        fields.push(OutputField::new("260", place));
        fields
    }

    fn encode_access(&self, _: &Batch, record: &Record) -> Vec<OutputField> {
        let restriction = record.get(FieldName::AccessRestrict).trim();
        if restriction.is_empty() {
            return Vec::new();
        }
        let code = self
            .authorities
            .table(AuthorityKind::AccessRestriction)
            .and_then(|t| t.code(restriction, columns::RESTRICTION));
        match code {
            Some(code) => vec![OutputField::new("5061", with_subfield_a(code))],
            None => {
                warn!(unit_id = %record.unit_id, "access restriction has no code, skipped");
                Vec::new()
            }
        }
    }

    fn encode_cataloguing(&self, _: &Batch, record: &Record) -> Vec<OutputField> {
        let cataloguers = record.list(FieldName::Cataloguer);
        let Some((first, rest)) = cataloguers.split_first() else {
            return Vec::new();
        };
        let date = format_cataloguing_date(record.get(FieldName::DateCataloging));
        let stamp = |name: &String| {
            let code = self
                .settings
                .cataloguer_codes
                .get(name)
                .map_or(name.as_str(), String::as_str);
            format!("$$a{code} {date}").trim_end().to_string()
        };
        let mut fields = vec![OutputField::new("921", stamp(first))];
        fields.extend(explode("933", rest.iter().map(stamp)));
        fields
    }

    fn encode_linkage(&self, _: &Batch, record: &Record) -> Vec<OutputField> {
        let Some(subfields) = self.linkage.and_then(|l| l.subfields(&record.unit_id)) else {
            return Vec::new();
        };
        single("907", "", &encode_907(subfields))
    }

    fn encode_constants(&self, _: &Batch, _: &Record) -> Vec<OutputField> {
        let constants = &self.settings.constants;
        let mut fields = vec![
            OutputField::new("337", constants.media_337.as_str()),
            OutputField::new("338", constants.carrier_338.as_str()),
            OutputField::new("906", format!("$$a{}", constants.owner_code)),
            OutputField::new("948", constants.cataloguing_agency_948.as_str()),
            OutputField::new("FMT", constants.format.as_str()),
        ];
        fields.extend(explode("999", &constants.local_999));
        fields
    }
}

fn with_prefix(prefix: &str, value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        String::new()
    } else {
        format!("{prefix}{value}")
    }
}

fn single(tag: &str, prefix: &str, value: &str) -> Vec<OutputField> {
    let value = with_prefix(prefix, value);
    if value.is_empty() {
        Vec::new()
    } else {
        vec![OutputField::new(tag, value)]
    }
}
