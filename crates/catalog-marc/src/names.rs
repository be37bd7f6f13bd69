//! Name headings: `$$a<name>$$e<relator>$$9<lang>`.

use catalog_model::{Creator, CreatorKind};
use catalog_standards::{AuthorityContext, AuthorityTable, columns};

/// Script of a name, as written in subfield `$9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameScript {
    Hebrew,
    Latin,
}

impl NameScript {
    pub fn code(&self) -> &'static str {
        match self {
            NameScript::Hebrew => "heb",
            NameScript::Latin => "lat",
        }
    }

    fn relator_column(&self) -> &'static str {
        match self {
            NameScript::Hebrew => columns::RELATOR_HEB,
            NameScript::Latin => columns::RELATOR_ENG,
        }
    }
}

/// Latin only when every letter is Latin; mixed, unknown or letterless names
/// count as Hebrew.
pub fn detect_script(name: &str) -> NameScript {
    let mut letters = name.chars().filter(|c| c.is_alphabetic()).peekable();
    if letters.peek().is_none() {
        return NameScript::Hebrew;
    }
    if letters.all(is_latin) {
        NameScript::Latin
    } else {
        NameScript::Hebrew
    }
}

fn is_latin(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, '\u{00C0}'..='\u{024F}')
}

/// Relator term for a creator's role, in the language of the name's script.
pub fn relator_for<'a>(
    creator: &Creator,
    script: NameScript,
    authorities: &'a AuthorityContext,
) -> Option<&'a str> {
    if creator.role.is_empty() {
        return None;
    }
    let tables: [&AuthorityTable; 2] = match creator.kind {
        CreatorKind::Corporate => [authorities.corporate_roles(), authorities.person_roles()],
        CreatorKind::Person | CreatorKind::Unknown => {
            [authorities.person_roles(), authorities.corporate_roles()]
        }
    };
    tables
        .into_iter()
        .find_map(|table| table.code(&creator.role, script.relator_column()))
}

/// Encodes a creator heading. Roles without a relator are left out.
pub fn encode_name(creator: &Creator, authorities: &AuthorityContext) -> String {
    if creator.name.is_empty() {
        return String::new();
    }
    let script = detect_script(&creator.name);
    match relator_for(creator, script, authorities) {
        Some(relator) => format!("$$a{}$$e{relator}$$9{}", creator.name, script.code()),
        None => format!("$$a{}$$9{}", creator.name, script.code()),
    }
}

/// Encodes a keyword access point (no role).
pub fn encode_keyword(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        return String::new();
    }
    format!("$$a{name}$$9{}", detect_script(name).code())
}
