//! Digitization linkage read from a MARCXML export.
//!
//! Records are keyed by their `001` control field; the subfields of the first
//! `907` data field become the linkage values. Namespace prefixes are ignored.

use std::path::Path;

use anyhow::{Context, Result};
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use tracing::{debug, info};

use catalog_marc::LinkageMap;

const ID_TAG: &str = "001";
const LINKAGE_TAG: &str = "907";

#[derive(Debug, Default)]
struct RecordState {
    id: Option<String>,
    subfields: Vec<(String, String)>,
    seen_linkage: bool,
}

#[derive(Debug)]
enum Capture {
    Id,
    Subfield(String),
}

pub fn read_linkage(path: &Path) -> Result<LinkageMap> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("read linkage file {}", path.display()))?;
    let linkage =
        parse_linkage(&contents).with_context(|| format!("parse MARCXML {}", path.display()))?;
    info!(path = %path.display(), records = linkage.len(), "linkage loaded");
    Ok(linkage)
}

fn attribute(start: &BytesStart<'_>, name: &str) -> Result<Option<String>> {
    Ok(match start.try_get_attribute(name)? {
        Some(attr) => Some(attr.unescape_value()?.into_owned()),
        None => None,
    })
}

pub fn parse_linkage(xml: &str) -> Result<LinkageMap> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut linkage = LinkageMap::new();
    let mut record = RecordState::default();
    let mut in_linkage_field = false;
    let mut capture: Option<Capture> = None;
    let mut text = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(start) => match start.local_name().as_ref() {
                b"record" => record = RecordState::default(),
                b"controlfield" => {
                    if attribute(&start, "tag")?.as_deref() == Some(ID_TAG) {
                        capture = Some(Capture::Id);
                        text.clear();
                    }
                }
                b"datafield" => {
                    in_linkage_field = !record.seen_linkage
                        && attribute(&start, "tag")?.as_deref() == Some(LINKAGE_TAG);
                }
                b"subfield" if in_linkage_field => {
                    let code = attribute(&start, "code")?.unwrap_or_default();
                    capture = Some(Capture::Subfield(code));
                    text.clear();
                }
                _ => {}
            },
            Event::Text(content) if capture.is_some() => text.push_str(&content.decode()?),
            Event::CData(content) if capture.is_some() => text.push_str(&content.decode()?),
            Event::GeneralRef(reference) if capture.is_some() => {
                if let Some(ch) = reference.resolve_char_ref()? {
                    text.push(ch);
                } else if let Some(resolved) = resolve_predefined_entity(&reference.decode()?) {
                    text.push_str(resolved);
                }
            }
            Event::End(end) => match end.local_name().as_ref() {
                b"controlfield" | b"subfield" => match capture.take() {
                    Some(Capture::Id) => record.id = Some(text.trim().to_string()),
                    Some(Capture::Subfield(code)) => {
                        record.subfields.push((code, text.trim().to_string()));
                    }
                    None => {}
                },
                b"datafield" if in_linkage_field => {
                    in_linkage_field = false;
                    record.seen_linkage = true;
                }
                b"record" => {
                    let finished = std::mem::take(&mut record);
                    match finished.id {
                        Some(id) if !id.is_empty() && !finished.subfields.is_empty() => {
                            linkage.insert(id, finished.subfields);
                        }
                        id => debug!(id = ?id, "record without linkage"),
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(linkage)
}
