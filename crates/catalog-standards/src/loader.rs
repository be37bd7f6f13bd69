#![deny(unsafe_code)]

//! Loading an authority directory: `manifest.toml` plus one CSV per kind.
//!
//! Each CSV is verified against its pinned SHA-256 before it is parsed.
//! CSV layout: a `term` column, an optional `synonyms` column (`;`-separated),
//! and any number of code columns (see [`crate::columns`]).

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::authority::{AuthorityEntry, AuthorityKind, AuthorityTable};
use crate::context::AuthorityContext;
use crate::error::StandardsError;
use crate::hash::sha256_hex;
use crate::manifest::{MANIFEST_FILE, MANIFEST_SCHEMA, Manifest, ManifestFile};

const TERM_COLUMN: &str = "term";
const SYNONYMS_COLUMN: &str = "synonyms";

/// Per-authority facts reported after verification.
#[derive(Debug, Clone, Serialize)]
pub struct AuthoritySummary {
    pub kind: AuthorityKind,
    pub path: PathBuf,
    pub sha256: String,
    pub terms: usize,
    pub synonyms: usize,
}

/// Verifies and loads every authority listed in `dir/manifest.toml`.
pub fn load_authorities(
    dir: &Path,
) -> Result<(AuthorityContext, Vec<AuthoritySummary>), StandardsError> {
    let manifest_path = dir.join(MANIFEST_FILE);
    let manifest = load_manifest(&manifest_path)?;
    validate_manifest(&manifest)?;

    let mut tables = Vec::new();
    let mut summaries = Vec::new();
    for file in &manifest.files {
        let kind = parse_kind(file)?;
        let path = dir.join(validate_path(&file.path)?);
        let bytes = verify_file(&path, &file.sha256)?;
        let table = parse_authority_csv(kind, &path, &bytes)?;
        debug!(kind = %kind, terms = table.len(), "authority loaded");
        summaries.push(AuthoritySummary {
            kind,
            path,
            sha256: file.sha256.to_ascii_lowercase(),
            terms: table.len(),
            synonyms: table.entries().iter().map(|e| e.synonyms.len()).sum(),
        });
        tables.push(table);
    }

    let context = AuthorityContext::new(tables)?;
    info!(
        dir = %dir.display(),
        authorities = summaries.len(),
        "authorities verified"
    );
    Ok((context, summaries))
}

fn load_manifest(path: &Path) -> Result<Manifest, StandardsError> {
    let contents = std::fs::read_to_string(path).map_err(|e| StandardsError::io(path, e))?;
    toml::from_str(&contents).map_err(|e| StandardsError::Toml {
        path: path.to_path_buf(),
        source: e,
    })
}

fn validate_manifest(manifest: &Manifest) -> Result<(), StandardsError> {
    if manifest.manifest.schema != MANIFEST_SCHEMA {
        return Err(StandardsError::InvalidManifest {
            message: format!("unsupported schema: {}", manifest.manifest.schema),
        });
    }
    if manifest.manifest.schema_version != 1 {
        return Err(StandardsError::InvalidManifest {
            message: format!(
                "unsupported schema_version: {}",
                manifest.manifest.schema_version
            ),
        });
    }
    let mut kinds = BTreeSet::new();
    for file in &manifest.files {
        if !kinds.insert(file.kind.as_str()) {
            return Err(StandardsError::DuplicateKind {
                kind: file.kind.clone(),
            });
        }
        validate_sha(&file.sha256, &file.path)?;
    }
    Ok(())
}

fn parse_kind(file: &ManifestFile) -> Result<AuthorityKind, StandardsError> {
    file.kind
        .parse()
        .map_err(|_| StandardsError::UnknownKind {
            kind: file.kind.clone(),
            path: file.path.clone(),
        })
}

fn validate_sha(sha: &str, path: &str) -> Result<(), StandardsError> {
    if sha.len() != 64 || !sha.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(StandardsError::InvalidSha256 {
            path: PathBuf::from(path),
            message: "expected 64 hex characters".to_string(),
        });
    }
    Ok(())
}

/// Manifest paths must stay inside the authority directory.
fn validate_path(raw: &str) -> Result<PathBuf, StandardsError> {
    let path = PathBuf::from(raw);
    let escapes = path
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes || raw.is_empty() {
        return Err(StandardsError::InvalidManifest {
            message: format!("path must be relative to the authority directory: {raw}"),
        });
    }
    Ok(path)
}

fn verify_file(path: &Path, expected: &str) -> Result<Vec<u8>, StandardsError> {
    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            StandardsError::MissingFile {
                path: path.to_path_buf(),
            }
        } else {
            StandardsError::io(path, e)
        }
    })?;
    let actual = sha256_hex(&bytes);
    let expected = expected.to_ascii_lowercase();
    if actual != expected {
        return Err(StandardsError::Sha256Mismatch {
            path: path.to_path_buf(),
            expected,
            actual,
        });
    }
    Ok(bytes)
}

/// Parses one authority CSV already read into memory.
pub fn parse_authority_csv(
    kind: AuthorityKind,
    path: &Path,
    bytes: &[u8],
) -> Result<AuthorityTable, StandardsError> {
    let csv_error = |message: String| StandardsError::Csv {
        path: path.to_path_buf(),
        message,
    };
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| csv_error(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_ascii_lowercase())
        .collect();
    let term_idx = headers
        .iter()
        .position(|h| h == TERM_COLUMN)
        .ok_or_else(|| csv_error(format!("missing '{TERM_COLUMN}' column")))?;

    let mut entries = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| csv_error(e.to_string()))?;
        let term = row.get(term_idx).unwrap_or("").trim();
        if term.is_empty() {
            continue;
        }
        let mut entry = AuthorityEntry::new(term);
        let mut codes = BTreeMap::new();
        for (idx, header) in headers.iter().enumerate() {
            if idx == term_idx || header.is_empty() {
                continue;
            }
            let value = row.get(idx).unwrap_or("").trim();
            if header == SYNONYMS_COLUMN {
                entry.synonyms = value
                    .split(';')
                    .map(str::trim)
                    .filter(|s| !s.is_empty() && *s != term)
                    .map(String::from)
                    .collect();
            } else if !value.is_empty() {
                codes.insert(header.clone(), value.to_string());
            }
        }
        entry.codes = codes;
        entries.push(entry);
    }
    Ok(AuthorityTable::new(kind, entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns;

    #[test]
    fn parses_terms_synonyms_and_codes() {
        let csv = "\u{feff}term,synonyms,marc\nישראל,ארץ ישראל;פלשתינה,is\nגרמניה,,gw\n,,\n";
        let table = parse_authority_csv(
            AuthorityKind::Country,
            Path::new("countries.csv"),
            csv.as_bytes(),
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.canonical("פלשתינה"), Some("ישראל"));
        assert_eq!(table.code("גרמניה", columns::MARC_CODE), Some("gw"));
    }

    #[test]
    fn missing_term_column_is_an_error() {
        let error = parse_authority_csv(
            AuthorityKind::Language,
            Path::new("languages.csv"),
            "name,marc\nעברית,heb\n".as_bytes(),
        )
        .unwrap_err();
        assert!(matches!(error, StandardsError::Csv { .. }));
    }

    #[test]
    fn rejects_escaping_paths() {
        assert!(validate_path("../roles.csv").is_err());
        assert!(validate_path("/etc/roles.csv").is_err());
        assert!(validate_path("roles/person.csv").is_ok());
    }
}
