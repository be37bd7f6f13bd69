//! Integration tests for the pipeline module.

use std::fs;
use std::path::Path;

use catalog_cli::config::PipelineConfig;
use catalog_cli::io::{OUTPUT_TABLE_FILE, write_diagnostics, write_output_table};
use catalog_cli::pipeline::{PipelineInputs, run_pipeline};
use catalog_map::ResolutionPolicy;
use catalog_marc::LinkageMap;
use catalog_model::{CatalogError, FieldName, RunDiagnostics};
use catalog_standards::hash::sha256_hex;
use catalog_standards::{AuthorityContext, load_authorities};

// ============================================================================
// Fixtures
// ============================================================================

const AUTHORITIES: &[(&str, &str, &str)] = &[
    (
        "person_roles.csv",
        "person-role",
        "term,synonyms,relator_heb,relator_eng\nצלם,,צלם,photographer\n",
    ),
    (
        "corporate_roles.csv",
        "corporate-role",
        "term,synonyms,relator_heb,relator_eng\nמפיק,,מפיק,producer\n",
    ),
    (
        "languages.csv",
        "language",
        "term,marc\nעברית,heb\nאנגלית,eng\n",
    ),
    (
        "materials.csv",
        "archival-material",
        "term,marc655\nמכתבים,$$aLetters$$2aat\n",
    ),
];

const COLLECTION: &str = "COLLECTION_ID,NAME_HEB,NAME_ENG,DATE\nX,ארכיון לוי,Levi Archive,1930-1990\n";

const CATALOG: &str = "UNITID,LEVEL,UNITITLE,EXTENT,CATALOGUER,DATE_CATALOGING,COMBINED_CREATORS,DATE,LANGUAGE,ARCHIVAL_MATERIAL\n\
X,Section Record,ארכיון לוי,3 קופסאות,רונית,2020-01-05,לוי [צלם],1930-1990,עברית,מכתבים\n\
X-1,File Record,מכתבים,1 תיק,רונית,2020-01-05,לוי [צלמים];הבימה [מפיק],1950,עיברית,מכתבים\n";

fn write_authorities(dir: &Path) {
    let mut manifest = String::from(
        "[manifest]\nschema = \"catalog-prep.authorities-manifest\"\nschema_version = 1\n",
    );
    for (name, kind, contents) in AUTHORITIES {
        fs::write(dir.join(name), contents).unwrap();
        manifest.push_str(&format!(
            "\n[[files]]\npath = \"{name}\"\nsha256 = \"{}\"\nkind = \"{kind}\"\n",
            sha256_hex(contents.as_bytes())
        ));
    }
    fs::write(dir.join("manifest.toml"), manifest).unwrap();
}

struct Fixture {
    dir: tempfile::TempDir,
    authorities: AuthorityContext,
}

impl Fixture {
    fn new(catalog: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let authority_dir = dir.path().join("authorities");
        fs::create_dir(&authority_dir).unwrap();
        write_authorities(&authority_dir);
        fs::write(dir.path().join("catalog.csv"), catalog).unwrap();
        fs::write(dir.path().join("collection.csv"), COLLECTION).unwrap();
        let (authorities, _) = load_authorities(&authority_dir).unwrap();
        Self { dir, authorities }
    }

    fn path(&self, name: &str) -> std::path::PathBuf {
        self.dir.path().join(name)
    }
}

// ============================================================================
// Full runs
// ============================================================================

#[test]
fn auto_accept_run_corrects_and_encodes() {
    let fixture = Fixture::new(CATALOG);
    let catalog = fixture.path("catalog.csv");
    let collection = fixture.path("collection.csv");
    let mut diagnostics = RunDiagnostics::default();
    let mut linkage = LinkageMap::new();
    linkage.insert("X-1", vec![("a".to_string(), "IE77".to_string())]);

    let output = run_pipeline(
        PipelineInputs {
            catalog: &catalog,
            collection: &collection,
        },
        &fixture.authorities,
        &PipelineConfig::default(),
        &mut ResolutionPolicy::AutoAccept,
        Some(&linkage),
        &mut diagnostics,
    )
    .unwrap();

    assert_eq!(
        diagnostics.role_corrections,
        vec![("צלמים".to_string(), "צלם".to_string())]
    );
    assert!(diagnostics.roles.is_empty());
    assert_eq!(diagnostics.vocabulary.len(), 1);
    assert_eq!(diagnostics.vocabulary[0].corrected_to.as_deref(), Some("עברית"));

    let file = output.batch.find("X-1").unwrap();
    assert_eq!(file.root_id, "X");
    assert_eq!(file.get(FieldName::Language), "עברית");
    assert_eq!(file.get(FieldName::AccessRestrict), "אין מגבלות פרטיות");

    let encoded = output.table.record("X-1").unwrap();
    assert_eq!(encoded.values("1001"), vec!["$$aלוי$$eצלם$$9heb"]);
    assert_eq!(encoded.values("7102"), vec!["$$aהבימה$$eמפיק$$9heb"]);
    assert_eq!(encoded.values("041"), vec!["$$aheb"]);
    assert_eq!(encoded.values("655 7"), vec!["$$aLetters$$2aat"]);
    assert_eq!(encoded.values("907"), vec!["$$aIE77"]);
    assert_eq!(encoded.values("77318"), vec!["$$tארכיון לוי$$wX"]);
    assert_eq!(encoded.control.to_string(), "######k19501950xx##################heb#d");
}

#[test]
fn auto_reject_run_reports_unresolved_values() {
    let fixture = Fixture::new(CATALOG);
    let catalog = fixture.path("catalog.csv");
    let collection = fixture.path("collection.csv");
    let mut diagnostics = RunDiagnostics::default();

    let output = run_pipeline(
        PipelineInputs {
            catalog: &catalog,
            collection: &collection,
        },
        &fixture.authorities,
        &PipelineConfig::default(),
        &mut ResolutionPolicy::AutoReject,
        None,
        &mut diagnostics,
    )
    .unwrap();

    assert_eq!(diagnostics.roles.len(), 1);
    assert_eq!(diagnostics.roles.discrepancies[0].role, "צלמים");
    assert_eq!(diagnostics.roles.discrepancies[0].unit_ids, vec!["X-1"]);
    assert_eq!(diagnostics.unresolved_terms(), 1);

    let encoded = output.table.record("X-1").unwrap();
    assert_eq!(encoded.values("1001"), vec!["$$aלוי$$9heb"]);
    assert!(!encoded.has_tag("041"));

    let out_dir = fixture.path("out");
    fs::create_dir(&out_dir).unwrap();
    let reports = write_diagnostics(&out_dir, &diagnostics).unwrap();
    assert_eq!(reports.len(), 3);
    let roles = fs::read_to_string(&reports[0]).unwrap();
    assert!(roles.contains("צלמים"));

    let table_path = out_dir.join(OUTPUT_TABLE_FILE);
    write_output_table(&table_path, &output.table).unwrap();
    let csv = fs::read_to_string(&table_path).unwrap();
    assert!(csv.starts_with("UNITID,LDR,008,"));
    assert_eq!(csv.lines().count(), 3);
}

#[test]
fn renamed_parent_fails_with_every_orphan() {
    let catalog = "UNITID,LEVEL,UNITITLE,EXTENT,CATALOGUER,DATE_CATALOGING,COMBINED_CREATORS,DATE\n\
X,Section Record,ארכיון,1,רונית,2020-01-05,לוי [צלם],1930\n\
X-9,Series Record,סדרה,1,רונית,2020-01-05,לוי [צלם],1930\n\
X-1-1,File Record,תיק,1,רונית,2020-01-05,לוי [צלם],1930\n\
X-1-2,File Record,תיק,1,רונית,2020-01-05,לוי [צלם],1931\n";
    let fixture = Fixture::new(catalog);
    let catalog = fixture.path("catalog.csv");
    let collection = fixture.path("collection.csv");
    let mut diagnostics = RunDiagnostics::default();

    let error = run_pipeline(
        PipelineInputs {
            catalog: &catalog,
            collection: &collection,
        },
        &fixture.authorities,
        &PipelineConfig::default(),
        &mut ResolutionPolicy::AutoReject,
        None,
        &mut diagnostics,
    )
    .unwrap_err();

    let Some(CatalogError::OrphanReference(orphans)) = error.downcast_ref::<CatalogError>()
    else {
        panic!("expected OrphanReference, got {error:#}");
    };
    let ids: Vec<&str> = orphans.iter().map(|o| o.unit_id.as_str()).collect();
    assert_eq!(ids, vec!["X-1-1", "X-1-2"]);
    assert!(diagnostics.dates.is_empty());
}

#[test]
fn config_file_drives_the_run() {
    let fixture = Fixture::new(CATALOG);
    let config_path = fixture.path("catalog.toml");
    fs::write(
        &config_path,
        "default_access_restriction = \"פתוח\"\n\n[marc.constants]\nformat = \"MY\"\n",
    )
    .unwrap();
    let config = PipelineConfig::load(&config_path).unwrap();
    let catalog = fixture.path("catalog.csv");
    let collection = fixture.path("collection.csv");
    let mut diagnostics = RunDiagnostics::default();

    let output = run_pipeline(
        PipelineInputs {
            catalog: &catalog,
            collection: &collection,
        },
        &fixture.authorities,
        &config,
        &mut ResolutionPolicy::AutoReject,
        None,
        &mut diagnostics,
    )
    .unwrap();

    let file = output.batch.find("X-1").unwrap();
    assert_eq!(file.get(FieldName::AccessRestrict), "פתוח");
    assert_eq!(output.table.record("X").unwrap().values("FMT"), vec!["MY"]);
    assert_eq!(output.defaults.access_filled, 1);
}
