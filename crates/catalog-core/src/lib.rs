#![deny(unsafe_code)]

//! Batch-level record processing: hierarchy, creators, dates and defaults.
//!
//! Every stage mutates a [`catalog_model::Batch`] in place and returns its
//! advisory findings; fatal conditions come back as
//! [`catalog_model::CatalogError`] with the complete offender list.

pub mod creators;
pub mod dates;
pub mod defaults;
pub mod hierarchy;

pub use creators::{
    CreatorEntries, CreatorOptions, CreatorOutcome, CreatorPartition, assemble_combined_creators,
    classify_creators, classify_role, creator_entries, find_name, find_role, parse_creators,
    partition_creators,
};
pub use dates::{extract_years_from_text, final_date_validation, normalize_dates};
pub use defaults::{
    DEFAULT_ACCESS_RESTRICTION, DefaultsSummary, apply_access_default, apply_record_defaults,
    clean_title,
};
pub use hierarchy::{derive_root_id, resolve_hierarchy};
