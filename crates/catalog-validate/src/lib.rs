#![deny(unsafe_code)]

//! Vocabulary Validator.
//!
//! One acceptance rule applies to every controlled field: a raw value is
//! accepted only when its single best match in the authority is the value
//! itself, verbatim. Anything else is a mismatch. A mismatch whose closest
//! key clears the acceptance threshold is offered as a correction to the
//! [`catalog_map::ResolutionPolicy`]; confirmed corrections are applied to the
//! whole batch.

mod fields;
mod report;
mod vocabulary;

pub use fields::{VALIDATED_FIELDS, authority_for};
pub use report::build_match_report;
pub use vocabulary::{
    ValidationOptions, ValidationOutcome, distinct_values, find_mismatches, replace_value,
    validate_field, validate_vocabulary,
};
