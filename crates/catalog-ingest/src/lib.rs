#![deny(unsafe_code)]

//! Field Normalizer: from free-text bilingual spreadsheets to typed records.

pub mod collection;
pub mod csv_table;
pub mod error;
pub mod header;
pub mod materialize;
pub mod normalize;
pub mod schema;

pub use collection::normalize_collection;
pub use csv_table::{RawTable, parse_raw_table, read_raw_table};
pub use error::IngestError;
pub use header::{clean_header, resolve_header};
pub use materialize::materialize_records;
pub use normalize::{NormalizedRow, NormalizedTable, map_rows, missing_fields, normalize_table};
pub use schema::SchemaVersion;
