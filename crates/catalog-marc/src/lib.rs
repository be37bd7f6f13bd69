#![deny(unsafe_code)]

//! MARC 21 encoding of validated catalog records.
//!
//! The encoder turns a [`catalog_model::Batch`] into an [`OutputTable`]: one
//! [`EncodedRecord`] per record, holding the leader, the positional `008`
//! control field and numbered data fields such as `7001_2`. Writing the table
//! out is left to the caller.

pub mod constants;
pub mod control;
pub mod encoder;
pub mod linkage;
pub mod names;
pub mod table;

pub use constants::{EncoderSettings, MarcConstants};
pub use control::{CONTROL_TEMPLATE, ControlField};
pub use encoder::{MarcEncoder, format_cataloguing_date, genre_terms, leader_for};
pub use linkage::{DigitizationLinkage, LinkageMap, encode_907};
pub use names::{NameScript, detect_script, encode_keyword, encode_name};
pub use table::{EncodedRecord, OutputField, OutputTable, explode};
