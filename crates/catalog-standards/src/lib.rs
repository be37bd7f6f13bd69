#![deny(unsafe_code)]

pub mod authority;
pub mod context;
pub mod error;
pub mod hash;
pub mod loader;
pub mod manifest;

pub use crate::authority::{AuthorityEntry, AuthorityKind, AuthorityTable, columns};
pub use crate::context::AuthorityContext;
pub use crate::error::StandardsError;
pub use crate::loader::{AuthoritySummary, load_authorities, parse_authority_csv};
