//! Library side of the `catalog-prep` tool: pipeline orchestration, run
//! configuration, artifact writing and logging setup.

pub mod config;
pub mod io;
pub mod linkage;
pub mod logging;
pub mod pipeline;
