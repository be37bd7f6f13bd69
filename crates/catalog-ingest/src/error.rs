use std::path::PathBuf;

use catalog_model::CatalogError;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse CSV {path}: {message}")]
    Csv { path: PathBuf, message: String },

    #[error("{path} contains no header row")]
    EmptyTable { path: PathBuf },

    #[error("collection table has no data row")]
    MissingCollectionRow,

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl IngestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
