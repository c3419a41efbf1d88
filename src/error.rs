use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum TrackError {
    #[error("cannot ingest without a title: {0}")]
    #[diagnostic(help("set a title on the notebook (a leading `# Title` markdown cell)"))]
    Configuration(String),

    #[error("database error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("download failed: {0}")]
    TransferHttp(String),

    #[error("download returned status {status}: {message}")]
    TransferStatus { status: u16, message: String },

    #[error("missing config file biotrack.json in current directory")]
    MissingConfig,

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),

    #[error("invalid notebook metadata: {0}")]
    Provenance(String),

    #[error("unknown dataset: {0}")]
    UnknownDataset(String),

    #[error("invalid {field} identifier: {value}")]
    InvalidIdentifier { field: String, value: String },

    #[error("invalid interface type: {0}")]
    InvalidInterfaceType(String),

    #[error("unknown id field: {0}")]
    InvalidIdField(String),
}
