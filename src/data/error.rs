use std::path::PathBuf;

use thiserror::Error;

/// Structural failures while loading or validating the study datasets.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("no file for dataset '{name}' in {} (tried .csv, .parquet, .json)", dir.display())]
    MissingDataset { name: String, dir: PathBuf },

    #[error("dataset '{0}' was not loaded")]
    MissingTable(String),

    #[error("dataset '{dataset}' is missing required column '{column}'")]
    MissingColumn { dataset: String, column: String },

    #[error("dataset '{dataset}', row {row}: '{value}' is not a date (expected YYYY-MM-DD)")]
    BadDate {
        dataset: String,
        row: usize,
        value: String,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("column '{column}' has {got} values, expected {expected}")]
    RaggedColumn {
        column: String,
        got: usize,
        expected: usize,
    },
}
