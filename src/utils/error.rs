// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Unparsable amount: {0}")]
    UnparsableAmount(String),

    #[error("No recurring transaction pattern found")]
    NoPatternFound,
}

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid lookup table {path}: {source}")]
    InvalidTable {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid keyword pattern for category '{category}': {message}")]
    InvalidPattern { category: String, message: String },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Lookup table error: {0}")]
    Lookup(#[from] LookupError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Data processing failed: {0}")]
    Processing(String),
}
