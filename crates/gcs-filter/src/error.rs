//! Error types for the GCS filter crate

use thiserror::Error;

use crate::domain::Hash;

/// Errors that can occur while building, decoding or querying filters
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid Rice parameter: {p} (must be between 0 and 32)")]
    InvalidPrecision { p: u8 },

    #[error("Invalid filter key length: {len} (must be 16 bytes)")]
    InvalidKeyLength { len: usize },

    #[error("Too many items: {count} > {max}")]
    TooManyItems { count: usize, max: u64 },

    #[error("Batch match requires at least one target")]
    EmptyTargetSet,

    #[error("Malformed filter buffer: {0}")]
    MalformedBuffer(String),

    #[error("Filter header mismatch at index {index}")]
    HeaderMismatch { index: usize },

    #[error("Header count mismatch: {headers} headers for {filters} filters")]
    HeaderCountMismatch { headers: usize, filters: usize },

    #[error("Invalid filter parameters: {0}")]
    InvalidParameters(String),

    #[error("Data provider error: {0}")]
    DataError(#[from] DataError),
}

/// Errors from the block and coin collaborators
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataError {
    #[error("Coin not found: {}:{}", hex::encode(.txid), .index)]
    MissingCoin { txid: Hash, index: u32 },
}
