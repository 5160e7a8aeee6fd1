//! Domain Layer - Pure business logic
//!
//! This layer contains:
//! - Bit stream writer and reader
//! - Keyed hash reduction
//! - Golomb-Rice coding
//! - GCS filters (BIP 158) and their wire layouts
//! - Filter hashes and header chains (BIP 157)
//! - Block filters and item extraction
//! - Configuration
//!
//! RULES:
//! - No I/O operations
//! - No async code
//! - Pure functions where possible

pub mod bit_stream;
pub mod block_filter;
pub mod config;
pub mod gcs_filter;
pub mod hash_reducer;
pub mod header;
pub mod rice;
pub mod wire;

pub use bit_stream::{BitReader, BitWriter};
pub use block_filter::{basic_items, extended_items, BlockFilter, FilterType};
pub use config::{FilterConfig, FilterConfigBuilder};
pub use gcs_filter::{FilterValues, GcsFilter, GCS_FPR, GOLOMB_M, GOLOMB_P, MAX_ITEMS, MAX_PRECISION};
pub use hash_reducer::{fast_reduce, FilterKey, HashReducer, KEY_LENGTH};
pub use header::{
    chain_headers, double_sha256, filter_header, verify_header_chain, FilterHeaderChain, Hash,
    ZERO_HASH,
};
pub use wire::WireLayout;
