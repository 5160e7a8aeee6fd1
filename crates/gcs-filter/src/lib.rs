//! # GCS Filter
//!
//! Golomb-Coded Set block filters (BIP 158) and filter header chains
//! (BIP 157) for light client support.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure business logic, no I/O
//!   - `BitWriter` / `BitReader`: MSB-first bit streams
//!   - `HashReducer`: SipHash-2-4 plus fast range reduction
//!   - `rice`: Golomb-Rice coding
//!   - `GcsFilter`: build, query, wire layouts
//!   - `FilterHeaderChain`: chained filter commitments
//!   - `BlockFilter`: basic and extended block filters
//!   - `FilterConfig` / `FilterConfigBuilder`: configuration with validation
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `GcsFilterApi`: Driving port (inbound API)
//!   - `BlockView`, `TransactionView`, `InputView`, `OutputView`, `CoinView`:
//!     Driven ports over already parsed chain data
//!
//! - **Service Layer** (`service/`): Orchestration
//!   - `GcsFilterService`: Implements `GcsFilterApi`, records metrics
//!
//! - **Adapters Layer** (`adapters/`): In-memory block views
//!
//! ## Invariants
//!
//! - **No false negatives**: every item a filter was built from matches it
//! - **False positive rate**: about `1 / 784931` per absent item
//! - **Determinism**: same key and item set always give the same bytes
//!
//! ## Usage Example
//!
//! ```ignore
//! use gcs_filter::{GcsFilter, GOLOMB_P};
//!
//! let key = [0u8; 16];
//! let filter = GcsFilter::build(GOLOMB_P, &key, [b"a", b"b", b"c"])?;
//!
//! assert!(filter.contains(&key, b"a")?);
//! let wire = filter.to_basic_bytes()?;
//! let decoded = GcsFilter::from_basic_bytes(&wire)?;
//! assert_eq!(decoded, filter);
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use domain::{
    BlockFilter, FilterConfig, FilterConfigBuilder, FilterHeaderChain, FilterKey, FilterType,
    GcsFilter, Hash, WireLayout, GCS_FPR, GOLOMB_M, GOLOMB_P, ZERO_HASH,
};
pub use error::{DataError, FilterError};
pub use metrics::{Metrics, MetricsRecorder, MetricsSnapshot, NoOpMetrics};
pub use ports::{BlockView, CoinView, GcsFilterApi, InputView, OutPoint, OutputView, TransactionView};
pub use service::GcsFilterService;
