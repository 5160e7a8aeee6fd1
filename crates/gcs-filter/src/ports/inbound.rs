//! Inbound Ports (Driving Ports)
//!
//! The API that block indexers and light-client code use to build and query
//! compact filters.

use crate::domain::{BlockFilter, FilterConfig, GcsFilter, Hash};
use crate::error::FilterError;

use super::outbound::{BlockView, CoinView};

/// Primary GCS filter API (Driving Port)
pub trait GcsFilterApi: Send + Sync {
    /// Active configuration
    fn config(&self) -> &FilterConfig;

    /// Build a filter over already extracted items
    ///
    /// # Arguments
    /// * `p` - Rice parameter (0 to 32)
    /// * `key` - 16-byte SipHash key
    /// * `items` - Items to encode, duplicates allowed
    fn build_filter(&self, p: u8, key: &[u8], items: &[&[u8]]) -> Result<GcsFilter, FilterError>;

    /// Build the basic filter of a block, resolving spent outputs in `view`
    fn build_basic_filter<B, V>(&self, block: &B, view: &V) -> Result<BlockFilter, FilterError>
    where
        B: BlockView,
        V: CoinView;

    /// Build the extended filter of a block
    fn build_extended_filter<B>(&self, block: &B) -> Result<BlockFilter, FilterError>
    where
        B: BlockView;

    /// Test a single item against a filter
    fn contains(&self, filter: &GcsFilter, key: &[u8], target: &[u8]) -> Result<bool, FilterError>;

    /// Test whether any of `targets` may be in a filter
    ///
    /// Fails with `EmptyTargetSet` if `targets` is empty.
    fn match_any(
        &self,
        filter: &GcsFilter,
        key: &[u8],
        targets: &[&[u8]],
    ) -> Result<bool, FilterError>;

    /// Filter header on top of `prev_header`, or the configured genesis
    /// header when `prev_header` is `None`
    fn filter_header(&self, filter: &GcsFilter, prev_header: Option<&Hash>) -> Hash;
}
