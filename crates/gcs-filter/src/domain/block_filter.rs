//! Block-level GCS filters
//!
//! Binds a [`GcsFilter`] to the block it covers and the item policy used to
//! build it. The key is always the first 16 bytes of the block hash.
//!
//! ## Item policies
//!
//! - **Basic**: every non-empty output script that is not null-data, plus every
//!   non-empty script spent by the block's non-coinbase inputs.
//! - **Extended**: every witness item and every non-empty data push of the
//!   input scripts of non-coinbase transactions. Inputs whose script failed
//!   to parse contribute no pushes.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::config::FilterConfig;
use super::gcs_filter::GcsFilter;
use super::hash_reducer::FilterKey;
use super::header::Hash;
use crate::error::{DataError, FilterError};
use crate::ports::{BlockView, CoinView, InputView, OutputView, TransactionView};

/// Which item policy a filter was built with
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterType {
    Basic,
    Extended,
}

impl FilterType {
    /// Wire identifier
    pub fn id(self) -> u8 {
        match self {
            Self::Basic => 0,
            Self::Extended => 1,
        }
    }

    /// Parse a wire identifier
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Self::Basic),
            1 => Some(Self::Extended),
            _ => None,
        }
    }
}

/// GCS filter for a specific block
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockFilter {
    /// Hash of the block
    pub block_hash: Hash,
    /// Item policy
    pub filter_type: FilterType,
    /// The encoded filter
    pub filter: GcsFilter,
}

impl BlockFilter {
    /// Wrap an existing filter
    pub fn new(block_hash: Hash, filter_type: FilterType, filter: GcsFilter) -> Self {
        Self {
            block_hash,
            filter_type,
            filter,
        }
    }

    /// Build a filter from already extracted items
    pub fn from_items<I, T>(
        block_hash: Hash,
        filter_type: FilterType,
        items: I,
        config: &FilterConfig,
    ) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        config.validate()?;

        let key = FilterKey::from_block_hash(&block_hash);
        let filter =
            GcsFilter::build_with_limit(config.precision, &key, items, config.max_items)
                .map_err(|err| {
                    if let FilterError::TooManyItems { count, max } = &err {
                        warn!(
                            block = %hex::encode(block_hash),
                            items = count,
                            max,
                            "Rejected oversized block filter"
                        );
                    }
                    err
                })?;

        Ok(Self::new(block_hash, filter_type, filter))
    }

    /// Build the basic filter of `block`, resolving spent scripts in `view`
    pub fn basic<B, V>(block: &B, view: &V, config: &FilterConfig) -> Result<Self, FilterError>
    where
        B: BlockView,
        V: CoinView,
    {
        let items = basic_items(block, view)?;
        debug!(
            block = %hex::encode(block.block_hash()),
            items = items.len(),
            "Extracted basic filter items"
        );
        Self::from_items(block.block_hash(), FilterType::Basic, items, config)
    }

    /// Build the extended filter of `block`
    pub fn extended<B>(block: &B, config: &FilterConfig) -> Result<Self, FilterError>
    where
        B: BlockView,
    {
        let items = extended_items(block);
        debug!(
            block = %hex::encode(block.block_hash()),
            items = items.len(),
            "Extracted extended filter items"
        );
        Self::from_items(block.block_hash(), FilterType::Extended, items, config)
    }

    /// Decode a filter received in the `compact_size(N) || data` layout
    pub fn from_bytes(
        block_hash: Hash,
        filter_type: FilterType,
        p: u8,
        bytes: &[u8],
    ) -> Result<Self, FilterError> {
        let filter = GcsFilter::from_n_bytes(p, bytes)?;
        Ok(Self::new(block_hash, filter_type, filter))
    }

    /// Serialized `compact_size(N) || data`
    pub fn to_bytes(&self) -> Vec<u8> {
        self.filter.to_n_bytes()
    }

    /// Key derived from the block hash
    pub fn key(&self) -> FilterKey {
        FilterKey::from_block_hash(&self.block_hash)
    }

    /// Filter content hash
    pub fn hash(&self) -> Hash {
        self.filter.hash()
    }

    /// Filter header on top of `prev_header`
    pub fn header(&self, prev_header: &Hash) -> Hash {
        self.filter.header(prev_header)
    }

    /// Check if an item might be in this block
    pub fn might_contain(&self, item: &[u8]) -> bool {
        self.filter.contains_with_key(&self.key(), item)
    }

    /// Check if any of the given items might be in this block
    pub fn might_contain_any<I, T>(&self, items: I) -> Result<bool, FilterError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        self.filter.match_any_with_key(&self.key(), items)
    }
}

/// Items of the basic filter: output scripts plus spent scripts.
///
/// A spent output missing from `view` is an error rather than a silently
/// incomplete filter.
pub fn basic_items<'a, B, V>(block: &'a B, view: &'a V) -> Result<Vec<&'a [u8]>, FilterError>
where
    B: BlockView,
    V: CoinView,
{
    let mut items = Vec::new();

    for tx in block.transactions() {
        for output in tx.outputs() {
            let script = output.script();
            if script.is_empty() || output.is_null_data() {
                continue;
            }
            items.push(script);
        }

        if tx.is_coinbase() {
            continue;
        }

        for input in tx.inputs() {
            let prevout = input.prevout();
            let script = view
                .prev_script(&prevout)
                .ok_or(DataError::MissingCoin {
                    txid: prevout.txid,
                    index: prevout.index,
                })?;
            if !script.is_empty() {
                items.push(script);
            }
        }
    }

    Ok(items)
}

/// Items of the extended filter: witness items and input script pushes.
pub fn extended_items<B>(block: &B) -> Vec<&[u8]>
where
    B: BlockView,
{
    let mut items = Vec::new();

    for tx in block.transactions() {
        if tx.is_coinbase() {
            continue;
        }

        for input in tx.inputs() {
            items.extend(input.witness().iter().map(Vec::as_slice));

            match input.script_pushes() {
                Some(pushes) => items.extend(pushes.into_iter().filter(|push| !push.is_empty())),
                None => debug!(
                    prevout = %hex::encode(input.prevout().txid),
                    "Skipping unparsable input script"
                ),
            }
        }
    }

    items
}
