//! Outbound Ports (Driven Ports)
//!
//! Narrow read-only views over already parsed blocks and the coin set. The
//! filter code only needs to walk transactions, read scripts and witness
//! items, and look up spent outputs; it never sees a concrete block type.

use std::collections::HashMap;

use crate::domain::Hash;

/// `OP_RETURN`, the first opcode of a null-data output
pub const OP_RETURN: u8 = 0x6a;

/// Reference to a transaction output
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutPoint {
    /// Hash of the transaction holding the output
    pub txid: Hash,
    /// Output index within that transaction
    pub index: u32,
}

impl OutPoint {
    /// Create an outpoint
    pub fn new(txid: Hash, index: u32) -> Self {
        Self { txid, index }
    }
}

/// A transaction output
pub trait OutputView {
    /// Locking script bytes
    fn script(&self) -> &[u8];

    /// Whether the output is a data carrier that can never be spent
    fn is_null_data(&self) -> bool {
        self.script().first() == Some(&OP_RETURN)
    }
}

/// A transaction input
pub trait InputView {
    /// Output being spent
    fn prevout(&self) -> OutPoint;

    /// Witness stack items
    fn witness(&self) -> &[Vec<u8>];

    /// Data pushed by the input script, or `None` if the script failed to parse
    fn script_pushes(&self) -> Option<Vec<&[u8]>>;
}

/// A parsed transaction
pub trait TransactionView {
    type Input: InputView;
    type Output: OutputView;

    /// Whether this is the block's coinbase
    fn is_coinbase(&self) -> bool;

    fn inputs(&self) -> &[Self::Input];

    fn outputs(&self) -> &[Self::Output];
}

/// A parsed block
pub trait BlockView {
    type Transaction: TransactionView;

    /// Hash of the block, also the source of the filter key
    fn block_hash(&self) -> Hash;

    fn transactions(&self) -> &[Self::Transaction];
}

/// Lookup of outputs spent by a block
pub trait CoinView {
    /// Locking script of the output `prevout` points to
    fn prev_script(&self, prevout: &OutPoint) -> Option<&[u8]>;
}

impl CoinView for HashMap<OutPoint, Vec<u8>> {
    fn prev_script(&self, prevout: &OutPoint) -> Option<&[u8]> {
        self.get(prevout).map(Vec::as_slice)
    }
}
