//! In-memory block views
//!
//! Owned implementations of the outbound block ports, for callers that
//! already hold decoded transactions (RPC responses, fixtures, replay tools).

use crate::domain::Hash;
use crate::ports::{BlockView, InputView, OutPoint, OutputView, TransactionView};

/// Decoded transaction input
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryInput {
    pub prevout: OutPoint,
    pub witness: Vec<Vec<u8>>,
    /// Data pushes of the input script, `None` if it failed to parse
    pub pushes: Option<Vec<Vec<u8>>>,
}

impl MemoryInput {
    /// Input spending `prevout` with an empty script
    pub fn spending(prevout: OutPoint) -> Self {
        Self {
            prevout,
            witness: Vec::new(),
            pushes: Some(Vec::new()),
        }
    }

    pub fn with_witness(mut self, witness: Vec<Vec<u8>>) -> Self {
        self.witness = witness;
        self
    }

    pub fn with_pushes(mut self, pushes: Vec<Vec<u8>>) -> Self {
        self.pushes = Some(pushes);
        self
    }

    /// Mark the input script as unparsable
    pub fn with_unparsable_script(mut self) -> Self {
        self.pushes = None;
        self
    }
}

impl InputView for MemoryInput {
    fn prevout(&self) -> OutPoint {
        self.prevout
    }

    fn witness(&self) -> &[Vec<u8>] {
        &self.witness
    }

    fn script_pushes(&self) -> Option<Vec<&[u8]>> {
        self.pushes
            .as_ref()
            .map(|pushes| pushes.iter().map(Vec::as_slice).collect())
    }
}

/// Decoded transaction output
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryOutput {
    pub script: Vec<u8>,
}

impl MemoryOutput {
    pub fn new(script: impl Into<Vec<u8>>) -> Self {
        Self {
            script: script.into(),
        }
    }
}

impl OutputView for MemoryOutput {
    fn script(&self) -> &[u8] {
        &self.script
    }
}

/// Decoded transaction
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryTransaction {
    pub coinbase: bool,
    pub inputs: Vec<MemoryInput>,
    pub outputs: Vec<MemoryOutput>,
}

impl MemoryTransaction {
    /// Regular transaction
    pub fn new(inputs: Vec<MemoryInput>, outputs: Vec<MemoryOutput>) -> Self {
        Self {
            coinbase: false,
            inputs,
            outputs,
        }
    }

    /// Coinbase transaction with a single null input
    pub fn coinbase(outputs: Vec<MemoryOutput>) -> Self {
        Self {
            coinbase: true,
            inputs: vec![MemoryInput::spending(OutPoint::new([0u8; 32], u32::MAX))],
            outputs,
        }
    }
}

impl TransactionView for MemoryTransaction {
    type Input = MemoryInput;
    type Output = MemoryOutput;

    fn is_coinbase(&self) -> bool {
        self.coinbase
    }

    fn inputs(&self) -> &[MemoryInput] {
        &self.inputs
    }

    fn outputs(&self) -> &[MemoryOutput] {
        &self.outputs
    }
}

/// Decoded block
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryBlock {
    pub hash: Hash,
    pub transactions: Vec<MemoryTransaction>,
}

impl MemoryBlock {
    pub fn new(hash: Hash, transactions: Vec<MemoryTransaction>) -> Self {
        Self { hash, transactions }
    }
}

impl BlockView for MemoryBlock {
    type Transaction = MemoryTransaction;

    fn block_hash(&self) -> Hash {
        self.hash
    }

    fn transactions(&self) -> &[MemoryTransaction] {
        &self.transactions
    }
}
