//! Adapters Layer (Driven Adapters)
//!
//! Implementations of the outbound ports.
//!
//! ## Adapters
//!
//! - `MemoryBlock` and friends - owned, already decoded blocks
//! - `HashMap<OutPoint, Vec<u8>>` implements `CoinView` directly (see `ports`)

pub mod memory_block;

pub use memory_block::{MemoryBlock, MemoryInput, MemoryOutput, MemoryTransaction};
