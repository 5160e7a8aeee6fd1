//! Ports Layer
//!
//! Defines the interfaces (traits) for:
//! - Driving Ports (inbound) - API for block indexers and light clients
//! - Driven Ports (outbound) - read-only views over blocks and coins

pub mod inbound;
pub mod outbound;

pub use inbound::GcsFilterApi;
pub use outbound::{
    BlockView, CoinView, InputView, OutPoint, OutputView, TransactionView, OP_RETURN,
};
