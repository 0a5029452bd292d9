//! Test support: in-memory liquidity sinks.
//!
//! Compiled into the crate (not behind `cfg(test)`) so integration tests
//! and downstream consumers can drive a full engine without a real venue.

use std::sync::{Arc, Mutex, PoisonError};

use lib_types::{Address, Amount, TokenId};

use crate::sink::{LiquiditySink, SinkDepositReceipt, SinkError};

/// Sink that accepts every deposit and records it.
///
/// The deposit log is shared across clones, so a test can hand one clone to
/// the engine and inspect the other after graduation.
#[derive(Debug, Clone)]
pub struct MockSink {
    address: Address,
    deposits: Arc<Mutex<Vec<SinkDepositReceipt>>>,
}

impl MockSink {
    pub fn new(address: Address) -> Self {
        Self { address, deposits: Arc::new(Mutex::new(Vec::new())) }
    }

    /// All deposits accepted so far.
    pub fn recorded(&self) -> Vec<SinkDepositReceipt> {
        self.deposits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl LiquiditySink for MockSink {
    fn address(&self) -> Address {
        self.address
    }

    fn deposit_liquidity(
        &mut self,
        token: TokenId,
        token_amount: Amount,
        eth_amount: Amount,
    ) -> Result<SinkDepositReceipt, SinkError> {
        let receipt = SinkDepositReceipt { token, token_amount, eth_amount };
        self.deposits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(receipt.clone());
        Ok(receipt)
    }
}

/// Sink that rejects every deposit, for exercising rollback paths.
#[derive(Debug, Clone)]
pub struct FailingSink {
    address: Address,
}

impl FailingSink {
    pub fn new(address: Address) -> Self {
        Self { address }
    }
}

impl LiquiditySink for FailingSink {
    fn address(&self) -> Address {
        self.address
    }

    fn deposit_liquidity(
        &mut self,
        _token: TokenId,
        _token_amount: Amount,
        _eth_amount: Amount,
    ) -> Result<SinkDepositReceipt, SinkError> {
        Err(SinkError::Unavailable)
    }
}
