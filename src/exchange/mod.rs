//! Exchange access.
//!
//! This module handles:
//! - Payload normalization into canonical types
//! - The ATAIX REST client
//! - Mock exchange for testing

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::error::ExchangeError;
use crate::trading::OrderRequest;

pub mod client;
pub mod mock;
pub mod types;

pub use client::AtaixClient;
pub use mock::{MockExchange, MockExchangeBuilder};
pub use types::{OrderAck, TradingPair};

/// The three calls a ladder run makes against an exchange.
///
/// `AtaixClient` implements this for the live API, `MockExchange` for tests.
#[async_trait]
pub trait Exchange: Send + Sync {
    /// Available (unlocked) balance of `asset`.
    async fn available_balance(&self, asset: &str) -> Result<Decimal, ExchangeError>;

    /// Current pair listing, normalized, in exchange order.
    async fn list_pairs(&self) -> Result<Vec<TradingPair>, ExchangeError>;

    /// Submit one order and return the exchange acknowledgment.
    async fn place_order(&self, order: &OrderRequest) -> Result<OrderAck, ExchangeError>;
}
