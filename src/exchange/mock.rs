//! Mock exchange for unit testing.
//!
//! This module provides an in-memory exchange that can be used in tests
//! without making real network requests. Responses are scripted up front
//! and every call is recorded so tests can assert on what was sent.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::error::ExchangeError;
use crate::trading::OrderRequest;

use super::types::{OrderAck, TradingPair};
use super::Exchange;

#[derive(Debug, Default)]
struct MockState {
    balance: Option<Result<Decimal, ExchangeError>>,
    listings: VecDeque<Result<Vec<TradingPair>, ExchangeError>>,
    last_listing: Option<Result<Vec<TradingPair>, ExchangeError>>,
    order_replies: VecDeque<Result<OrderAck, ExchangeError>>,
    balance_calls: usize,
    listing_calls: usize,
    placed: Vec<OrderRequest>,
    next_id: u64,
}

/// Mock exchange for testing.
#[derive(Debug, Clone, Default)]
pub struct MockExchange {
    state: Arc<Mutex<MockState>>,
}

impl MockExchange {
    /// Create an empty mock. Balance and listing calls fail until scripted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a builder.
    pub fn builder() -> MockExchangeBuilder {
        MockExchangeBuilder::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Orders received so far, in call order.
    pub fn placed_orders(&self) -> Vec<OrderRequest> {
        self.state().placed.clone()
    }

    /// Number of balance queries made.
    pub fn balance_calls(&self) -> usize {
        self.state().balance_calls
    }

    /// Number of listing fetches made.
    pub fn listing_calls(&self) -> usize {
        self.state().listing_calls
    }
}

#[async_trait]
impl Exchange for MockExchange {
    async fn available_balance(&self, asset: &str) -> Result<Decimal, ExchangeError> {
        let mut state = self.state();
        state.balance_calls += 1;
        state.balance.clone().unwrap_or_else(|| {
            Err(ExchangeError::Transport {
                endpoint: format!("/api/user/balances/{}", asset),
                reason: "mock balance not configured".to_string(),
            })
        })
    }

    async fn list_pairs(&self) -> Result<Vec<TradingPair>, ExchangeError> {
        let mut state = self.state();
        state.listing_calls += 1;

        // Scripted listings are served in order; the last one repeats.
        if let Some(next) = state.listings.pop_front() {
            state.last_listing = Some(next);
        }

        state.last_listing.clone().unwrap_or_else(|| {
            Err(ExchangeError::Transport {
                endpoint: "/api/symbols".to_string(),
                reason: "mock listing not configured".to_string(),
            })
        })
    }

    async fn place_order(&self, order: &OrderRequest) -> Result<OrderAck, ExchangeError> {
        let mut state = self.state();
        state.placed.push(order.clone());

        match state.order_replies.pop_front() {
            Some(reply) => reply,
            None => {
                state.next_id += 1;
                Ok(OrderAck {
                    order_id: format!("mock-{}", state.next_id),
                })
            }
        }
    }
}

/// Builder for scripting a [`MockExchange`].
#[derive(Debug, Default)]
pub struct MockExchangeBuilder {
    state: MockState,
}

impl MockExchangeBuilder {
    /// Balance every balance query returns.
    pub fn balance(mut self, balance: Decimal) -> Self {
        self.state.balance = Some(Ok(balance));
        self
    }

    /// Make balance queries fail.
    pub fn balance_error(mut self, error: ExchangeError) -> Self {
        self.state.balance = Some(Err(error));
        self
    }

    /// Queue a listing response.
    pub fn listing(mut self, pairs: Vec<TradingPair>) -> Self {
        self.state.listings.push_back(Ok(pairs));
        self
    }

    /// Queue a failed listing response.
    pub fn listing_error(mut self, error: ExchangeError) -> Self {
        self.state.listings.push_back(Err(error));
        self
    }

    /// Queue an accepted order with a given id.
    pub fn accept(mut self, order_id: impl Into<String>) -> Self {
        self.state.order_replies.push_back(Ok(OrderAck {
            order_id: order_id.into(),
        }));
        self
    }

    /// Queue a failed order submission.
    pub fn reject(mut self, error: ExchangeError) -> Self {
        self.state.order_replies.push_back(Err(error));
        self
    }

    /// Build the mock.
    pub fn build(self) -> MockExchange {
        MockExchange {
            state: Arc::new(Mutex::new(self.state)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn mock_balance() {
        let exchange = MockExchange::builder().balance(dec!(100.50)).build();
        assert_eq!(exchange.available_balance("USDT").await.unwrap(), dec!(100.50));
        assert_eq!(exchange.balance_calls(), 1);
    }

    #[tokio::test]
    async fn unconfigured_mock_fails() {
        let exchange = MockExchange::new();
        assert!(exchange.available_balance("USDT").await.is_err());
        assert!(exchange.list_pairs().await.is_err());
    }

    #[tokio::test]
    async fn last_listing_repeats() {
        let exchange = MockExchange::builder()
            .listing(vec![TradingPair::new("AAUSDT", "USDT", dec!(0.5))])
            .listing(vec![TradingPair::new("AAUSDT", "USDT", dec!(0.52))])
            .build();

        assert_eq!(exchange.list_pairs().await.unwrap()[0].bid, Some(dec!(0.5)));
        assert_eq!(exchange.list_pairs().await.unwrap()[0].bid, Some(dec!(0.52)));
        assert_eq!(exchange.list_pairs().await.unwrap()[0].bid, Some(dec!(0.52)));
        assert_eq!(exchange.listing_calls(), 3);
    }

    #[tokio::test]
    async fn scripted_order_replies_then_defaults() {
        let exchange = MockExchange::builder()
            .accept("first")
            .reject(ExchangeError::Status {
                endpoint: "/api/orders".to_string(),
                status: 422,
                body: "lot size".to_string(),
            })
            .build();

        let order = OrderRequest::limit_buy("AAUSDT", dec!(0.49), dec!(1));
        assert_eq!(exchange.place_order(&order).await.unwrap().order_id, "first");
        assert!(exchange.place_order(&order).await.is_err());
        assert_eq!(exchange.place_order(&order).await.unwrap().order_id, "mock-1");
        assert_eq!(exchange.placed_orders().len(), 3);
    }
}
