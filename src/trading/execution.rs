//! Order submission.

use std::time::Duration;

use rust_decimal::Decimal;
use tokio::time::sleep;
use tracing::{info, instrument, warn};

use super::journal::OrderBatch;
use super::order::{AcceptedOrder, OrderRequest};
use crate::config::Config;
use crate::error::TradingError;
use crate::exchange::Exchange;
use crate::strategy::LadderPlan;

/// An order that was not accepted, kept for reporting.
#[derive(Debug, Clone)]
pub struct RejectedOrder {
    /// Position of the order in the ladder (0-based).
    pub level: usize,
    /// Price that was submitted.
    pub price: Decimal,
    /// Why it failed.
    pub error: TradingError,
}

/// Result of submitting a whole ladder.
#[derive(Debug, Clone, Default)]
pub struct SubmissionReport {
    /// Accepted orders, in submission order.
    pub accepted: OrderBatch,
    /// Orders that were rejected or never sent.
    pub rejected: Vec<RejectedOrder>,
}

/// Submits ladder orders one at a time.
#[derive(Debug, Clone)]
pub struct OrderSubmitter {
    settle_pause: Duration,
}

impl OrderSubmitter {
    /// Create a submitter that pauses `settle_pause` after the last order.
    pub fn new(settle_pause: Duration) -> Self {
        Self { settle_pause }
    }

    /// Create a submitter from config.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.settle_pause())
    }

    /// Submit a single order.
    #[instrument(skip(exchange, order), fields(symbol = %order.symbol, price = %order.price))]
    pub async fn submit_order<E>(
        exchange: &E,
        order: &OrderRequest,
    ) -> Result<AcceptedOrder, TradingError>
    where
        E: Exchange + ?Sized,
    {
        order.validate().map_err(TradingError::InvalidParams)?;

        let ack = exchange.place_order(order).await?;

        info!(
            order_id = %ack.order_id,
            quantity = %order.quantity,
            "Order submitted successfully"
        );

        Ok(AcceptedOrder::new(ack.order_id))
    }

    /// Submit every order of the ladder in level order.
    ///
    /// A failed order is logged and skipped; it never stops the remaining
    /// levels and is not retried.
    #[instrument(skip(self, exchange, plan), fields(symbol = %plan.symbol, levels = plan.levels.len()))]
    pub async fn submit_ladder<E>(&self, exchange: &E, plan: &LadderPlan) -> SubmissionReport
    where
        E: Exchange + ?Sized,
    {
        let mut report = SubmissionReport::default();

        for (level, order) in plan.orders().into_iter().enumerate() {
            match Self::submit_order(exchange, &order).await {
                Ok(accepted) => {
                    info!(level = level + 1, order_id = %accepted.order_id, "Order placed");
                    report.accepted.push(accepted);
                }
                Err(error) => {
                    warn!(level = level + 1, price = %order.price, error = %error, "Order not placed");
                    report.rejected.push(RejectedOrder {
                        level,
                        price: order.price,
                        error,
                    });
                }
            }
        }

        if !self.settle_pause.is_zero() {
            sleep(self.settle_pause).await;
        }

        report
    }
}
