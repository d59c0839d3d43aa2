//! Price ladder planning.
//!
//! A ladder is one limit buy per configured discount below the current best
//! bid. With the default discounts of 2%, 5% and 8% a bid of 0.50 gives
//! levels 0.49, 0.475 and 0.46.
//!
//! The quantity is shared by every level and sized against the *bid*, not
//! the level price: `balance / (levels * bid)`. Because every level is below
//! the bid the unrounded ladder always costs less than the balance, but the
//! submitted prices are rounded, so [`LadderPlan::fits_balance`] is exposed
//! for callers that want to check the rounded ladder.

use rust_decimal::Decimal;
use tracing::{debug, info, instrument};

use crate::config::Config;
use crate::error::{BotError, PlanError};
use crate::exchange::{Exchange, TradingPair};
use crate::trading::OrderRequest;

/// Derives ladder prices and size from a bid.
#[derive(Debug, Clone)]
pub struct PricePlanner {
    discounts: Vec<Decimal>,
    price_decimals: u32,
}

/// A fully priced ladder for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct LadderPlan {
    /// Pair the ladder is placed on.
    pub symbol: String,
    /// Bid the levels were derived from.
    pub bid: Decimal,
    /// Unrounded level prices, strictly decreasing.
    pub levels: Vec<Decimal>,
    /// Quantity shared by every level.
    pub quantity: Decimal,
    /// Decimal places submitted prices are rounded to.
    pub price_decimals: u32,
}

impl PricePlanner {
    /// Create a planner from discount fractions (0.02 = 2% below bid).
    pub fn new(discounts: Vec<Decimal>, price_decimals: u32) -> Self {
        Self {
            discounts,
            price_decimals,
        }
    }

    /// Create a planner from config.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.ladder_discounts.clone(), config.price_decimals)
    }

    /// Price multipliers, `1 - discount` each.
    pub fn multipliers(&self) -> Vec<Decimal> {
        self.discounts.iter().map(|d| Decimal::ONE - d).collect()
    }

    /// Level prices for a bid, in discount order.
    pub fn levels(&self, bid: Decimal) -> Vec<Decimal> {
        self.multipliers().into_iter().map(|m| bid * m).collect()
    }

    /// Find the bid for `symbol` in a listing.
    pub fn locate_bid(pairs: &[TradingPair], symbol: &str) -> Result<Decimal, PlanError> {
        let pair = pairs
            .iter()
            .find(|p| p.symbol == symbol)
            .ok_or_else(|| PlanError::SymbolNotListed {
                symbol: symbol.to_string(),
            })?;

        pair.bid.ok_or_else(|| PlanError::MissingBid {
            symbol: symbol.to_string(),
        })
    }

    /// Re-fetch the listing and read the current bid for `symbol`.
    ///
    /// The listing is fetched again rather than reusing the one the pair was
    /// selected from; each fetch is treated as the current truth.
    #[instrument(skip(self, exchange))]
    pub async fn fetch_bid<E>(&self, exchange: &E, symbol: &str) -> Result<Decimal, BotError>
    where
        E: Exchange + ?Sized,
    {
        let pairs = exchange.list_pairs().await?;
        for pair in &pairs {
            debug!(symbol = %pair.symbol, quote = %pair.quote, bid = ?pair.bid, "Checking pair");
        }

        let bid = Self::locate_bid(&pairs, symbol)?;
        info!(symbol = %symbol, bid = %bid, "Highest bid");
        Ok(bid)
    }

    /// Build a ladder for `symbol` funded by `balance`.
    pub fn plan(
        &self,
        symbol: impl Into<String>,
        bid: Decimal,
        balance: Decimal,
    ) -> Result<LadderPlan, PlanError> {
        let symbol = symbol.into();

        if self.discounts.is_empty() {
            return Err(PlanError::EmptyLadder);
        }
        if bid <= Decimal::ZERO {
            return Err(PlanError::MissingBid { symbol });
        }

        let levels = self.levels(bid);
        let quantity = Decimal::from(levels.len())
            .checked_mul(bid)
            .and_then(|cost| balance.checked_div(cost))
            .ok_or_else(|| PlanError::QuantityOverflow {
                symbol: symbol.clone(),
            })?;

        Ok(LadderPlan {
            symbol,
            bid,
            levels,
            quantity,
            price_decimals: self.price_decimals,
        })
    }
}

impl LadderPlan {
    /// Orders to submit, prices rounded, in level order.
    pub fn orders(&self) -> Vec<OrderRequest> {
        self.levels
            .iter()
            .map(|price| {
                OrderRequest::limit_buy(self.symbol.clone(), *price, self.quantity)
                    .with_price_decimals(self.price_decimals)
            })
            .collect()
    }

    /// Quote-asset total of the rounded ladder, if every order filled.
    pub fn notional(&self) -> Decimal {
        self.orders().iter().map(OrderRequest::notional).sum()
    }

    /// Whether the rounded ladder can be paid for out of `balance`.
    pub fn fits_balance(&self, balance: Decimal) -> bool {
        self.notional() <= balance
    }

    /// Whether every unrounded level sits strictly below the bid.
    pub fn levels_below_bid(&self) -> bool {
        self.levels.iter().all(|level| *level < self.bid)
    }
}
