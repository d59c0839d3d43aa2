//! Pair selection: first listed pair under the bid threshold.

use rust_decimal::Decimal;
use tracing::{debug, info, instrument};

use crate::config::Config;
use crate::error::{BotError, SelectionError};
use crate::exchange::{Exchange, TradingPair};

/// Picks the pair a ladder is placed on.
///
/// Selection is "first eligible in listing order". It is not the cheapest
/// pair, and volume is not considered.
#[derive(Debug, Clone)]
pub struct PairSelector {
    quote_asset: String,
    max_bid: Decimal,
}

impl PairSelector {
    /// Create a selector for `quote_asset` pairs bidding at most `max_bid`.
    pub fn new(quote_asset: impl Into<String>, max_bid: Decimal) -> Self {
        Self {
            quote_asset: quote_asset.into(),
            max_bid,
        }
    }

    /// Create a selector from config.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.quote_asset.clone(), config.max_bid_price)
    }

    /// Check a single pair against quote asset and threshold.
    pub fn is_eligible(&self, pair: &TradingPair) -> bool {
        pair.quote == self.quote_asset && pair.bid.is_some_and(|bid| bid <= self.max_bid)
    }

    /// First eligible pair in listing order.
    pub fn select<'a>(&self, pairs: &'a [TradingPair]) -> Option<&'a TradingPair> {
        pairs.iter().find(|pair| self.is_eligible(pair))
    }

    /// Fetch the listing and select from it.
    #[instrument(skip(self, exchange), fields(quote = %self.quote_asset, max_bid = %self.max_bid))]
    pub async fn fetch_and_select<E>(&self, exchange: &E) -> Result<TradingPair, BotError>
    where
        E: Exchange + ?Sized,
    {
        let pairs = exchange.list_pairs().await?;
        debug!(count = pairs.len(), "Scanning listing");

        let pair = self
            .select(&pairs)
            .cloned()
            .ok_or_else(|| SelectionError::NoEligiblePair {
                quote: self.quote_asset.clone(),
                max_bid: self.max_bid,
            })?;

        info!(symbol = %pair.symbol, bid = ?pair.bid, "Selected trading pair");
        Ok(pair)
    }
}
