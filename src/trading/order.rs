//! Order types and creation.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy order.
    #[strum(to_string = "buy", serialize = "BUY")]
    Buy,
}

/// Order type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// Rests on the book at the given price or better.
    #[default]
    #[strum(to_string = "limit", serialize = "LIMIT")]
    Limit,
}

/// Body of `POST /api/orders`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRequest {
    /// Pair symbol.
    pub symbol: String,
    /// Order side.
    pub side: Side,
    /// Order type.
    #[serde(rename = "type")]
    pub order_type: OrderType,
    /// Limit price.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Base-asset quantity.
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
}

impl OrderRequest {
    /// Create a limit buy order.
    pub fn limit_buy(symbol: impl Into<String>, price: Decimal, quantity: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            side: Side::Buy,
            order_type: OrderType::Limit,
            price,
            quantity,
        }
    }

    /// Round the price to `decimals` places, midpoints away from zero.
    pub fn with_price_decimals(mut self, decimals: u32) -> Self {
        self.price = round_price(self.price, decimals);
        self
    }

    /// Quote-asset amount this order commits.
    pub fn notional(&self) -> Decimal {
        self.price * self.quantity
    }

    /// Validate order parameters.
    pub fn validate(&self) -> Result<(), String> {
        if self.symbol.is_empty() {
            return Err("symbol is required".to_string());
        }
        if self.price <= Decimal::ZERO {
            return Err(format!("price must be positive, got {}", self.price));
        }
        if self.quantity <= Decimal::ZERO {
            return Err(format!("quantity must be positive, got {}", self.quantity));
        }
        Ok(())
    }
}

/// Round a price the way the exchange expects it quoted.
///
/// Exact decimal halves round away from zero, so a 0.475 level is sent as
/// 0.48. Rounding the nearest binary float instead would give 0.47.
pub fn round_price(price: Decimal, decimals: u32) -> Decimal {
    price.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero)
}

/// Status recorded for an accepted order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    /// Accepted by the exchange, not yet tracked further.
    #[strum(to_string = "NEW", serialize = "new")]
    New,
}

/// An order the exchange accepted, as written to the orders file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptedOrder {
    /// Exchange-assigned identifier.
    pub order_id: String,
    /// Status at acceptance.
    pub status: OrderStatus,
}

impl AcceptedOrder {
    /// Record a freshly accepted order.
    pub fn new(order_id: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
            status: OrderStatus::New,
        }
    }
}
