//! Unified error types for the ladder bot.

use rust_decimal::Decimal;
use strum::Display;
use thiserror::Error;

use crate::runner::RunStage;

/// Unified error type for the ladder bot.
#[derive(Error, Debug)]
pub enum BotError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// HTTP client could not be built.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Exchange request failed.
    #[error("exchange error: {0}")]
    Exchange(#[from] ExchangeError),

    /// No pair passed the selection filter.
    #[error("selection error: {0}")]
    Selection(#[from] SelectionError),

    /// Price ladder could not be derived.
    #[error("planning error: {0}")]
    Plan(#[from] PlanError),

    /// Trading/order error.
    #[error("trading error: {0}")]
    Trading(#[from] TradingError),

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// The two failure kinds an exchange call can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ErrorKind {
    /// Network failure, timeout or non-2xx response.
    #[strum(serialize = "transport")]
    Transport,
    /// Response arrived but a field was missing or malformed.
    #[strum(serialize = "data-shape")]
    DataShape,
}

/// Exchange HTTP errors.
#[derive(Error, Debug, Clone)]
pub enum ExchangeError {
    /// The request never produced a response.
    #[error("request to {endpoint} failed: {reason}")]
    Transport {
        /// Endpoint path that was called.
        endpoint: String,
        /// Underlying cause.
        reason: String,
    },

    /// The exchange answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}: {body}")]
    Status {
        /// Endpoint path that was called.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Response body, as text.
        body: String,
    },

    /// The response body did not have the expected shape.
    #[error("unexpected response from {endpoint}: {reason}")]
    DataShape {
        /// Endpoint path that was called.
        endpoint: String,
        /// What was wrong with the payload.
        reason: String,
    },
}

impl ExchangeError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExchangeError::Transport { .. } | ExchangeError::Status { .. } => ErrorKind::Transport,
            ExchangeError::DataShape { .. } => ErrorKind::DataShape,
        }
    }

    pub(crate) fn data_shape(endpoint: &str, reason: impl Into<String>) -> Self {
        ExchangeError::DataShape {
            endpoint: endpoint.to_string(),
            reason: reason.into(),
        }
    }
}

/// Pair selection errors.
#[derive(Error, Debug, Clone)]
pub enum SelectionError {
    /// Nothing in the listing matched quote asset and price threshold.
    #[error("no {quote} pair with bid <= {max_bid}")]
    NoEligiblePair {
        /// Required quote asset.
        quote: String,
        /// Price threshold.
        max_bid: Decimal,
    },
}

/// Price ladder planning errors.
#[derive(Error, Debug, Clone)]
pub enum PlanError {
    /// The selected symbol disappeared from the re-fetched listing.
    #[error("symbol {symbol} not found in listing")]
    SymbolNotListed {
        /// The symbol that was looked up.
        symbol: String,
    },

    /// The symbol is listed without a usable bid.
    #[error("no bid price for {symbol}")]
    MissingBid {
        /// The symbol that was looked up.
        symbol: String,
    },

    /// No discounts were configured.
    #[error("ladder has no levels")]
    EmptyLadder,

    /// The order quantity for this bid and balance is out of `Decimal` range.
    #[error("order quantity for {symbol} is out of range")]
    QuantityOverflow {
        /// The symbol being planned.
        symbol: String,
    },
}

/// Order submission errors.
#[derive(Error, Debug, Clone)]
pub enum TradingError {
    /// Order failed local validation and was never sent.
    #[error("invalid order parameters: {0}")]
    InvalidParams(String),

    /// The exchange did not accept the order.
    #[error("order submission failed: {0}")]
    Submission(#[from] ExchangeError),
}

/// Terminal failure of a run, with the last stage that was reached.
#[derive(Error, Debug)]
#[error("run aborted after {stage}: {source}")]
pub struct RunAbort {
    /// Last stage completed before the failure.
    pub stage: RunStage,
    /// Cause of the abort.
    #[source]
    pub source: BotError,
}

impl RunAbort {
    pub(crate) fn new(stage: RunStage, source: impl Into<BotError>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, BotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_count_as_transport() {
        let err = ExchangeError::Status {
            endpoint: "/api/orders".to_string(),
            status: 400,
            body: "bad request".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[test]
    fn data_shape_kind() {
        let err = ExchangeError::data_shape("/api/symbols", "expected a list");
        assert_eq!(err.kind(), ErrorKind::DataShape);
        assert_eq!(
            err.to_string(),
            "unexpected response from /api/symbols: expected a list"
        );
    }

    #[test]
    fn abort_names_the_stage() {
        let abort = RunAbort::new(
            RunStage::BalanceOk,
            SelectionError::NoEligiblePair {
                quote: "USDT".to_string(),
                max_bid: Decimal::new(6, 1),
            },
        );
        assert_eq!(
            abort.to_string(),
            "run aborted after BALANCE_OK: selection error: no USDT pair with bid <= 0.6"
        );
    }
}
