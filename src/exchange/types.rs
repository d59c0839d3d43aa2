//! Exchange payload types and the normalization applied at ingestion.
//!
//! The exchange is loose about response shapes: bodies may or may not be
//! wrapped in a `result` envelope, numbers arrive as strings or JSON numbers,
//! and the best bid of a pair is published under one of several names.
//! Everything here converts those shapes into the canonical types the rest of
//! the crate works with, so strategy code never looks at raw JSON.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Field names carrying a pair's best bid, in priority order.
pub const BID_FIELDS: [&str; 3] = ["bid", "bestBid", "highestBid"];

/// A tradable pair as seen in one listing snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradingPair {
    /// Pair symbol (e.g. "TRXUSDT").
    pub symbol: String,
    /// Quote asset (e.g. "USDT").
    pub quote: String,
    /// Best bid, if the listing carried a usable one.
    pub bid: Option<Decimal>,
}

impl TradingPair {
    /// Create a pair with a known bid.
    pub fn new(symbol: impl Into<String>, quote: impl Into<String>, bid: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            quote: quote.into(),
            bid: Some(bid),
        }
    }

    /// Create a pair listed without a usable bid.
    pub fn without_bid(symbol: impl Into<String>, quote: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            quote: quote.into(),
            bid: None,
        }
    }

    /// Build a pair from one raw listing entry.
    ///
    /// Returns `None` when the entry is not an object or has no symbol.
    /// The first bid field that is present wins; if its value is not a
    /// positive number the pair is kept with no bid rather than falling
    /// through to the next field.
    pub fn from_value(entry: &Value) -> Option<Self> {
        let obj = entry.as_object()?;
        let symbol = obj.get("symbol").and_then(Value::as_str)?.to_string();
        let quote = obj
            .get("quote")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let raw_bid = BID_FIELDS
            .iter()
            .filter_map(|field| obj.get(*field))
            .find(|v| is_present(v));

        let bid = match raw_bid {
            Some(raw) => match parse_decimal(raw) {
                Some(price) if price > Decimal::ZERO => Some(price),
                _ => {
                    debug!(symbol = %symbol, raw = %raw, "Ignoring unusable bid");
                    None
                }
            },
            None => None,
        };

        Some(Self { symbol, quote, bid })
    }
}

/// Normalize a `/api/symbols` body into pairs, preserving listing order.
///
/// Entries that cannot be read as a pair are dropped. A body that is not a
/// list at all is an error.
pub fn normalize_listing(body: &Value) -> Result<Vec<TradingPair>, String> {
    let entries = body
        .as_array()
        .ok_or_else(|| format!("expected a list of symbols, got {}", value_type(body)))?;

    let pairs: Vec<TradingPair> = entries.iter().filter_map(TradingPair::from_value).collect();

    if pairs.len() < entries.len() {
        debug!(
            dropped = entries.len() - pairs.len(),
            "Dropped malformed listing entries"
        );
    }

    Ok(pairs)
}

/// Read the `available` amount out of a balance body.
pub fn parse_available_balance(body: &Value) -> Result<Decimal, String> {
    let raw = body
        .get("available")
        .ok_or_else(|| "missing field `available`".to_string())?;

    let balance =
        parse_decimal(raw).ok_or_else(|| format!("`available` is not numeric: {}", raw))?;

    if balance < Decimal::ZERO {
        return Err(format!("`available` is negative: {}", balance));
    }

    Ok(balance)
}

/// Exchange acknowledgment of a created order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderAck {
    /// Identifier assigned by the exchange.
    pub order_id: String,
}

impl OrderAck {
    /// Read the order id out of an order-creation body.
    pub fn from_value(body: &Value) -> Result<Self, String> {
        let order_id = match body.get("id") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(other) => return Err(format!("unusable order id: {}", other)),
            None => return Err("missing field `id`".to_string()),
        };
        Ok(Self { order_id })
    }
}

/// Strip the optional `{"result": ...}` envelope.
pub fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut obj) if obj.contains_key("result") => {
            obj.remove("result").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Parse a JSON string or number into a decimal.
pub fn parse_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => parse_decimal_str(s.trim()),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else if let Some(u) = n.as_u64() {
                Some(Decimal::from(u))
            } else {
                parse_decimal_str(&n.to_string())
            }
        }
        _ => None,
    }
}

fn parse_decimal_str(s: &str) -> Option<Decimal> {
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

fn value_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn bid_field_priority() {
        let pair = TradingPair::from_value(&json!({
            "symbol": "AAUSDT", "quote": "USDT", "bestBid": "0.41", "highestBid": 0.39
        }))
        .unwrap();
        assert_eq!(pair.bid, Some(dec!(0.41)));

        let pair = TradingPair::from_value(&json!({
            "symbol": "AAUSDT", "quote": "USDT", "bid": 0.5, "bestBid": "0.41"
        }))
        .unwrap();
        assert_eq!(pair.bid, Some(dec!(0.5)));
    }

    #[test]
    fn null_and_empty_bids_fall_through() {
        let pair = TradingPair::from_value(&json!({
            "symbol": "AAUSDT", "quote": "USDT", "bid": null, "bestBid": "", "highestBid": "0.3"
        }))
        .unwrap();
        assert_eq!(pair.bid, Some(dec!(0.3)));
    }

    #[test]
    fn malformed_first_bid_does_not_fall_through() {
        let pair = TradingPair::from_value(&json!({
            "symbol": "AAUSDT", "quote": "USDT", "bid": "n/a", "bestBid": "0.41"
        }))
        .unwrap();
        assert_eq!(pair.bid, None);
    }

    #[test]
    fn non_positive_bid_is_unusable() {
        let pair = TradingPair::from_value(&json!({
            "symbol": "ZZUSDT", "quote": "USDT", "bid": "0"
        }))
        .unwrap();
        assert_eq!(pair.bid, None);
    }

    #[test]
    fn listing_drops_unreadable_entries() {
        let body = json!([
            {"symbol": "AAUSDT", "quote": "USDT", "bid": "0.5"},
            "garbage",
            {"quote": "USDT", "bid": "0.1"},
            {"symbol": "BBKZT", "quote": "KZT"}
        ]);
        let pairs = normalize_listing(&body).unwrap();
        assert_eq!(
            pairs,
            vec![
                TradingPair::new("AAUSDT", "USDT", dec!(0.5)),
                TradingPair::without_bid("BBKZT", "KZT"),
            ]
        );
    }

    #[test]
    fn listing_must_be_a_list() {
        let err = normalize_listing(&json!({"symbols": []})).unwrap_err();
        assert_eq!(err, "expected a list of symbols, got an object");
    }

    #[test]
    fn envelope_is_optional() {
        let wrapped = json!({"status": true, "result": {"available": "12.5"}});
        let bare = json!({"available": "12.5"});
        assert_eq!(unwrap_envelope(wrapped), unwrap_envelope(bare.clone()));
        assert_eq!(unwrap_envelope(bare.clone()), bare);
    }

    #[test]
    fn available_balance_accepts_strings_and_numbers() {
        assert_eq!(
            parse_available_balance(&json!({"available": "100.25"})).unwrap(),
            dec!(100.25)
        );
        assert_eq!(
            parse_available_balance(&json!({"available": 42})).unwrap(),
            dec!(42)
        );
        assert_eq!(
            parse_available_balance(&json!({"available": 0.5})).unwrap(),
            dec!(0.5)
        );
    }

    #[test]
    fn available_balance_failures() {
        assert!(parse_available_balance(&json!({"total": "1"})).is_err());
        assert!(parse_available_balance(&json!({"available": "lots"})).is_err());
        assert!(parse_available_balance(&json!({"available": "-1"})).is_err());
    }

    #[test]
    fn order_ack_ids() {
        assert_eq!(
            OrderAck::from_value(&json!({"id": "abc-1"})).unwrap().order_id,
            "abc-1"
        );
        assert_eq!(
            OrderAck::from_value(&json!({"id": 987654})).unwrap().order_id,
            "987654"
        );
        assert!(OrderAck::from_value(&json!({"status": "ok"})).is_err());
        assert!(OrderAck::from_value(&json!({"id": ""})).is_err());
    }

    #[test]
    fn parse_decimal_scientific() {
        assert_eq!(parse_decimal(&json!("1e-3")), Some(dec!(0.001)));
        assert_eq!(parse_decimal(&json!(true)), None);
    }
}
