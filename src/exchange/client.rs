//! ATAIX REST API client.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::{RequestBuilder, StatusCode};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::error::{BotError, ExchangeError};
use crate::trading::OrderRequest;

use super::types::{normalize_listing, parse_available_balance, unwrap_envelope, OrderAck, TradingPair};
use super::Exchange;

/// Header carrying the static API key (`X-API-Key`).
pub const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-api-key");

const SYMBOLS_PATH: &str = "/api/symbols";
const ORDERS_PATH: &str = "/api/orders";

/// ATAIX REST API client.
#[derive(Debug, Clone)]
pub struct AtaixClient {
    /// HTTP client with auth headers and timeout baked in.
    http: reqwest::Client,
    /// Base URL without trailing slash.
    base_url: String,
}

impl AtaixClient {
    /// Create a new client from config.
    pub fn new(config: &Config) -> Result<Self, BotError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut api_key = HeaderValue::from_str(config.ataix_api_key.trim())
            .map_err(|_| BotError::InvalidConfig("ATAIX_API_KEY is not a valid header value".to_string()))?;
        api_key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, api_key);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.http_timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url().to_string(),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and return the body with any `result` envelope removed.
    async fn send(&self, path: &str, request: RequestBuilder) -> Result<Value, ExchangeError> {
        let response = request.send().await.map_err(|e| ExchangeError::Transport {
            endpoint: path.to_string(),
            reason: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(path, status, body));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ExchangeError::data_shape(path, format!("body is not JSON: {}", e)))?;

        Ok(unwrap_envelope(body))
    }

    async fn get_json(&self, path: &str) -> Result<Value, ExchangeError> {
        self.send(path, self.http.get(self.url(path))).await
    }
}

fn status_error(path: &str, status: StatusCode, body: String) -> ExchangeError {
    ExchangeError::Status {
        endpoint: path.to_string(),
        status: status.as_u16(),
        body,
    }
}

#[async_trait]
impl Exchange for AtaixClient {
    #[instrument(skip(self))]
    async fn available_balance(&self, asset: &str) -> Result<Decimal, ExchangeError> {
        let path = format!("/api/user/balances/{}", asset);
        let body = self.get_json(&path).await?;

        let balance =
            parse_available_balance(&body).map_err(|reason| ExchangeError::data_shape(&path, reason))?;

        debug!(balance = %balance, "Retrieved available balance");
        Ok(balance)
    }

    #[instrument(skip(self))]
    async fn list_pairs(&self) -> Result<Vec<TradingPair>, ExchangeError> {
        let body = self.get_json(SYMBOLS_PATH).await?;

        let pairs =
            normalize_listing(&body).map_err(|reason| ExchangeError::data_shape(SYMBOLS_PATH, reason))?;

        debug!(count = pairs.len(), "Retrieved pair listing");
        Ok(pairs)
    }

    #[instrument(skip(self, order), fields(symbol = %order.symbol, price = %order.price))]
    async fn place_order(&self, order: &OrderRequest) -> Result<OrderAck, ExchangeError> {
        let request = self.http.post(self.url(ORDERS_PATH)).json(order);
        let body = self.send(ORDERS_PATH, request).await?;

        debug!(response = %body, "Order response");

        OrderAck::from_value(&body).map_err(|reason| ExchangeError::data_shape(ORDERS_PATH, reason))
    }
}
