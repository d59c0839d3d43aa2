//! Application configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;
use url::Url;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Exchange Credentials ===
    /// API key sent as `X-API-Key` on every request.
    #[serde(default)]
    pub ataix_api_key: String,

    /// REST API base URL.
    #[serde(default = "default_base_url")]
    pub ataix_base_url: String,

    // === Strategy Parameters ===
    /// Asset whose available balance funds the ladder.
    #[serde(default = "default_asset")]
    pub balance_asset: String,

    /// Quote asset a pair must have to be eligible.
    #[serde(default = "default_asset")]
    pub quote_asset: String,

    /// Highest bid a pair may show to be selected (inclusive).
    #[serde(default = "default_max_bid_price")]
    pub max_bid_price: Decimal,

    /// Fractions below the bid, one order per entry (e.g. 0.02 = -2%).
    #[serde(default = "default_ladder_discounts")]
    pub ladder_discounts: Vec<Decimal>,

    /// Decimal places the submitted price is rounded to.
    #[serde(default = "default_price_decimals")]
    pub price_decimals: u32,

    // === Execution ===
    /// Per-request timeout in seconds.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    /// Pause after the last submission, in milliseconds.
    #[serde(default = "default_settle_pause")]
    pub settle_pause_ms: u64,

    /// Where accepted orders are written.
    #[serde(default = "default_orders_file")]
    pub orders_file: PathBuf,

    /// Plan only, submit nothing.
    #[serde(default)]
    pub dry_run: bool,
}

fn default_base_url() -> String {
    "https://api.ataix.kz".to_string()
}

fn default_asset() -> String {
    "USDT".to_string()
}

fn default_max_bid_price() -> Decimal {
    Decimal::new(6, 1) // 0.6
}

fn default_ladder_discounts() -> Vec<Decimal> {
    vec![
        Decimal::new(2, 2), // -2%
        Decimal::new(5, 2), // -5%
        Decimal::new(8, 2), // -8%
    ]
}

fn default_price_decimals() -> u32 {
    2
}

fn default_http_timeout() -> u64 {
    20
}

fn default_settle_pause() -> u64 {
    1000
}

fn default_orders_file() -> PathBuf {
    PathBuf::from("orders.json")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ataix_api_key: String::new(),
            ataix_base_url: default_base_url(),
            balance_asset: default_asset(),
            quote_asset: default_asset(),
            max_bid_price: default_max_bid_price(),
            ladder_discounts: default_ladder_discounts(),
            price_decimals: default_price_decimals(),
            http_timeout_secs: default_http_timeout(),
            settle_pause_ms: default_settle_pause(),
            orders_file: default_orders_file(),
            dry_run: false,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.ataix_api_key.trim().is_empty() {
            return Err("ATAIX_API_KEY is required".to_string());
        }

        if let Err(e) = Url::parse(&self.ataix_base_url) {
            return Err(format!("ATAIX_BASE_URL is not a valid URL: {}", e));
        }

        if self.max_bid_price <= Decimal::ZERO {
            return Err("MAX_BID_PRICE must be positive".to_string());
        }

        if self.ladder_discounts.is_empty() {
            return Err("LADDER_DISCOUNTS must list at least one discount".to_string());
        }

        if self
            .ladder_discounts
            .iter()
            .any(|d| *d <= Decimal::ZERO || *d >= Decimal::ONE)
        {
            return Err("LADDER_DISCOUNTS must all be between 0 and 1".to_string());
        }

        // Increasing discounts give strictly decreasing prices.
        if self.ladder_discounts.windows(2).any(|w| w[0] >= w[1]) {
            return Err("LADDER_DISCOUNTS must be strictly increasing".to_string());
        }

        if self.http_timeout_secs == 0 {
            return Err("HTTP_TIMEOUT_SECS must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.ataix_base_url.trim_end_matches('/')
    }

    /// Request timeout as a duration.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Post-submission pause as a duration.
    pub fn settle_pause(&self) -> Duration {
        Duration::from_millis(self.settle_pause_ms)
    }
}
