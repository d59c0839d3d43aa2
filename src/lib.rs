//! Discounted limit-buy ladder for ATAIX USDT pairs.
//!
//! One run checks the available USDT balance, picks the first USDT pair whose
//! best bid is at or below a threshold, and places a few limit buys below
//! that bid, splitting the balance evenly between them:
//!
//! ```text
//! Balance:   100 USDT
//! Pair:      AAUSDT, bid 0.50
//! ─────────────────────────────
//! Level 1:   0.49  (-2%)
//! Level 2:   0.475 (-5%)  submitted as 0.48
//! Level 3:   0.46  (-8%)
//! Quantity:  100 / (3 × 0.50) = 66.67 each
//! ```
//!
//! Accepted orders are written to `orders.json`.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`exchange`]: Exchange trait, REST client and mock
//! - [`strategy`]: Pair selection and ladder pricing
//! - [`trading`]: Order types, submission and the orders file
//! - [`runner`]: The run pipeline

pub mod config;
pub mod error;
pub mod exchange;
pub mod runner;
pub mod strategy;
pub mod trading;

pub use config::Config;
pub use error::{BotError, Result, RunAbort};
pub use runner::{LadderRunner, RunReport, RunStage};
