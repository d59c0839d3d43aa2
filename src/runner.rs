//! One ladder run, start to finish.
//!
//! ```text
//! START -> BALANCE_OK -> PAIR_SELECTED -> BID_KNOWN -> ORDERS_SUBMITTED(n) -> SAVED -> END
//! ```
//!
//! Any failure before `BID_KNOWN` aborts the run before an order is sent.
//! Order failures only drop the affected order, and a failed save is logged
//! but does not fail the run.

use std::fmt;
use std::path::PathBuf;

use rust_decimal::Decimal;
use tracing::{error, info, instrument, warn};

use crate::config::Config;
use crate::error::RunAbort;
use crate::exchange::Exchange;
use crate::strategy::{LadderPlan, PairSelector, PricePlanner};
use crate::trading::{OrderBatch, OrderSubmitter, RejectedOrder};

/// Stages of a run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    /// Nothing done yet.
    Start,
    /// Balance is known.
    BalanceOk,
    /// A pair passed the selection filter.
    PairSelected,
    /// The pair's current bid is known and the ladder is priced.
    BidKnown,
    /// Orders were submitted; carries the number accepted.
    OrdersSubmitted(usize),
    /// The orders file was written.
    Saved,
    /// Run complete.
    End,
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStage::Start => write!(f, "START"),
            RunStage::BalanceOk => write!(f, "BALANCE_OK"),
            RunStage::PairSelected => write!(f, "PAIR_SELECTED"),
            RunStage::BidKnown => write!(f, "BID_KNOWN"),
            RunStage::OrdersSubmitted(n) => write!(f, "ORDERS_SUBMITTED({})", n),
            RunStage::Saved => write!(f, "SAVED"),
            RunStage::End => write!(f, "END"),
        }
    }
}

/// What a run that got past planning did.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Available balance at the start of the run.
    pub balance: Decimal,
    /// The ladder that was (or in a dry run, would have been) placed.
    pub plan: LadderPlan,
    /// Accepted orders, in submission order.
    pub accepted: OrderBatch,
    /// Orders that were not accepted.
    pub rejected: Vec<RejectedOrder>,
    /// Where the batch was written, if the save succeeded.
    pub saved_to: Option<PathBuf>,
    /// True if nothing was submitted.
    pub dry_run: bool,
}

/// Drives the four pipeline stages against one exchange.
pub struct LadderRunner<E> {
    exchange: E,
    balance_asset: String,
    selector: PairSelector,
    planner: PricePlanner,
    submitter: OrderSubmitter,
    orders_file: PathBuf,
    dry_run: bool,
}

impl<E: Exchange> LadderRunner<E> {
    /// Wire the pipeline from config.
    pub fn new(exchange: E, config: &Config) -> Self {
        Self {
            exchange,
            balance_asset: config.balance_asset.clone(),
            selector: PairSelector::from_config(config),
            planner: PricePlanner::from_config(config),
            submitter: OrderSubmitter::from_config(config),
            orders_file: config.orders_file.clone(),
            dry_run: config.dry_run,
        }
    }

    /// Override dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Borrow the exchange.
    pub fn exchange(&self) -> &E {
        &self.exchange
    }

    /// Run the pipeline once.
    #[instrument(skip(self), fields(asset = %self.balance_asset, dry_run = self.dry_run))]
    pub async fn run(&self) -> Result<RunReport, RunAbort> {
        let balance = self
            .exchange
            .available_balance(&self.balance_asset)
            .await
            .map_err(|e| RunAbort::new(RunStage::Start, e))?;
        info!(balance = %balance, asset = %self.balance_asset, "Available balance");

        let pair = self
            .selector
            .fetch_and_select(&self.exchange)
            .await
            .map_err(|e| RunAbort::new(RunStage::BalanceOk, e))?;

        let bid = self
            .planner
            .fetch_bid(&self.exchange, &pair.symbol)
            .await
            .map_err(|e| RunAbort::new(RunStage::PairSelected, e))?;

        let plan = self
            .planner
            .plan(pair.symbol.clone(), bid, balance)
            .map_err(|e| RunAbort::new(RunStage::PairSelected, e))?;

        info!(
            symbol = %plan.symbol,
            levels = ?plan.levels,
            quantity = %plan.quantity,
            "Ladder planned"
        );

        if !plan.fits_balance(balance) {
            warn!(
                notional = %plan.notional(),
                balance = %balance,
                "Rounded ladder costs more than the available balance"
            );
        }

        if self.dry_run {
            info!(stage = %RunStage::BidKnown, "Dry run, no orders submitted");
            return Ok(RunReport {
                balance,
                plan,
                accepted: OrderBatch::new(),
                rejected: Vec::new(),
                saved_to: None,
                dry_run: true,
            });
        }

        let submission = self.submitter.submit_ladder(&self.exchange, &plan).await;
        info!(
            stage = %RunStage::OrdersSubmitted(submission.accepted.len()),
            rejected = submission.rejected.len(),
            "Ladder submitted"
        );

        let saved_to = match submission.accepted.save(&self.orders_file) {
            Ok(()) => {
                info!(stage = %RunStage::Saved, "Orders file written");
                Some(self.orders_file.clone())
            }
            Err(e) => {
                error!(path = %self.orders_file.display(), error = %e, "Failed to save orders");
                None
            }
        };

        info!(stage = %RunStage::End, accepted = submission.accepted.len(), "Run complete");

        Ok(RunReport {
            balance,
            plan,
            accepted: submission.accepted,
            rejected: submission.rejected,
            saved_to,
            dry_run: false,
        })
    }
}
