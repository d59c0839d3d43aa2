//! Strategy module: which pair to buy and at what prices.
//!
//! This module handles:
//! - Pair selection against quote asset and bid threshold
//! - Ladder pricing and sizing from the current bid

pub mod planner;
pub mod selector;

pub use planner::{LadderPlan, PricePlanner};
pub use selector::PairSelector;
