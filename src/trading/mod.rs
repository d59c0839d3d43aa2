//! Trading module for order management and execution.
//!
//! This module handles:
//! - Order types and creation
//! - Order submission
//! - The orders file

pub mod execution;
pub mod journal;
pub mod order;

pub use execution::{OrderSubmitter, RejectedOrder, SubmissionReport};
pub use journal::OrderBatch;
pub use order::{AcceptedOrder, OrderRequest, OrderStatus, OrderType, Side};
