//! The orders file: accepted orders written once at the end of a run.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::Serializer;
use tracing::{info, instrument};

use super::order::AcceptedOrder;
use crate::error::Result;

/// Accepted orders of one run, in submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderBatch {
    orders: Vec<AcceptedOrder>,
}

impl OrderBatch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an accepted order.
    pub fn push(&mut self, order: AcceptedOrder) {
        self.orders.push(order);
    }

    /// Number of accepted orders.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// True if nothing was accepted.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Iterate in submission order.
    pub fn iter(&self) -> std::slice::Iter<'_, AcceptedOrder> {
        self.orders.iter()
    }

    /// Write the batch to `path` as 4-space indented JSON, replacing any
    /// existing file.
    #[instrument(skip(self), fields(count = self.len()))]
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = Serializer::with_formatter(&mut writer, formatter);
        self.serialize(&mut serializer)?;

        writer.flush()?;
        info!(path = %path.display(), "Orders saved");
        Ok(())
    }

    /// Read a batch previously written by [`OrderBatch::save`].
    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

impl From<Vec<AcceptedOrder>> for OrderBatch {
    fn from(orders: Vec<AcceptedOrder>) -> Self {
        Self { orders }
    }
}

impl<'a> IntoIterator for &'a OrderBatch {
    type Item = &'a AcceptedOrder;
    type IntoIter = std::slice::Iter<'a, AcceptedOrder>;

    fn into_iter(self) -> Self::IntoIter {
        self.orders.iter()
    }
}
