//! Defines the static advice catalog trait.

use serde::{Deserialize, Serialize};

use crate::Error;

/// A tip from the static advice catalog.
///
/// Unlike the tips derived from ledger aggregates, catalog tips carry a topic
/// category and are drawn at random, outside the scoring engine's determinism
/// contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdviceTip {
    /// A short headline for the tip.
    pub title: String,
    /// The advice itself.
    pub content: String,
    /// The topic the tip covers, e.g. "Credit Score".
    pub category: Option<String>,
}

/// A read-only catalog of general financial advice.
pub trait AdviceStore {
    /// Draw up to `count` tips at random from the catalog.
    fn random_tips(&self, count: u32) -> Result<Vec<AdviceTip>, Error>;
}
