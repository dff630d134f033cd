// 5.0: the mark price store. the engine is agnostic to where prices come from;
// an oracle poller, a websocket push, or a test fixture all end up writing the
// same "latest known value per symbol" table. the store is owned by the engine
// and torn down with it. no process-wide cache.

use crate::types::{Price, Symbol, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Anything that can answer "what is the latest mark price for this symbol".
pub trait PriceSource {
    fn mark_price(&self, symbol: &Symbol) -> Option<Price>;
}

/// Latest observation for one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkPrice {
    pub price: Price,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Default)]
pub struct MarkPriceStore {
    latest: HashMap<Symbol, MarkPrice>,
}

impl MarkPriceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, symbol: Symbol, price: Price, at: Timestamp) {
        self.latest.insert(symbol, MarkPrice { price, updated_at: at });
    }

    /// Ingest a raw feed value. Zero and negative readings are dropped, which
    /// is what makes "price unavailable" and "price nonsense" the same case
    /// downstream: the symbol simply has no mark.
    pub fn record_raw(&mut self, symbol: Symbol, value: Decimal, at: Timestamp) -> Option<Price> {
        let price = Price::new(value)?;
        self.record(symbol, price, at);
        Some(price)
    }

    pub fn get(&self, symbol: &Symbol) -> Option<Price> {
        self.latest.get(symbol).map(|m| m.price)
    }

    pub fn observation(&self, symbol: &Symbol) -> Option<&MarkPrice> {
        self.latest.get(symbol)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.latest.keys()
    }

    pub fn len(&self) -> usize {
        self.latest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_empty()
    }
}

impl PriceSource for MarkPriceStore {
    fn mark_price(&self, symbol: &Symbol) -> Option<Price> {
        self.get(symbol)
    }
}
