// 7.1 engine/core.rs: main engine struct. book, ledger, price store, and the
// event log all live here. one owner, one mutation path.

use super::config::EngineConfig;
use crate::book::OrderBook;
use crate::events::{Event, EventId, EventPayload};
use crate::instrument::InstrumentRegistry;
use crate::ledger::{Position, PositionLedger};
use crate::order::Order;
use crate::price_store::MarkPriceStore;
use crate::types::{OrderId, PositionId, Symbol, Timestamp};

#[derive(Debug)]
pub struct Engine {
    pub(super) config: EngineConfig,
    pub(super) registry: InstrumentRegistry,
    pub(super) book: OrderBook,
    pub(super) ledger: PositionLedger,
    pub(super) prices: MarkPriceStore,
    pub(super) events: Vec<Event>,
    pub(super) next_event_id: u64,
    pub(super) next_order_id: u64,
    pub(super) current_time: Timestamp,
}

impl Engine {
    pub fn new(config: EngineConfig, registry: InstrumentRegistry) -> Self {
        Self {
            config,
            registry,
            book: OrderBook::new(),
            ledger: PositionLedger::new(),
            prices: MarkPriceStore::new(),
            events: Vec::new(),
            next_event_id: 1,
            next_order_id: 1,
            current_time: Timestamp::from_millis(0),
        }
    }

    /// Engine over the built-in market catalog.
    pub fn with_builtin_markets() -> Self {
        Self::new(EngineConfig::default(), InstrumentRegistry::builtin())
    }

    // the clock is data, not wall time, so tests replay any schedule they like
    pub fn set_time(&mut self, timestamp: Timestamp) {
        self.current_time = timestamp;
    }

    pub fn time(&self) -> Timestamp {
        self.current_time
    }

    pub fn advance_time(&mut self, millis: i64) {
        self.current_time = Timestamp::from_millis(self.current_time.as_millis() + millis);
    }

    pub fn registry(&self) -> &InstrumentRegistry {
        &self.registry
    }

    pub fn prices(&self) -> &MarkPriceStore {
        &self.prices
    }

    /// Resting orders, newest first; optionally narrowed to one instrument.
    pub fn orders<'a>(&'a self, symbol: Option<&'a Symbol>) -> Vec<&'a Order> {
        match symbol {
            Some(symbol) => self.book.by_instrument(symbol).collect(),
            None => self.book.iter().collect(),
        }
    }

    /// Open positions, newest first; optionally narrowed to one instrument.
    pub fn positions<'a>(&'a self, symbol: Option<&'a Symbol>) -> Vec<&'a Position> {
        match symbol {
            Some(symbol) => self.ledger.by_instrument(symbol).collect(),
            None => self.ledger.iter().collect(),
        }
    }

    pub fn get_order(&self, id: OrderId) -> Option<&Order> {
        self.book.get(id)
    }

    pub fn get_position(&self, id: PositionId) -> Option<&Position> {
        self.ledger.get(id)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn recent_events(&self, count: usize) -> &[Event] {
        let start = self.events.len().saturating_sub(count);
        &self.events[start..]
    }

    pub(super) fn next_order_id(&mut self) -> OrderId {
        let id = OrderId(self.next_order_id);
        self.next_order_id += 1;
        id
    }

    pub(super) fn emit_event(&mut self, payload: EventPayload) {
        let event = Event::new(EventId(self.next_event_id), self.current_time, payload);
        self.next_event_id += 1;

        log::debug!("event {}: {:?}", event.id.0, event.payload);

        self.events.push(event);

        if self.events.len() > self.config.max_events {
            let drain_count = self.events.len() - self.config.max_events;
            self.events.drain(0..drain_count);
        }
    }
}
