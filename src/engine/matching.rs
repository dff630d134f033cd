//! The matching loop: resting limit orders against the oracle price.
//!
//! One tick is one atomic evaluation. The mark is read once, every trigger
//! on the instrument is checked against that same value, and the whole batch
//! of fills lands in the ledger before the borrow ends. A fill realizes its
//! entry at the trigger price, never at the possibly-better mark that
//! crossed it.

use super::core::Engine;
use super::results::TickResult;
use crate::events::{EventPayload, MarkPriceUpdateEvent, OrderFilledEvent, TickSkippedEvent};
use crate::ledger::Position;
use crate::types::{OrderId, PositionId, Price, Quote, Symbol};

impl Engine {
    /// Record a fresh mark price observation for push-style feeds.
    pub fn update_mark_price(&mut self, symbol: Symbol, price: Price) {
        let at = self.current_time;
        self.prices.record(symbol.clone(), price, at);
        self.emit_event(EventPayload::MarkPriceUpdate(MarkPriceUpdateEvent {
            symbol,
            price,
        }));
    }

    /// One matching cycle for one instrument.
    ///
    /// `None` means the feed has no usable price; the cycle is skipped whole,
    /// nothing is evaluated and every resting order stays resting. With a
    /// price, the observation is recorded and every limit order on the symbol
    /// whose trigger is crossed fills in the same batch.
    ///
    /// This is the narrow entry the original ran on a timer for whichever
    /// market the trader was watching; [`Engine::tick_all`] is the cadence
    /// entry point that covers every priced instrument.
    pub fn tick(&mut self, symbol: &Symbol, mark: Option<Price>) -> TickResult {
        let Some(mark) = mark else {
            log::debug!("tick {}: no mark price, skipping cycle", symbol);
            self.emit_event(EventPayload::TickSkipped(TickSkippedEvent {
                symbol: symbol.clone(),
            }));
            return TickResult {
                symbol: symbol.clone(),
                mark_price: None,
                filled: Vec::new(),
            };
        };

        self.update_mark_price(symbol.clone(), mark);

        TickResult {
            symbol: symbol.clone(),
            mark_price: Some(mark),
            filled: self.fill_triggered(symbol, mark),
        }
    }

    /// One matching cycle over every instrument the price store can value.
    /// Symbols without a stored mark are not evaluated and not reported.
    pub fn tick_all(&mut self) -> Vec<TickResult> {
        let priced: Vec<(Symbol, Price)> = self
            .prices
            .symbols()
            .filter_map(|s| self.prices.get(s).map(|p| (s.clone(), p)))
            .collect();

        priced
            .into_iter()
            .map(|(symbol, mark)| TickResult {
                filled: self.fill_triggered(&symbol, mark),
                symbol,
                mark_price: Some(mark),
            })
            .collect()
    }

    // decide first against the one mark, then mutate; fills are irreversible
    fn fill_triggered(&mut self, symbol: &Symbol, mark: Price) -> Vec<PositionId> {
        let triggered: Vec<OrderId> = self
            .book
            .by_instrument(symbol)
            .filter(|o| o.should_fill(mark))
            .map(|o| o.id)
            .collect();

        let mut filled = Vec::with_capacity(triggered.len());
        for order_id in triggered {
            let Some(order) = self.book.remove(order_id) else {
                continue;
            };

            let position_id = PositionId(order.id.0);
            let position = Position::open(
                position_id,
                order.symbol.clone(),
                order.side,
                order.collateral,
                order.leverage,
                order.trigger_price,
                self.current_time,
            );

            log::debug!(
                "fill: order {} -> position {} {} {:?} {} @ {}",
                order.id.0,
                position_id.0,
                position.symbol,
                position.side,
                position.unit_size,
                position.entry_price
            );

            self.emit_event(EventPayload::OrderFilled(OrderFilledEvent {
                order_id: order.id,
                position_id,
                symbol: position.symbol.clone(),
                side: position.side,
                entry_price: position.entry_price,
                unit_size: position.unit_size,
            }));

            self.ledger.insert(position);
            filled.push(position_id);
        }
        filled
    }

    /// Mark-to-market P&L across the whole ledger; positions on symbols the
    /// store cannot price contribute nothing.
    pub fn total_unrealized_pnl(&self) -> Quote {
        self.ledger.total_unrealized_pnl(|s| self.prices.get(s))
    }
}
