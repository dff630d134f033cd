//! Placement, cancellation, and close.
//!
//! Validation happens up front and in full: a rejected request leaves the
//! book, the ledger, and the event log exactly as they were.

use super::core::Engine;
use super::results::{EngineError, Placed};
use crate::events::{
    EventPayload, OrderCanceledEvent, OrderPlacedEvent, PositionClosedEvent, PositionOpenedEvent,
};
use crate::ledger::Position;
use crate::order::{Order, OrderKind, OrderRequest};
use crate::sizing::{clamp_leverage, compute_sizing, Sizing};
use crate::types::{Leverage, OrderId, PositionId, Price, Quote, Side, Symbol};
use rust_decimal::Decimal;

impl Engine {
    /// Pre-trade preview. Clamps the requested leverage into the instrument's
    /// band, then runs the same sizing math a fill would commit. Read-only.
    pub fn preview_sizing(
        &self,
        symbol: &Symbol,
        collateral: Quote,
        leverage: Decimal,
        entry_price: Decimal,
        side: Side,
    ) -> Result<Sizing, EngineError> {
        let instrument = self
            .registry
            .lookup(symbol)
            .ok_or_else(|| EngineError::UnknownInstrument(symbol.clone()))?;

        Ok(compute_sizing(
            collateral,
            clamp_leverage(leverage, instrument),
            entry_price,
            side,
        ))
    }

    /// Place an order. Market requests fill immediately at the current mark;
    /// limit and stop requests rest in the book until the matching loop (or a
    /// cancel) takes them out.
    pub fn place(&mut self, request: OrderRequest) -> Result<Placed, EngineError> {
        let instrument = self
            .registry
            .lookup(request.symbol())
            .ok_or_else(|| EngineError::UnknownInstrument(request.symbol().clone()))?;

        if !request.collateral().is_positive() {
            return Err(EngineError::InvalidCollateral(request.collateral()));
        }

        let max = instrument.max_leverage;
        let leverage = Leverage::new(request.leverage())
            .filter(|lev| lev.value() <= max.value())
            .ok_or(EngineError::InvalidLeverage {
                requested: request.leverage(),
                max,
            })?;

        match request {
            OrderRequest::Market {
                symbol,
                side,
                collateral,
                ..
            } => {
                // a market entry needs a realized price right now
                let mark = self
                    .prices
                    .get(&symbol)
                    .ok_or_else(|| EngineError::PriceUnavailable(symbol.clone()))?;

                let id = PositionId(self.next_order_id().0);
                let position =
                    Position::open(id, symbol, side, collateral, leverage, mark, self.current_time);

                log::debug!(
                    "market fill: {} {:?} {} @ {}",
                    position.symbol,
                    side,
                    position.unit_size,
                    mark
                );

                self.emit_event(EventPayload::PositionOpened(PositionOpenedEvent {
                    position_id: position.id,
                    symbol: position.symbol.clone(),
                    side,
                    entry_price: mark,
                    unit_size: position.unit_size,
                    notional: position.notional,
                    leverage,
                }));

                self.ledger.insert(position.clone());
                Ok(Placed::Filled(position))
            }
            OrderRequest::Limit {
                symbol,
                side,
                collateral,
                trigger_price,
                ..
            } => Ok(Placed::Resting(self.rest_order(
                symbol,
                side,
                OrderKind::Limit,
                trigger_price,
                collateral,
                leverage,
            ))),
            OrderRequest::Stop {
                symbol,
                side,
                collateral,
                trigger_price,
                ..
            } => Ok(Placed::Resting(self.rest_order(
                symbol,
                side,
                OrderKind::Stop,
                trigger_price,
                collateral,
                leverage,
            ))),
        }
    }

    fn rest_order(
        &mut self,
        symbol: Symbol,
        side: Side,
        kind: OrderKind,
        trigger_price: Price,
        collateral: Quote,
        leverage: Leverage,
    ) -> Order {
        let order = Order::new(
            self.next_order_id(),
            symbol,
            side,
            kind,
            trigger_price,
            collateral,
            leverage,
            self.current_time,
        );

        log::debug!(
            "resting {:?}: {} {:?} trigger {}",
            kind,
            order.symbol,
            side,
            trigger_price
        );

        self.emit_event(EventPayload::OrderPlaced(OrderPlacedEvent {
            order_id: order.id,
            symbol: order.symbol.clone(),
            side,
            kind,
            trigger_price,
            collateral,
            leverage,
            notional: order.notional,
        }));

        self.book.insert(order.clone());
        order
    }

    /// Remove a resting order. Returns whether anything was removed; an
    /// unknown or already-gone id is a quiet no-op.
    pub fn cancel(&mut self, id: OrderId) -> bool {
        match self.book.remove(id) {
            Some(order) => {
                self.emit_event(EventPayload::OrderCanceled(OrderCanceledEvent {
                    order_id: order.id,
                    symbol: order.symbol,
                }));
                true
            }
            None => false,
        }
    }

    /// Remove an open position. No settlement happens here; the closed event
    /// carries the final mark and unrealized P&L for whoever settles balances.
    pub fn close(&mut self, id: PositionId) -> bool {
        match self.ledger.remove(id) {
            Some(position) => {
                let mark = self.prices.get(&position.symbol);
                let pnl = mark.map(|m| position.unrealized_pnl(m));

                self.emit_event(EventPayload::PositionClosed(PositionClosedEvent {
                    position_id: position.id,
                    symbol: position.symbol,
                    entry_price: position.entry_price,
                    mark_price: mark,
                    unrealized_pnl: pnl,
                }));
                true
            }
            None => false,
        }
    }
}
