// 6.0: every state change produces an event. external systems (a settlement
// ledger, a notification pipe, the demo printer) integrate by consuming these;
// the engine itself never debits or credits anything.

use crate::order::OrderKind;
use crate::types::{Leverage, OrderId, PositionId, Price, Quote, Side, Symbol, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub u64);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub timestamp: Timestamp,
    pub payload: EventPayload,
}

impl Event {
    pub fn new(id: EventId, timestamp: Timestamp, payload: EventPayload) -> Self {
        Self {
            id,
            timestamp,
            payload,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventPayload {
    // order lifecycle
    OrderPlaced(OrderPlacedEvent),
    OrderCanceled(OrderCanceledEvent),
    OrderFilled(OrderFilledEvent),

    // position lifecycle
    PositionOpened(PositionOpenedEvent),
    PositionClosed(PositionClosedEvent),

    // price flow
    MarkPriceUpdate(MarkPriceUpdateEvent),
    TickSkipped(TickSkippedEvent),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPlacedEvent {
    pub order_id: OrderId,
    pub symbol: Symbol,
    pub side: Side,
    pub kind: OrderKind,
    pub trigger_price: Price,
    pub collateral: Quote,
    pub leverage: Leverage,
    pub notional: Quote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCanceledEvent {
    pub order_id: OrderId,
    pub symbol: Symbol,
}

/// A resting order crossed its trigger and became a position. The entry price
/// is the trigger, never the possibly-better mark that crossed it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderFilledEvent {
    pub order_id: OrderId,
    pub position_id: PositionId,
    pub symbol: Symbol,
    pub side: Side,
    pub entry_price: Price,
    pub unit_size: Decimal,
}

/// A market entry that never rested in the book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionOpenedEvent {
    pub position_id: PositionId,
    pub symbol: Symbol,
    pub side: Side,
    pub entry_price: Price,
    pub unit_size: Decimal,
    pub notional: Quote,
    pub leverage: Leverage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionClosedEvent {
    pub position_id: PositionId,
    pub symbol: Symbol,
    pub entry_price: Price,
    /// Mark at close time, when the store had one.
    pub mark_price: Option<Price>,
    pub unrealized_pnl: Option<Quote>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkPriceUpdateEvent {
    pub symbol: Symbol,
    pub price: Price,
}

/// The matching loop saw no usable price this cycle and evaluated nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickSkippedEvent {
    pub symbol: Symbol,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn fill_event_records_trigger_as_entry() {
        let fill = OrderFilledEvent {
            order_id: OrderId(7),
            position_id: PositionId(7),
            symbol: Symbol::new("BTC"),
            side: Side::Long,
            entry_price: Price::new_unchecked(dec!(90000)),
            unit_size: dec!(0.1),
        };

        assert_eq!(fill.order_id.0, fill.position_id.0);
        assert_eq!(fill.entry_price.value(), dec!(90000));
    }

    #[test]
    fn closed_event_tolerates_missing_mark() {
        let closed = PositionClosedEvent {
            position_id: PositionId(3),
            symbol: Symbol::new("ETH"),
            entry_price: Price::new_unchecked(dec!(4000)),
            mark_price: None,
            unrealized_pnl: None,
        };

        assert!(closed.mark_price.is_none());
        assert!(closed.unrealized_pnl.is_none());
    }
}
