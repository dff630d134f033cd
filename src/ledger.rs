// 4.0: filled positions and their live metrics. pnl = (mark - entry) * sign * units.
// no settlement happens here; closing a position just removes the record and
// hands the final numbers to whoever listens on the event log.

use crate::sizing::compute_sizing;
use crate::types::{Leverage, PositionId, Price, Quote, Side, Symbol, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub id: PositionId,
    pub symbol: Symbol,
    pub side: Side,
    pub entry_price: Price,
    pub unit_size: Decimal,
    pub notional: Quote,
    pub collateral: Quote,
    pub leverage: Leverage,
    pub liquidation_price: Decimal,
    pub open_fee: Quote,
    pub opened_at: Timestamp,
}

impl Position {
    /// Open a position at a realized entry price. All derived figures come
    /// from the sizing math so the ledger can never disagree with the preview.
    pub fn open(
        id: PositionId,
        symbol: Symbol,
        side: Side,
        collateral: Quote,
        leverage: Leverage,
        entry_price: Price,
        opened_at: Timestamp,
    ) -> Self {
        let sizing = compute_sizing(collateral, leverage, entry_price.value(), side);
        Self {
            id,
            symbol,
            side,
            entry_price,
            unit_size: sizing.unit_size,
            notional: sizing.notional,
            collateral,
            leverage,
            liquidation_price: sizing.liquidation_price,
            open_fee: sizing.fee,
            opened_at,
        }
    }

    // 4.1: paper gains/losses against the current oracle price
    pub fn unrealized_pnl(&self, mark_price: Price) -> Quote {
        unrealized_pnl(self.side, self.unit_size, self.entry_price, mark_price)
    }

    /// Open fee plus the identical close fee. Informational only.
    pub fn roundtrip_fee(&self) -> Quote {
        self.open_fee.mul(Decimal::TWO)
    }
}

// 4.2: the pnl formula. direction sign keeps shorts profitable on the way down.
pub fn unrealized_pnl(side: Side, unit_size: Decimal, entry: Price, mark: Price) -> Quote {
    Quote::new((mark.value() - entry.value()) * side.sign() * unit_size)
}

/// The set of open positions, newest first.
#[derive(Debug, Clone, Default)]
pub struct PositionLedger {
    positions: VecDeque<Position>,
}

impl PositionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, position: Position) {
        self.positions.push_front(position);
    }

    // absent ids are a no-op so double-close never errors
    pub fn remove(&mut self, id: PositionId) -> Option<Position> {
        let idx = self.positions.iter().position(|p| p.id == id)?;
        self.positions.remove(idx)
    }

    pub fn get(&self, id: PositionId) -> Option<&Position> {
        self.positions.iter().find(|p| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.positions.iter()
    }

    pub fn by_instrument<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> impl Iterator<Item = &'a Position> {
        self.positions.iter().filter(move |p| &p.symbol == symbol)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Sum of unrealized P&L over every position the price source can value.
    pub fn total_unrealized_pnl(
        &self,
        mark_price_of: impl Fn(&Symbol) -> Option<Price>,
    ) -> Quote {
        self.positions
            .iter()
            .filter_map(|p| mark_price_of(&p.symbol).map(|mark| p.unrealized_pnl(mark)))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn btc_long() -> Position {
        Position::open(
            PositionId(1),
            Symbol::new("BTC"),
            Side::Long,
            Quote::new(dec!(1000)),
            Leverage::new(dec!(10)).unwrap(),
            Price::new_unchecked(dec!(90000)),
            Timestamp::from_millis(0),
        )
    }

    #[test]
    fn open_derives_from_sizing() {
        let pos = btc_long();
        assert_eq!(pos.notional.value(), dec!(10000));
        assert_eq!(pos.unit_size, dec!(10000) / dec!(90000));
        assert_eq!(pos.liquidation_price, dec!(81900));
        assert_eq!(pos.open_fee.value(), dec!(10));
        assert_eq!(pos.roundtrip_fee().value(), dec!(20));
    }

    #[test]
    fn long_pnl_follows_price() {
        let pos = btc_long();

        let up = pos.unrealized_pnl(Price::new_unchecked(dec!(99000)));
        assert_eq!(up.value(), dec!(9000) * pos.unit_size);

        let down = pos.unrealized_pnl(Price::new_unchecked(dec!(81000)));
        assert!(down.value() < Decimal::ZERO);

        let flat = pos.unrealized_pnl(Price::new_unchecked(dec!(90000)));
        assert_eq!(flat.value(), Decimal::ZERO);
    }

    #[test]
    fn short_pnl_inverts() {
        let pos = Position::open(
            PositionId(2),
            Symbol::new("ETH"),
            Side::Short,
            Quote::new(dec!(400)),
            Leverage::new(dec!(5)).unwrap(),
            Price::new_unchecked(dec!(4000)),
            Timestamp::from_millis(0),
        );

        // 2000 notional, 0.5 units. price drops 100 -> +50
        let pnl = pos.unrealized_pnl(Price::new_unchecked(dec!(3900)));
        assert_eq!(pnl.value(), dec!(50));
    }

    #[test]
    fn ledger_remove_is_idempotent() {
        let mut ledger = PositionLedger::new();
        ledger.insert(btc_long());

        assert!(ledger.remove(PositionId(1)).is_some());
        assert!(ledger.remove(PositionId(1)).is_none());
        assert!(ledger.is_empty());
    }

    #[test]
    fn total_pnl_skips_unpriced_symbols() {
        let mut ledger = PositionLedger::new();
        ledger.insert(btc_long());
        ledger.insert(Position::open(
            PositionId(2),
            Symbol::new("ETH"),
            Side::Long,
            Quote::new(dec!(100)),
            Leverage::new(dec!(1)).unwrap(),
            Price::new_unchecked(dec!(4000)),
            Timestamp::from_millis(0),
        ));

        // only BTC has a price; ETH is silently excluded
        let total = ledger.total_unrealized_pnl(|symbol| {
            (symbol.as_str() == "BTC").then(|| Price::new_unchecked(dec!(99000)))
        });
        assert_eq!(total.value(), dec!(9000) * (dec!(10000) / dec!(90000)));
    }
}
