//! Order types.
//!
//! An [`Order`] is a resting trigger waiting on the oracle price. Market
//! entries never appear here: they fill synchronously at placement and go
//! straight to the position ledger. Every variant carries exactly the fields
//! it needs; there are no optional prices to second-guess.

use crate::types::{Leverage, OrderId, Price, Quote, Side, Symbol, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a resting order converts into a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    /// Fills when price crosses the trigger toward the entry: longs buy the
    /// dip (mark at or below trigger), shorts sell the rip (mark at or above).
    Limit,
    /// Accepted and held, but the matching loop defines no fill rule for
    /// stops; they rest until canceled.
    Stop,
}

/// What a trader submits. Tagged per execution style so a market request can
/// never smuggle a trigger price and a limit request can never omit one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum OrderRequest {
    Market {
        symbol: Symbol,
        side: Side,
        collateral: Quote,
        leverage: Decimal,
    },
    Limit {
        symbol: Symbol,
        side: Side,
        collateral: Quote,
        leverage: Decimal,
        trigger_price: Price,
    },
    Stop {
        symbol: Symbol,
        side: Side,
        collateral: Quote,
        leverage: Decimal,
        trigger_price: Price,
    },
}

impl OrderRequest {
    pub fn symbol(&self) -> &Symbol {
        match self {
            Self::Market { symbol, .. }
            | Self::Limit { symbol, .. }
            | Self::Stop { symbol, .. } => symbol,
        }
    }

    pub fn side(&self) -> Side {
        match self {
            Self::Market { side, .. } | Self::Limit { side, .. } | Self::Stop { side, .. } => {
                *side
            }
        }
    }

    pub fn collateral(&self) -> Quote {
        match self {
            Self::Market { collateral, .. }
            | Self::Limit { collateral, .. }
            | Self::Stop { collateral, .. } => *collateral,
        }
    }

    pub fn leverage(&self) -> Decimal {
        match self {
            Self::Market { leverage, .. }
            | Self::Limit { leverage, .. }
            | Self::Stop { leverage, .. } => *leverage,
        }
    }
}

/// A resting order. Notional is locked in at creation; the entry price is not
/// realized until the matching loop fills it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub created_at: Timestamp,
    pub symbol: Symbol,
    pub side: Side,
    pub kind: OrderKind,
    pub trigger_price: Price,
    pub collateral: Quote,
    pub leverage: Leverage,
    pub notional: Quote,
}

impl Order {
    pub fn new(
        id: OrderId,
        symbol: Symbol,
        side: Side,
        kind: OrderKind,
        trigger_price: Price,
        collateral: Quote,
        leverage: Leverage,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            created_at,
            symbol,
            side,
            kind,
            trigger_price,
            collateral,
            leverage,
            notional: collateral.mul(leverage.value()),
        }
    }

    /// Projected base-asset quantity if the order fills at its trigger.
    pub fn unit_size(&self) -> Decimal {
        self.notional.value() / self.trigger_price.value()
    }

    /// Whether the given mark price converts this order into a position.
    pub fn should_fill(&self, mark_price: Price) -> bool {
        match self.kind {
            OrderKind::Limit => match self.side {
                Side::Long => mark_price <= self.trigger_price,
                Side::Short => mark_price >= self.trigger_price,
            },
            OrderKind::Stop => false,
        }
    }
}
