// 7.0.2: result types and errors for engine operations.

use crate::ledger::Position;
use crate::order::Order;
use crate::types::{Leverage, PositionId, Price, Quote, Symbol};
use rust_decimal::Decimal;

/// Outcome of a successful `place`. Market requests fill on the spot; limit
/// and stop requests rest in the book.
#[derive(Debug, Clone)]
pub enum Placed {
    Resting(Order),
    Filled(Position),
}

impl Placed {
    pub fn order(&self) -> Option<&Order> {
        match self {
            Placed::Resting(order) => Some(order),
            Placed::Filled(_) => None,
        }
    }

    pub fn position(&self) -> Option<&Position> {
        match self {
            Placed::Resting(_) => None,
            Placed::Filled(position) => Some(position),
        }
    }
}

/// One matching-loop evaluation for one instrument.
#[derive(Debug, Clone)]
pub struct TickResult {
    pub symbol: Symbol,
    /// The mark the cycle evaluated against; `None` means the cycle was
    /// skipped entirely because no price was available.
    pub mark_price: Option<Price>,
    pub filled: Vec<PositionId>,
}

impl TickResult {
    pub fn skipped(&self) -> bool {
        self.mark_price.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("unknown instrument {0}")]
    UnknownInstrument(Symbol),

    #[error("collateral must be positive, got {0}")]
    InvalidCollateral(Quote),

    #[error("leverage {requested} outside [1, {max}]")]
    InvalidLeverage { requested: Decimal, max: Leverage },

    #[error("no mark price available for {0}")]
    PriceUnavailable(Symbol),
}

impl EngineError {
    /// The three rejection causes a `place` call can raise for bad inputs.
    pub fn is_invalid_parameters(&self) -> bool {
        matches!(
            self,
            EngineError::UnknownInstrument(_)
                | EngineError::InvalidCollateral(_)
                | EngineError::InvalidLeverage { .. }
        )
    }
}
