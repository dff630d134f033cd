// 2.0: position sizing math. pure functions, no state, exact decimal arithmetic.
// notional = collateral * leverage, unit size = notional / entry, and the
// liquidation band derived from the margin fraction. rounding belongs to the
// presentation layer, never here.

use crate::instrument::Instrument;
use crate::types::{Leverage, Quote, Side};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

// Flat fee charged on notional, once at open and once again at close.
pub const FEE_RATE: Decimal = dec!(0.001);

// Collateral buffer below which a position is forced closed.
pub const MAINT_MARGIN: Decimal = dec!(0.01);

/// Everything the order form needs to show before a trade is committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sizing {
    pub notional: Quote,
    pub unit_size: Decimal,
    pub fee: Quote,
    pub liquidation_price: Decimal,
}

/// Convert trader inputs into exposure figures.
///
/// Never fails: a zero or negative entry price yields a zero unit size and a
/// zero liquidation price instead of an error, so a half-loaded price feed
/// can't poison the preview path.
pub fn compute_sizing(
    collateral: Quote,
    leverage: Leverage,
    entry_price: Decimal,
    side: Side,
) -> Sizing {
    let notional = collateral.mul(leverage.value());

    let unit_size = if entry_price > Decimal::ZERO {
        notional.value() / entry_price
    } else {
        Decimal::ZERO
    };

    Sizing {
        notional,
        unit_size,
        fee: notional.mul(FEE_RATE),
        liquidation_price: liquidation_price(entry_price, leverage, side),
    }
}

/// Price at which losses have consumed collateral down to the maintenance
/// buffer. Higher leverage pulls this strictly closer to entry.
pub fn liquidation_price(entry_price: Decimal, leverage: Leverage, side: Side) -> Decimal {
    if entry_price <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    match side {
        Side::Long => entry_price * (Decimal::ONE - leverage.margin_fraction() + MAINT_MARGIN),
        Side::Short => entry_price * (Decimal::ONE + leverage.margin_fraction() - MAINT_MARGIN),
    }
}

/// Clamp a requested leverage into the instrument's allowed band.
///
/// This is the composition-time guard: when the trader switches to an
/// instrument with a lower cap, the requested multiplier snaps down to it.
pub fn clamp_leverage(requested: Decimal, instrument: &Instrument) -> Leverage {
    let clamped = requested
        .max(Decimal::ONE)
        .min(instrument.max_leverage.value());
    Leverage::new(clamped).expect("clamped into [1, max]")
}
