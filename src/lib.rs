// paper-perps: synthetic perpetual futures paper-trading engine.
// oracle-priced, single account: limit orders rest until the mark crosses
// their trigger, positions are marked to market, nothing settles anywhere.
// all computation is deterministic with no external I/O.
//
// file map (search X.0 for structs, X.1+ for logic):
//   1.x  types.rs: primitives: Symbol, OrderId, Side, Price, Quote, Leverage
//   2.x  sizing.rs: notional, unit size, fees, liquidation price
//   3.x  book.rs: resting limit/stop orders, newest first
//   4.x  ledger.rs: filled positions and unrealized pnl
//   5.x  price_store.rs: latest mark per symbol, injectable
//   6.x  events.rs: state transition events for audit
//   7.x  engine/: facade: place/cancel/close + the matching loop
//   8.x  ticker.rs: wall-clock tick driver with a stop handle
//        instrument.rs: market reference data + builtin catalog
//        order.rs: resting order record and request variants

// core trading modules
pub mod book;
pub mod engine;
pub mod instrument;
pub mod ledger;
pub mod order;
pub mod sizing;
pub mod types;

// integration modules
pub mod events;
pub mod price_store;
pub mod ticker;

// re exports for convenience
pub use book::*;
pub use engine::*;
pub use events::*;
pub use instrument::*;
pub use ledger::*;
pub use order::*;
pub use price_store::*;
pub use sizing::*;
pub use ticker::*;
pub use types::*;
