// 7.0 engine/: the facade. core.rs holds state, orders.rs the user actions,
// matching.rs the price-driven fills, results.rs the outcome and error types.

mod config;
mod core;
mod matching;
mod orders;
mod results;

pub use config::EngineConfig;
pub use core::Engine;
pub use results::{EngineError, Placed, TickResult};
