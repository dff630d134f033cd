// 8.0: wall-clock matching driver. the engine has no timers of its own and
// tests drive tick directly; this wraps a shared engine and runs tick_all on a
// fixed cadence until stopped. the lock is held for a full cycle, so a tick
// never interleaves with a place, cancel, or close.

use crate::engine::Engine;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Cadence the original simulation polled at. A tunable, not correctness.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(3);

/// Handle to a running matching loop. Stop it explicitly with
/// [`MatchTicker::stop`]; dropping the handle stops it too.
#[derive(Debug)]
pub struct MatchTicker {
    stop_tx: Sender<()>,
    thread: Option<JoinHandle<()>>,
}

impl MatchTicker {
    pub fn spawn_default(engine: Arc<Mutex<Engine>>) -> Self {
        Self::spawn(engine, DEFAULT_TICK_INTERVAL)
    }

    /// Start evaluating every priced instrument once per `interval`.
    pub fn spawn(engine: Arc<Mutex<Engine>>, interval: Duration) -> Self {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let thread = thread::spawn(move || loop {
            match stop_rx.recv_timeout(interval) {
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {}
            }

            let Ok(mut engine) = engine.lock() else {
                // a writer panicked mid-mutation; the book can't be trusted
                log::error!("engine lock poisoned, ticker exiting");
                break;
            };

            let results = engine.tick_all();
            let fills: usize = results.iter().map(|r| r.filled.len()).sum();
            if fills > 0 {
                log::info!(
                    "tick: {} fill(s) across {} priced instrument(s)",
                    fills,
                    results.len()
                );
            }
        });

        Self {
            stop_tx,
            thread: Some(thread),
        }
    }

    /// Signal the loop and wait for any in-flight cycle to finish.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let _ = self.stop_tx.send(());
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for MatchTicker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::OrderRequest;
    use crate::types::{Price, Quote, Side, Symbol};
    use rust_decimal_macros::dec;
    use std::time::Instant;

    #[test]
    fn background_loop_fills_and_stops() {
        let engine = Arc::new(Mutex::new(Engine::with_builtin_markets()));
        let btc = Symbol::new("BTC");

        {
            let mut engine = engine.lock().unwrap();
            engine.update_mark_price(btc.clone(), Price::new_unchecked(dec!(91000)));
            engine
                .place(OrderRequest::Limit {
                    symbol: btc.clone(),
                    side: Side::Long,
                    collateral: Quote::new(dec!(1000)),
                    leverage: dec!(10),
                    trigger_price: Price::new_unchecked(dec!(90000)),
                })
                .unwrap();
        }

        let ticker = MatchTicker::spawn(Arc::clone(&engine), Duration::from_millis(5));

        // mark above trigger: the loop must leave the order resting
        thread::sleep(Duration::from_millis(50));
        assert_eq!(engine.lock().unwrap().orders(None).len(), 1);

        engine
            .lock()
            .unwrap()
            .update_mark_price(btc.clone(), Price::new_unchecked(dec!(89500)));

        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            {
                let engine = engine.lock().unwrap();
                if engine.positions(None).len() == 1 {
                    assert!(engine.orders(None).is_empty());
                    break;
                }
            }
            assert!(Instant::now() < deadline, "ticker never filled the order");
            thread::sleep(Duration::from_millis(5));
        }

        ticker.stop();

        // stopped loop no longer evaluates anything
        let events_after_stop = engine.lock().unwrap().events().len();
        thread::sleep(Duration::from_millis(30));
        assert_eq!(engine.lock().unwrap().events().len(), events_after_stop);
    }
}
