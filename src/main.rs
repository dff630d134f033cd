//! Paper Perps Simulation.
//!
//! Walks the engine lifecycle: sizing previews, resting limit orders, oracle
//! ticks and fills, mark-to-market P&L, and the background matching loop.

use paper_perps::*;
use rust_decimal_macros::dec;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

fn main() {
    env_logger::init();

    println!("Paper Perps Engine Simulation");
    println!("Single Account, Oracle Priced, In-Memory\n");

    scenario_1_sizing_preview();
    scenario_2_limit_order_lifecycle();
    scenario_3_market_entries_and_pnl();
    scenario_4_multi_instrument_matching();
    scenario_5_rejections_and_idempotence();
    scenario_6_background_ticker();

    println!("\nAll simulations completed successfully.");
}

/// What the order form shows before a trade is committed.
fn scenario_1_sizing_preview() {
    println!("Scenario 1: Sizing Preview\n");

    let engine = Engine::with_builtin_markets();
    let btc = Symbol::new("BTC");

    let sizing = engine
        .preview_sizing(&btc, Quote::new(dec!(1000)), dec!(10), dec!(90000), Side::Long)
        .unwrap();

    println!("  $1,000 collateral at 10x on BTC @ $90,000:");
    println!("    notional ${}, size {} BTC", sizing.notional, sizing.unit_size);
    println!("    open fee ${}, liquidation ${}", sizing.fee, sizing.liquidation_price);

    // requested 50x snaps down to BTC's 20x cap
    let capped = engine
        .preview_sizing(&btc, Quote::new(dec!(1000)), dec!(50), dec!(90000), Side::Long)
        .unwrap();
    println!("  Requesting 50x yields notional ${} (clamped to 20x)\n", capped.notional);
}

/// A resting limit order through placement, a non-crossing tick, and a fill.
fn scenario_2_limit_order_lifecycle() {
    println!("Scenario 2: Limit Order Lifecycle\n");

    let mut engine = Engine::with_builtin_markets();
    let btc = Symbol::new("BTC");

    let placed = engine
        .place(OrderRequest::Limit {
            symbol: btc.clone(),
            side: Side::Long,
            collateral: Quote::new(dec!(1000)),
            leverage: dec!(10),
            trigger_price: Price::new_unchecked(dec!(90000)),
        })
        .unwrap();
    let order = placed.order().unwrap();

    println!("  Placed long limit: {} BTC notional ${} trigger ${}",
        order.unit_size(), order.notional, order.trigger_price);

    let result = engine.tick(&btc, Some(Price::new_unchecked(dec!(91000))));
    println!("  Tick @ $91,000: {} fill(s), {} order(s) resting",
        result.filled.len(), engine.orders(Some(&btc)).len());

    let result = engine.tick(&btc, Some(Price::new_unchecked(dec!(89500))));
    let position = engine.get_position(result.filled[0]).unwrap();
    println!("  Tick @ $89,500: filled at trigger ${}", position.entry_price);
    println!("    size {} BTC, liquidation ${}\n", position.unit_size, position.liquidation_price);
}

/// Market entries fill immediately; P&L tracks the oracle from there.
fn scenario_3_market_entries_and_pnl() {
    println!("Scenario 3: Market Entries and PnL\n");

    let mut engine = Engine::with_builtin_markets();
    let eth = Symbol::new("ETH");

    engine.update_mark_price(eth.clone(), Price::new_unchecked(dec!(4000)));

    let long = engine
        .place(OrderRequest::Market {
            symbol: eth.clone(),
            side: Side::Long,
            collateral: Quote::new(dec!(2000)),
            leverage: dec!(5),
        })
        .unwrap();
    let short = engine
        .place(OrderRequest::Market {
            symbol: eth.clone(),
            side: Side::Short,
            collateral: Quote::new(dec!(2000)),
            leverage: dec!(5),
        })
        .unwrap();

    let long_id = long.position().unwrap().id;
    let short_id = short.position().unwrap().id;
    println!("  Long and short opened @ $4,000, $10,000 notional each");

    for (mark, label) in [(dec!(4200), "$4,200"), (dec!(3800), "$3,800")] {
        engine.update_mark_price(eth.clone(), Price::new_unchecked(mark));
        let mark = Price::new_unchecked(mark);
        let long_pnl = engine.get_position(long_id).unwrap().unrealized_pnl(mark);
        let short_pnl = engine.get_position(short_id).unwrap().unrealized_pnl(mark);
        println!("  Mark {}: long ${}, short ${}, net ${}",
            label, long_pnl, short_pnl, engine.total_unrealized_pnl());
    }

    engine.close(long_id);
    engine.close(short_id);
    println!("  Both closed, {} open position(s)\n", engine.positions(None).len());
}

/// One tick_all pass sweeps every instrument the store can price.
fn scenario_4_multi_instrument_matching() {
    println!("Scenario 4: Multi-Instrument Matching\n");

    let mut engine = Engine::with_builtin_markets();

    let markets = [
        ("BTC", dec!(89000)),
        ("XAU", dec!(2590)),
        ("US10Y", dec!(4.25)),
    ];

    for (symbol, trigger) in markets {
        engine
            .place(OrderRequest::Limit {
                symbol: Symbol::new(symbol),
                side: Side::Long,
                collateral: Quote::new(dec!(500)),
                leverage: dec!(5),
                trigger_price: Price::new_unchecked(trigger),
            })
            .unwrap();
    }
    println!("  3 resting longs: BTC, gold, 10Y yield");

    // only BTC and gold have prices; the yield order must stay resting
    engine.update_mark_price(Symbol::new("BTC"), Price::new_unchecked(dec!(88500)));
    engine.update_mark_price(Symbol::new("XAU"), Price::new_unchecked(dec!(2580)));

    let results = engine.tick_all();
    let fills: usize = results.iter().map(|r| r.filled.len()).sum();
    println!("  tick_all over {} priced market(s): {} fill(s)", results.len(), fills);
    println!("  Resting: {}, open: {}\n", engine.orders(None).len(), engine.positions(None).len());
}

/// Rejected placements change nothing; cancel and close never error.
fn scenario_5_rejections_and_idempotence() {
    println!("Scenario 5: Rejections and Idempotence\n");

    let mut engine = Engine::with_builtin_markets();
    let btc = Symbol::new("BTC");

    let over_levered = engine.place(OrderRequest::Limit {
        symbol: btc.clone(),
        side: Side::Long,
        collateral: Quote::new(dec!(1000)),
        leverage: dec!(21),
        trigger_price: Price::new_unchecked(dec!(90000)),
    });
    println!("  21x on BTC (cap 20x): {}", over_levered.unwrap_err());

    let unknown = engine.place(OrderRequest::Market {
        symbol: Symbol::new("NOPE"),
        side: Side::Long,
        collateral: Quote::new(dec!(1000)),
        leverage: dec!(2),
    });
    println!("  Unknown symbol: {}", unknown.unwrap_err());
    println!("  Book after rejections: {} order(s)", engine.orders(None).len());

    let placed = engine
        .place(OrderRequest::Limit {
            symbol: btc,
            side: Side::Short,
            collateral: Quote::new(dec!(100)),
            leverage: dec!(2),
            trigger_price: Price::new_unchecked(dec!(95000)),
        })
        .unwrap();
    let id = placed.order().unwrap().id;

    println!("  cancel twice: {} then {}", engine.cancel(id), engine.cancel(id));
    println!("  close of never-filled id: {}\n", engine.close(PositionId(id.0)));
}

/// The timer-driven loop: spawn, let it fill, stop it.
fn scenario_6_background_ticker() {
    println!("Scenario 6: Background Ticker\n");

    let engine = Arc::new(Mutex::new(Engine::with_builtin_markets()));
    let sol = Symbol::new("SOL");

    {
        let mut engine = engine.lock().unwrap();
        engine.update_mark_price(sol.clone(), Price::new_unchecked(dec!(200)));
        engine
            .place(OrderRequest::Limit {
                symbol: sol.clone(),
                side: Side::Short,
                collateral: Quote::new(dec!(300)),
                leverage: dec!(4),
                trigger_price: Price::new_unchecked(dec!(210)),
            })
            .unwrap();
    }
    println!("  Short limit resting, trigger $210, mark $200");

    let ticker = MatchTicker::spawn(Arc::clone(&engine), Duration::from_millis(20));
    thread::sleep(Duration::from_millis(60));

    engine
        .lock()
        .unwrap()
        .update_mark_price(sol, Price::new_unchecked(dec!(212)));
    println!("  Mark pushed to $212...");
    thread::sleep(Duration::from_millis(100));

    ticker.stop();

    let engine = engine.lock().unwrap();
    println!("  Ticker stopped. Open positions: {}, resting: {}",
        engine.positions(None).len(), engine.orders(None).len());
    println!("  Events recorded: {}", engine.events().len());
}
