//! Engine integration tests.
//!
//! Drive the full facade the way an integrating UI would: place, tick with
//! injected prices, cancel, close. No wall-clock timers anywhere; every
//! matching cycle is a manual tick.

use paper_perps::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn engine() -> Engine {
    Engine::with_builtin_markets()
}

fn btc() -> Symbol {
    Symbol::new("BTC")
}

fn limit(side: Side, collateral: Decimal, leverage: Decimal, trigger: Decimal) -> OrderRequest {
    OrderRequest::Limit {
        symbol: btc(),
        side,
        collateral: Quote::new(collateral),
        leverage,
        trigger_price: Price::new_unchecked(trigger),
    }
}

/// The reference walkthrough: a 10x BTC long limit at $90,000 rides through
/// a non-crossing tick, fills on the crossing one, and lands in the ledger
/// with the exact sizing figures.
#[test]
fn btc_limit_order_end_to_end() {
    let mut engine = engine();

    let placed = engine
        .place(limit(Side::Long, dec!(1000), dec!(10), dec!(90000)))
        .unwrap();
    let order_id = placed.order().unwrap().id;

    assert_eq!(engine.orders(Some(&btc())).len(), 1);
    assert!(engine.positions(Some(&btc())).is_empty());

    // above the trigger: resting
    let result = engine.tick(&btc(), Some(Price::new_unchecked(dec!(91000))));
    assert!(result.filled.is_empty());
    assert_eq!(engine.orders(Some(&btc())).len(), 1);

    // below the trigger: fills at the trigger, not at the better mark
    let result = engine.tick(&btc(), Some(Price::new_unchecked(dec!(89500))));
    assert_eq!(result.filled.len(), 1);
    assert!(engine.orders(Some(&btc())).is_empty());

    let position = engine.get_position(result.filled[0]).unwrap();
    assert_eq!(position.id.0, order_id.0);
    assert_eq!(position.entry_price.value(), dec!(90000));
    assert_eq!(position.unit_size, dec!(10000) / dec!(90000));
    assert_eq!(position.liquidation_price, dec!(81900));

    // filled orders are never re-evaluated
    engine.tick(&btc(), Some(Price::new_unchecked(dec!(88000))));
    assert_eq!(engine.positions(Some(&btc())).len(), 1);
}

#[test]
fn short_limit_fills_on_rip_not_dip() {
    let mut engine = engine();
    engine
        .place(limit(Side::Short, dec!(500), dec!(5), dec!(90000)))
        .unwrap();

    let result = engine.tick(&btc(), Some(Price::new_unchecked(dec!(89000))));
    assert!(result.filled.is_empty());

    let result = engine.tick(&btc(), Some(Price::new_unchecked(dec!(90000))));
    assert_eq!(result.filled.len(), 1);
}

#[test]
fn stop_orders_rest_indefinitely() {
    let mut engine = engine();
    let placed = engine
        .place(OrderRequest::Stop {
            symbol: btc(),
            side: Side::Long,
            collateral: Quote::new(dec!(100)),
            leverage: dec!(2),
            trigger_price: Price::new_unchecked(dec!(90000)),
        })
        .unwrap();

    engine.tick(&btc(), Some(Price::new_unchecked(dec!(50000))));
    engine.tick(&btc(), Some(Price::new_unchecked(dec!(150000))));
    assert_eq!(engine.orders(Some(&btc())).len(), 1);

    // cancel is still the way out
    assert!(engine.cancel(placed.order().unwrap().id));
    assert!(engine.orders(Some(&btc())).is_empty());
}

#[test]
fn missing_price_skips_the_whole_cycle() {
    let mut engine = engine();
    engine
        .place(limit(Side::Long, dec!(1000), dec!(10), dec!(90000)))
        .unwrap();

    let result = engine.tick(&btc(), None);
    assert!(result.skipped());
    assert!(result.filled.is_empty());
    assert_eq!(engine.orders(Some(&btc())).len(), 1);

    // the skip is observable in the audit trail but is not an error
    assert!(matches!(
        engine.recent_events(1)[0].payload,
        EventPayload::TickSkipped(_)
    ));
}

#[test]
fn rejected_place_leaves_state_untouched() {
    let mut engine = engine();
    engine
        .place(limit(Side::Long, dec!(1000), dec!(10), dec!(90000)))
        .unwrap();
    let orders_before: Vec<u64> = engine.orders(None).iter().map(|o| o.id.0).collect();
    let events_before = engine.events().len();

    // BTC caps at 20x
    let err = engine
        .place(limit(Side::Long, dec!(1000), dec!(21), dec!(90000)))
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidLeverage { .. }));
    assert!(err.is_invalid_parameters());

    let err = engine
        .place(limit(Side::Long, dec!(0), dec!(10), dec!(90000)))
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidCollateral(_)));

    let err = engine
        .place(OrderRequest::Limit {
            symbol: Symbol::new("NOPE"),
            side: Side::Long,
            collateral: Quote::new(dec!(1000)),
            leverage: dec!(2),
            trigger_price: Price::new_unchecked(dec!(100)),
        })
        .unwrap_err();
    assert!(matches!(err, EngineError::UnknownInstrument(_)));

    let orders_after: Vec<u64> = engine.orders(None).iter().map(|o| o.id.0).collect();
    assert_eq!(orders_before, orders_after);
    assert_eq!(engine.events().len(), events_before);
}

#[test]
fn market_order_fills_immediately_or_fails() {
    let mut engine = engine();

    let request = OrderRequest::Market {
        symbol: btc(),
        side: Side::Long,
        collateral: Quote::new(dec!(1000)),
        leverage: dec!(10),
    };

    // no mark yet: a market entry cannot realize a price
    let err = engine.place(request.clone()).unwrap_err();
    assert!(matches!(err, EngineError::PriceUnavailable(_)));
    assert!(!err.is_invalid_parameters());
    assert!(engine.positions(None).is_empty());

    engine.update_mark_price(btc(), Price::new_unchecked(dec!(92000)));
    let placed = engine.place(request).unwrap();

    let position = placed.position().unwrap();
    assert_eq!(position.entry_price.value(), dec!(92000));
    assert!(engine.orders(None).is_empty());
    assert_eq!(engine.positions(None).len(), 1);
}

#[test]
fn cancel_and_close_are_idempotent() {
    let mut engine = engine();
    engine.update_mark_price(btc(), Price::new_unchecked(dec!(90000)));

    let order_id = engine
        .place(limit(Side::Long, dec!(100), dec!(2), dec!(80000)))
        .unwrap()
        .order()
        .unwrap()
        .id;
    let position_id = engine
        .place(OrderRequest::Market {
            symbol: btc(),
            side: Side::Long,
            collateral: Quote::new(dec!(100)),
            leverage: dec!(2),
        })
        .unwrap()
        .position()
        .unwrap()
        .id;

    assert!(engine.cancel(order_id));
    assert!(!engine.cancel(order_id));
    assert!(!engine.cancel(OrderId(9999)));

    assert!(engine.close(position_id));
    assert!(!engine.close(position_id));
    assert!(!engine.close(PositionId(9999)));

    assert!(engine.orders(None).is_empty());
    assert!(engine.positions(None).is_empty());
}

#[test]
fn same_cycle_fills_are_batched() {
    let mut engine = engine();

    engine
        .place(limit(Side::Long, dec!(100), dec!(2), dec!(90000)))
        .unwrap();
    engine
        .place(limit(Side::Long, dec!(100), dec!(2), dec!(89000)))
        .unwrap();
    engine
        .place(limit(Side::Short, dec!(100), dec!(2), dec!(88000)))
        .unwrap();

    // 88500 crosses both long triggers and the short's
    let result = engine.tick(&btc(), Some(Price::new_unchecked(dec!(88500))));
    assert_eq!(result.filled.len(), 3);
    assert!(engine.orders(Some(&btc())).is_empty());

    // each fill realized its own trigger
    let entries: Vec<Decimal> = engine
        .positions(Some(&btc()))
        .iter()
        .map(|p| p.entry_price.value())
        .collect();
    assert!(entries.contains(&dec!(90000)));
    assert!(entries.contains(&dec!(89000)));
    assert!(entries.contains(&dec!(88000)));
}

#[test]
fn tick_all_sweeps_every_priced_instrument() {
    let mut engine = engine();
    let eth = Symbol::new("ETH");
    let xau = Symbol::new("XAU");

    engine
        .place(limit(Side::Long, dec!(100), dec!(2), dec!(90000)))
        .unwrap();
    engine
        .place(OrderRequest::Limit {
            symbol: eth.clone(),
            side: Side::Short,
            collateral: Quote::new(dec!(100)),
            leverage: dec!(2),
            trigger_price: Price::new_unchecked(dec!(4000)),
        })
        .unwrap();
    engine
        .place(OrderRequest::Limit {
            symbol: xau.clone(),
            side: Side::Long,
            collateral: Quote::new(dec!(100)),
            leverage: dec!(2),
            trigger_price: Price::new_unchecked(dec!(2600)),
        })
        .unwrap();

    // gold has no price: its order must survive the sweep untouched
    engine.update_mark_price(btc(), Price::new_unchecked(dec!(89000)));
    engine.update_mark_price(eth.clone(), Price::new_unchecked(dec!(4100)));

    let results = engine.tick_all();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| !r.skipped()));

    assert!(engine.orders(Some(&btc())).is_empty());
    assert!(engine.orders(Some(&eth)).is_empty());
    assert_eq!(engine.orders(Some(&xau)).len(), 1);
    assert_eq!(engine.positions(None).len(), 2);
}

#[test]
fn listing_is_most_recent_first() {
    let mut engine = engine();

    let first = engine
        .place(limit(Side::Long, dec!(100), dec!(2), dec!(80000)))
        .unwrap()
        .order()
        .unwrap()
        .id;
    let second = engine
        .place(limit(Side::Long, dec!(100), dec!(2), dec!(81000)))
        .unwrap()
        .order()
        .unwrap()
        .id;

    let listed: Vec<u64> = engine.orders(None).iter().map(|o| o.id.0).collect();
    assert_eq!(listed, vec![second.0, first.0]);
}

#[test]
fn fill_events_record_the_transition() {
    let mut engine = engine();
    engine.set_time(Timestamp::from_millis(1_000));

    let order_id = engine
        .place(limit(Side::Long, dec!(1000), dec!(10), dec!(90000)))
        .unwrap()
        .order()
        .unwrap()
        .id;
    engine.advance_time(3_000);
    engine.tick(&btc(), Some(Price::new_unchecked(dec!(89500))));

    let fill = engine
        .events()
        .iter()
        .find_map(|e| match &e.payload {
            EventPayload::OrderFilled(fill) => Some(fill.clone()),
            _ => None,
        })
        .expect("fill event emitted");

    assert_eq!(fill.order_id, order_id);
    assert_eq!(fill.position_id.0, order_id.0);
    assert_eq!(fill.entry_price.value(), dec!(90000));
}

/// The serialized position mirrors the documented field set, so a JSON
/// boundary needs no mapping layer.
#[test]
fn position_json_shape() {
    let mut engine = engine();
    engine.update_mark_price(btc(), Price::new_unchecked(dec!(90000)));

    let placed = engine
        .place(OrderRequest::Market {
            symbol: btc(),
            side: Side::Long,
            collateral: Quote::new(dec!(1000)),
            leverage: dec!(10),
        })
        .unwrap();

    let json = serde_json::to_value(placed.position().unwrap()).unwrap();
    for field in [
        "id",
        "symbol",
        "side",
        "entry_price",
        "unit_size",
        "notional",
        "collateral",
        "leverage",
        "liquidation_price",
        "opened_at",
    ] {
        assert!(json.get(field).is_some(), "missing field {field}");
    }
    assert_eq!(json["side"], "long");
}
