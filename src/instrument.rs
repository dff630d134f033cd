//! Instrument reference data.
//!
//! An instrument is a tradeable market: a symbol, its asset class, and the
//! maximum leverage the platform allows on it. The registry is read-only from
//! the engine's point of view; nothing in the trading path mutates it.

use crate::types::{Leverage, Symbol};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    Rates,
    Crypto,
    Fx,
    Commodity,
    Stock,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instrument {
    pub symbol: Symbol,
    pub asset_class: AssetClass,
    pub max_leverage: Leverage,
    pub name: String,
}

impl Instrument {
    pub fn new(
        symbol: Symbol,
        asset_class: AssetClass,
        max_leverage: u32,
        name: impl Into<String>,
    ) -> Self {
        // a cap below 1x makes no instrument tradeable; floor it at 1x
        let max_leverage = Leverage::new(Decimal::from(max_leverage.max(1)))
            .expect("floored at 1x");
        Self {
            symbol,
            asset_class,
            max_leverage,
            name: name.into(),
        }
    }
}

/// Read-only lookup table of known instruments.
#[derive(Debug, Clone, Default)]
pub struct InstrumentRegistry {
    instruments: HashMap<Symbol, Instrument>,
}

impl InstrumentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, instrument: Instrument) {
        self.instruments.insert(instrument.symbol.clone(), instrument);
    }

    pub fn lookup(&self, symbol: &Symbol) -> Option<&Instrument> {
        self.instruments.get(symbol)
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.instruments.keys()
    }

    /// The platform's built-in market catalog: treasury yields, majors across
    /// crypto, metals and energy, large-cap equities, index products, and FX.
    pub fn builtin() -> Self {
        use AssetClass::*;

        let mut registry = Self::new();
        let catalog = [
            // rates
            ("US10Y", Rates, 100, "US 10Y Yield"),
            ("US02Y", Rates, 100, "US 2Y Yield"),
            ("HYG", Rates, 50, "High Yield Corp"),
            // crypto
            ("BTC", Crypto, 20, "Bitcoin"),
            ("ETH", Crypto, 20, "Ethereum"),
            ("SOL", Crypto, 20, "Solana"),
            ("BNB", Crypto, 20, "Binance Coin"),
            ("XRP", Crypto, 20, "Ripple"),
            ("ADA", Crypto, 20, "Cardano"),
            ("LINK", Crypto, 20, "Chainlink"),
            ("DOGE", Crypto, 20, "Dogecoin"),
            ("AVAX", Crypto, 20, "Avalanche"),
            // commodities
            ("XAU", Commodity, 50, "Gold"),
            ("XAG", Commodity, 50, "Silver"),
            ("WTI", Commodity, 50, "Crude Oil"),
            ("BRENT", Commodity, 50, "Brent Crude"),
            ("NG", Commodity, 50, "Natural Gas"),
            // stocks and indices
            ("NVDA", Stock, 20, "NVIDIA"),
            ("TSLA", Stock, 20, "Tesla"),
            ("AAPL", Stock, 20, "Apple"),
            ("MSFT", Stock, 20, "Microsoft"),
            ("AMZN", Stock, 20, "Amazon"),
            ("SPY", Stock, 50, "S&P 500 ETF"),
            ("SPX", Stock, 100, "S&P 500 Index"),
            // fx
            ("EUR", Fx, 100, "Euro"),
            ("JPY", Fx, 100, "Yen"),
            ("GBP", Fx, 100, "British Pound"),
            ("TRY", Fx, 50, "Lira"),
            ("BRL", Fx, 50, "Real"),
        ];

        for (symbol, class, max_lev, name) in catalog {
            registry.insert(Instrument::new(Symbol::new(symbol), class, max_lev, name));
        }
        registry
    }
}
