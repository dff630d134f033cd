// 3.0: the book of resting orders. newest first, scanned per instrument by the
// matching loop. tens of orders per account in practice, so linear scans are fine.

use crate::order::Order;
use crate::types::{OrderId, Symbol};
use std::collections::VecDeque;

#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    orders: VecDeque<Order>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    // newest at the front; iteration order is the only ordering callers may rely on
    pub fn insert(&mut self, order: Order) {
        self.orders.push_front(order);
    }

    // absent ids are a no-op so double-cancel never errors
    pub fn remove(&mut self, id: OrderId) -> Option<Order> {
        let idx = self.orders.iter().position(|o| o.id == id)?;
        self.orders.remove(idx)
    }

    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    pub fn by_instrument<'a>(&'a self, symbol: &'a Symbol) -> impl Iterator<Item = &'a Order> {
        self.orders.iter().filter(move |o| &o.symbol == symbol)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
