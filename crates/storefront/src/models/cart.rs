//! Session cart contents.
//!
//! The cart is a session-held map from stringified product id to a
//! positive quantity - no database identity. All mutation goes through
//! this type so the two cart invariants hold in one place:
//!
//! - a quantity of zero or less removes the entry, it is never stored;
//! - entries are keyed by stringified product id (the session payload
//!   is a plain JSON object).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use sharp_core::ProductId;

/// The session-held cart: stringified product id -> quantity (>= 1).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartContents(BTreeMap<String, u32>);

impl CartContents {
    /// An empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the quantity for a product, inserting if absent.
    pub fn add(&mut self, product_id: ProductId, quantity: u32) {
        let quantity = quantity.max(1);
        let entry = self.0.entry(product_id.to_string()).or_insert(0);
        *entry = entry.saturating_add(quantity);
    }

    /// Set the quantity for a product. Zero or negative removes the entry.
    pub fn set(&mut self, product_id: ProductId, quantity: i64) {
        let key = product_id.to_string();
        if quantity <= 0 {
            self.0.remove(&key);
        } else {
            let clamped = u32::try_from(quantity).unwrap_or(u32::MAX);
            self.0.insert(key, clamped);
        }
    }

    /// Remove a product unconditionally. Absent entries are not an error.
    pub fn remove(&mut self, product_id: ProductId) {
        self.0.remove(&product_id.to_string());
    }

    /// True when no entries remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries resolved to product ids, ascending by id.
    ///
    /// Keys that do not parse as product ids are skipped - a malformed
    /// session entry degrades to an absent row, never an error.
    #[must_use]
    pub fn entries(&self) -> Vec<(ProductId, u32)> {
        let mut entries: Vec<(ProductId, u32)> = self
            .0
            .iter()
            .filter_map(|(key, &qty)| key.parse::<ProductId>().ok().map(|id| (id, qty)))
            .collect();
        entries.sort_by_key(|&(id, _)| id);
        entries
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_add_increments_existing_entry() {
        let mut cart = CartContents::new();
        cart.add(ProductId::new(1), 2);
        cart.add(ProductId::new(1), 3);
        assert_eq!(cart.entries(), vec![(ProductId::new(1), 5)]);
    }

    #[test]
    fn test_add_clamps_zero_to_one() {
        let mut cart = CartContents::new();
        cart.add(ProductId::new(1), 0);
        assert_eq!(cart.entries(), vec![(ProductId::new(1), 1)]);
    }

    #[test]
    fn test_set_replaces_quantity() {
        let mut cart = CartContents::new();
        cart.add(ProductId::new(1), 2);
        cart.set(ProductId::new(1), 7);
        assert_eq!(cart.entries(), vec![(ProductId::new(1), 7)]);
    }

    #[test]
    fn test_set_zero_or_negative_removes() {
        let mut cart = CartContents::new();
        cart.add(ProductId::new(1), 2);
        cart.set(ProductId::new(1), 0);
        assert!(cart.is_empty());

        cart.add(ProductId::new(1), 2);
        cart.set(ProductId::new(1), -3);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut cart = CartContents::new();
        cart.add(ProductId::new(1), 1);
        cart.remove(ProductId::new(1));
        cart.remove(ProductId::new(1));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_entries_ascend_by_numeric_id() {
        let mut cart = CartContents::new();
        cart.add(ProductId::new(10), 1);
        cart.add(ProductId::new(2), 1);
        let ids: Vec<i32> = cart.entries().iter().map(|(id, _)| id.as_i32()).collect();
        assert_eq!(ids, vec![2, 10]);
    }

    #[test]
    fn test_entries_skip_malformed_keys() {
        let json = r#"{"1": 2, "not-a-number": 5}"#;
        let cart: CartContents = serde_json::from_str(json).unwrap();
        assert_eq!(cart.entries(), vec![(ProductId::new(1), 2)]);
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let mut cart = CartContents::new();
        cart.add(ProductId::new(3), 2);
        let json = serde_json::to_string(&cart).unwrap();
        assert_eq!(json, r#"{"3":2}"#);
    }
}
