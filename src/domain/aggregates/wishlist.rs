//! Wishlist aggregate
//!
//! Simpler sibling of the cart: a set of items keyed by product id only, no
//! quantities and no store awareness. Persisted under its own storage key.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    pub product_id: String,
    pub name: String,
    pub unit_price: Decimal,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistState {
    pub items: Vec<WishlistItem>,
}

impl WishlistState {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.items.iter().any(|i| i.product_id == product_id)
    }

    /// Adding an already-wishlisted product is a no-op. Returns the next
    /// state and whether anything changed.
    pub fn add(&self, item: WishlistItem) -> (WishlistState, bool) {
        if self.contains(&item.product_id) {
            return (self.clone(), false);
        }
        let mut next = self.clone();
        next.items.push(item);
        (next, true)
    }

    pub fn remove(&self, product_id: &str) -> (WishlistState, bool) {
        let mut next = self.clone();
        let before = next.items.len();
        next.items.retain(|i| i.product_id != product_id);
        let changed = next.items.len() != before;
        (next, changed)
    }

    pub fn clear(&self) -> (WishlistState, bool) {
        (WishlistState::default(), !self.is_empty())
    }
}
