//! Cart aggregate
//!
//! Pure state transitions over [`CartState`]: every operation takes `&self`
//! and returns a [`Transition`] carrying the next state plus any diagnostic
//! notices. Callers (see `store::CartStore`) swap their reference and decide
//! whether to persist.
//!
//! Aggregate totals are always recalculated from the line collection after a
//! mutation, never adjusted incrementally.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::events::Notice;
use crate::domain::value_objects::{GeoPoint, LineKey, StoreInfo, DEFAULT_DELIVERY_RADIUS_KM};

/// One purchasable unit in the cart, unique per product + variant + store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: String,
    pub variant_id: String,
    /// Always >= 1; a line that would drop to 0 is removed instead.
    pub quantity: u32,
    /// Snapshotted at add-time, never refreshed on merge.
    pub unit_price: Decimal,
    /// unit_price * quantity, recomputed on every mutation.
    pub line_total: Decimal,
    /// Last-known available stock; refreshable via `update_stock`.
    pub stock_quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<Decimal>,
    pub store: StoreInfo,
}

impl CartLine {
    pub fn key(&self) -> LineKey {
        LineKey::new(&self.product_id, &self.variant_id, &self.store.store_id)
    }

    fn recompute_total(&mut self) {
        self.line_total = self.unit_price * Decimal::from(self.quantity);
    }
}

/// Add request as it arrives from the UI, before sanitization. Optional
/// fields reflect that the storefront passes through loosely-shaped
/// catalog payloads.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CartCandidate {
    pub product_id: String,
    pub variant_id: String,
    pub quantity: Option<i64>,
    pub price: Option<Decimal>,
    pub stock_quantity: u32,
    pub discount: Option<Decimal>,
    pub store_id: Option<String>,
    pub store: Option<StoreDescriptor>,
}

/// Nested store payload on a candidate; the explicit `store_id` field on the
/// candidate takes precedence over `id` here.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreDescriptor {
    pub id: Option<String>,
    pub name: Option<String>,
    pub location: Option<GeoPoint>,
    pub delivery_radius: Option<f64>,
}

impl CartCandidate {
    /// Requested quantity, coerced to 1 when missing or non-positive.
    fn sanitized_quantity(&self) -> u32 {
        match self.quantity {
            Some(n) if n > 0 => u32::try_from(n).unwrap_or(u32::MAX),
            _ => 1,
        }
    }

    /// Price is a hard precondition: missing, zero or negative rejects the add.
    fn sanitized_price(&self) -> Option<Decimal> {
        self.price.filter(|p| *p > Decimal::ZERO)
    }

    /// Explicit `store_id` wins over the nested descriptor's `id`; absence of
    /// both means the candidate cannot be placed in the cart.
    fn resolve_store(&self) -> Option<StoreInfo> {
        let nested = self.store.as_ref();
        let store_id = self
            .store_id
            .clone()
            .or_else(|| nested.and_then(|s| s.id.clone()))?;
        Some(StoreInfo {
            store_id,
            store_name: nested.and_then(|s| s.name.clone()).unwrap_or_default(),
            store_location: nested.and_then(|s| s.location),
            delivery_radius: nested
                .and_then(|s| s.delivery_radius)
                .unwrap_or(DEFAULT_DELIVERY_RADIUS_KM),
        })
    }
}

/// Result of a pure cart operation: the next state, whether anything actually
/// changed, and any diagnostics for the caller to render.
#[derive(Clone, Debug)]
pub struct Transition {
    pub state: CartState,
    pub changed: bool,
    pub notices: Vec<Notice>,
}

impl Transition {
    fn unchanged(state: CartState) -> Self {
        Self { state, changed: false, notices: vec![] }
    }

    fn rejected(state: CartState, notice: Notice) -> Self {
        Self { state, changed: false, notices: vec![notice] }
    }
}

/// Aggregate root: the cart lines plus totals derived from them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    pub items: Vec<CartLine>,
    pub total_quantity: u32,
    pub total_price: Decimal,
}

impl CartState {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn line(&self, key: &LineKey) -> Option<&CartLine> {
        self.items.iter().find(|l| l.key() == *key)
    }

    /// Add a candidate, merging into an existing line when the composite key
    /// matches. Stock clamping prefers partial fulfillment over failure:
    /// whatever nonzero quantity stock can satisfy is granted.
    pub fn add_item(&self, candidate: &CartCandidate) -> Transition {
        let Some(price) = candidate.sanitized_price() else {
            tracing::debug!(product = %candidate.product_id, "add rejected: invalid price");
            return Transition::rejected(
                self.clone(),
                Notice::PriceRejected { product_id: candidate.product_id.clone() },
            );
        };
        let Some(store) = candidate.resolve_store() else {
            tracing::debug!(product = %candidate.product_id, "add rejected: no store id");
            return Transition::rejected(
                self.clone(),
                Notice::StoreUnresolved { product_id: candidate.product_id.clone() },
            );
        };
        let requested = candidate.sanitized_quantity();
        let key = LineKey::new(&candidate.product_id, &candidate.variant_id, &store.store_id);

        let mut next = self.clone();
        let mut notices = vec![];

        if let Some(line) = next.items.iter_mut().find(|l| l.key() == key) {
            // Merge path: clamp against the line's last-known stock.
            let proposed = line.quantity.saturating_add(requested);
            if proposed <= line.stock_quantity {
                line.quantity = proposed;
            } else if line.quantity < line.stock_quantity {
                let granted = line.stock_quantity - line.quantity;
                notices.push(Notice::QuantityClamped { key, requested, granted });
                line.quantity = line.stock_quantity;
            } else {
                let stock = line.stock_quantity;
                return Transition::rejected(next, Notice::AtStockLimit { key, stock });
            }
            line.recompute_total();
        } else {
            let granted = requested.min(candidate.stock_quantity);
            if granted == 0 {
                return Transition::rejected(next, Notice::OutOfStock { key });
            }
            if granted < requested {
                notices.push(Notice::QuantityClamped { key: key.clone(), requested, granted });
            }
            let mut line = CartLine {
                product_id: candidate.product_id.clone(),
                variant_id: candidate.variant_id.clone(),
                quantity: granted,
                unit_price: price,
                line_total: Decimal::ZERO,
                stock_quantity: candidate.stock_quantity,
                discount: candidate.discount,
                store,
            };
            line.recompute_total();
            next.items.push(line);
        }
        next.recalculate();
        Transition { state: next, changed: true, notices }
    }

    /// Increment by one, only while below the last-known stock.
    pub fn increase_quantity(&self, key: &LineKey) -> Transition {
        let mut next = self.clone();
        let Some(line) = next.items.iter_mut().find(|l| l.key() == *key) else {
            return Transition::unchanged(next);
        };
        if line.quantity >= line.stock_quantity {
            let stock = line.stock_quantity;
            return Transition::rejected(next, Notice::AtStockLimit { key: key.clone(), stock });
        }
        line.quantity += 1;
        line.recompute_total();
        next.recalculate();
        Transition { state: next, changed: true, notices: vec![] }
    }

    /// Decrement by one; a line at quantity 1 is removed entirely rather than
    /// left at zero.
    pub fn decrease_quantity(&self, key: &LineKey) -> Transition {
        let mut next = self.clone();
        let Some(pos) = next.items.iter().position(|l| l.key() == *key) else {
            return Transition::unchanged(next);
        };
        if next.items[pos].quantity > 1 {
            next.items[pos].quantity -= 1;
            next.items[pos].recompute_total();
        } else {
            next.items.remove(pos);
        }
        next.recalculate();
        Transition { state: next, changed: true, notices: vec![] }
    }

    /// Remove any line matching the key. Idempotent: removing an absent key
    /// still yields a (recalculated) state the caller may persist.
    pub fn remove_item(&self, key: &LineKey) -> Transition {
        let mut next = self.clone();
        let before = next.items.len();
        next.items.retain(|l| l.key() != *key);
        let changed = next.items.len() != before;
        next.recalculate();
        Transition { state: next, changed, notices: vec![] }
    }

    pub fn clear(&self) -> Transition {
        Transition {
            state: CartState::default(),
            changed: !self.is_empty(),
            notices: vec![],
        }
    }

    /// Refresh a line's stock figure. A held quantity above the new stock is
    /// clamped down; a new stock of zero removes the line (zero-stock lines
    /// must not exist).
    pub fn update_stock(&self, key: &LineKey, new_stock: u32) -> Transition {
        let mut next = self.clone();
        let Some(pos) = next.items.iter().position(|l| l.key() == *key) else {
            return Transition::unchanged(next);
        };
        let mut notices = vec![];
        if new_stock == 0 {
            notices.push(Notice::StockReduced { key: key.clone(), new_stock });
            next.items.remove(pos);
        } else {
            let line = &mut next.items[pos];
            line.stock_quantity = new_stock;
            if line.quantity > new_stock {
                notices.push(Notice::StockReduced { key: key.clone(), new_stock });
                line.quantity = new_stock;
                line.recompute_total();
            }
        }
        next.recalculate();
        Transition { state: next, changed: true, notices }
    }

    /// De-duplicated store descriptors referenced by the current lines, in
    /// first-seen order. Pure query; never mutates or persists.
    pub fn stores_represented(&self) -> Vec<StoreInfo> {
        let mut stores: Vec<StoreInfo> = vec![];
        for line in &self.items {
            if !stores.iter().any(|s| s.store_id == line.store.store_id) {
                stores.push(line.store.clone());
            }
        }
        stores
    }

    fn recalculate(&mut self) {
        self.total_quantity = self.items.iter().map(|l| l.quantity).sum();
        self.total_price = self.items.iter().map(|l| l.line_total).sum();
    }
}
