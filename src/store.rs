//! Stateful cart and wishlist stores
//!
//! Thin stateful wrappers over the pure aggregate transitions: apply the
//! transition, swap the owned state, persist through the injected adapter,
//! and hand the caller an [`Outcome`] with the new state and any notices.
//!
//! Persistence rules per operation:
//! - add / increase / decrease / update_stock write only when the transition
//!   actually changed state;
//! - remove and clear write unconditionally (both are idempotent);
//! - queries and `refresh_from_persistence` never write.

use tracing::debug;

use crate::domain::aggregates::{CartCandidate, CartState, Transition, WishlistItem, WishlistState};
use crate::domain::events::Notice;
use crate::domain::value_objects::{LineKey, StoreInfo};
use crate::persistence::PersistenceAdapter;

/// What a mutating cart operation hands back to the UI layer.
#[derive(Clone, Debug)]
pub struct Outcome {
    pub state: CartState,
    pub notices: Vec<Notice>,
}

pub struct CartStore<A: PersistenceAdapter<CartState>> {
    state: CartState,
    adapter: A,
}

impl<A: PersistenceAdapter<CartState>> CartStore<A> {
    /// Open the session cart, hydrating from whatever the adapter holds.
    pub fn open(adapter: A) -> Self {
        let state = adapter.load();
        Self { state, adapter }
    }

    pub fn state(&self) -> &CartState {
        &self.state
    }

    pub fn stores_represented(&self) -> Vec<StoreInfo> {
        self.state.stores_represented()
    }

    pub fn add_item(&mut self, candidate: &CartCandidate) -> Outcome {
        debug!(product = %candidate.product_id, "cart add_item");
        let t = self.state.add_item(candidate);
        self.apply(t, false)
    }

    pub fn increase_quantity(&mut self, key: &LineKey) -> Outcome {
        debug!(%key, "cart increase_quantity");
        let t = self.state.increase_quantity(key);
        self.apply(t, false)
    }

    pub fn decrease_quantity(&mut self, key: &LineKey) -> Outcome {
        debug!(%key, "cart decrease_quantity");
        let t = self.state.decrease_quantity(key);
        self.apply(t, false)
    }

    pub fn remove_item(&mut self, key: &LineKey) -> Outcome {
        debug!(%key, "cart remove_item");
        let t = self.state.remove_item(key);
        self.apply(t, true)
    }

    pub fn clear(&mut self) -> Outcome {
        debug!("cart clear");
        let t = self.state.clear();
        self.apply(t, true)
    }

    pub fn update_stock(&mut self, key: &LineKey, new_stock: u32) -> Outcome {
        debug!(%key, new_stock, "cart update_stock");
        let t = self.state.update_stock(key, new_stock);
        self.apply(t, false)
    }

    /// Overwrite in-memory state from the adapter without writing back; the
    /// manual resync point for cross-tab divergence (last writer wins).
    pub fn refresh_from_persistence(&mut self) -> &CartState {
        self.state = self.adapter.load();
        &self.state
    }

    fn apply(&mut self, transition: Transition, persist_always: bool) -> Outcome {
        let Transition { state, changed, notices } = transition;
        self.state = state;
        if changed || persist_always {
            self.adapter.save(&self.state);
        }
        Outcome { state: self.state.clone(), notices }
    }
}

pub struct WishlistStore<A: PersistenceAdapter<WishlistState>> {
    state: WishlistState,
    adapter: A,
}

impl<A: PersistenceAdapter<WishlistState>> WishlistStore<A> {
    pub fn open(adapter: A) -> Self {
        let state = adapter.load();
        Self { state, adapter }
    }

    pub fn state(&self) -> &WishlistState {
        &self.state
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.state.contains(product_id)
    }

    pub fn add(&mut self, item: WishlistItem) -> &WishlistState {
        let (next, changed) = self.state.add(item);
        self.swap(next, changed, false)
    }

    pub fn remove(&mut self, product_id: &str) -> &WishlistState {
        let (next, changed) = self.state.remove(product_id);
        self.swap(next, changed, true)
    }

    pub fn clear(&mut self) -> &WishlistState {
        let (next, changed) = self.state.clear();
        self.swap(next, changed, true)
    }

    pub fn refresh_from_persistence(&mut self) -> &WishlistState {
        self.state = self.adapter.load();
        &self.state
    }

    fn swap(&mut self, next: WishlistState, changed: bool, persist_always: bool) -> &WishlistState {
        self.state = next;
        if changed || persist_always {
            self.adapter.save(&self.state);
        }
        &self.state
    }
}
