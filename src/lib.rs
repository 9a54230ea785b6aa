//! Storefront cart domain
//!
//! Client-side cart, wishlist and checkout logic for the storefront: the
//! presentation layer calls into these stores and renders what comes back.
//!
//! ## Features
//! - Stock-aware cart with quantity clamping and derived totals
//! - Wishlist keyed by product id
//! - Injected persistence over a local-storage-shaped key-value store
//! - Delivery-radius evaluation (driving distance with haversine fallback)
//! - Checkout flow that clears the cart only on accepted orders
//!
//! Cart operations never fail: invalid adds are silently rejected and
//! stock-insufficient requests are clamped, with structured [`Notice`]s
//! reporting what happened.
//!
//! [`Notice`]: domain::events::Notice

pub mod api;
pub mod checkout;
pub mod delivery;
pub mod domain;
pub mod persistence;
pub mod store;

pub use domain::aggregates::{CartCandidate, CartLine, CartState, WishlistItem, WishlistState};
pub use domain::events::Notice;
pub use domain::value_objects::{GeoPoint, LineKey, StoreInfo};
pub use persistence::{
    FileKv, KeyValueStore, KvPersistence, MemoryKv, PersistenceAdapter, CART_STORAGE_KEY,
    WISHLIST_STORAGE_KEY,
};
pub use store::{CartStore, Outcome, WishlistStore};
