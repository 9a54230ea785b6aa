//! Domain aggregates

pub mod cart;
pub mod wishlist;

pub use cart::{CartCandidate, CartLine, CartState, StoreDescriptor, Transition};
pub use wishlist::{WishlistItem, WishlistState};
