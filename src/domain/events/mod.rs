//! Diagnostic notices raised by cart transitions
//!
//! Rejected and clamped operations never fail; they report what happened
//! through these notices so the UI can render a message without relying on
//! a logging side channel.

use crate::domain::value_objects::LineKey;
use serde::Serialize;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Notice {
    /// Add rejected: price missing, zero or negative.
    PriceRejected { product_id: String },
    /// Add rejected: neither `storeId` nor `store.id` present.
    StoreUnresolved { product_id: String },
    /// Add rejected: no stock available for a fresh line.
    OutOfStock { key: LineKey },
    /// Requested quantity reduced to what stock could satisfy.
    QuantityClamped { key: LineKey, requested: u32, granted: u32 },
    /// Increase ignored: the line already holds all available stock.
    AtStockLimit { key: LineKey, stock: u32 },
    /// Stock update forced the held quantity down (or removed the line
    /// entirely when the new stock is zero).
    StockReduced { key: LineKey, new_stock: u32 },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PriceRejected { product_id } => {
                write!(f, "{product_id}: item has no valid price and was not added")
            }
            Self::StoreUnresolved { product_id } => {
                write!(f, "{product_id}: no store could be resolved for this item")
            }
            Self::OutOfStock { key } => write!(f, "{key}: out of stock"),
            Self::QuantityClamped { key, requested, granted } => {
                write!(f, "{key}: only {granted} of {requested} requested could be added")
            }
            Self::AtStockLimit { key, stock } => {
                write!(f, "{key}: already at the stock limit of {stock}")
            }
            Self::StockReduced { key, new_stock } => {
                write!(f, "{key}: stock dropped to {new_stock}")
            }
        }
    }
}
