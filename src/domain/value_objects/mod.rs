//! Value objects for the cart domain

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default delivery radius in kilometres for stores that do not declare one.
pub const DEFAULT_DELIVERY_RADIUS_KM: f64 = 10.0;

/// Composite key identifying a unique cart line: one line per
/// product + variant + store combination.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineKey {
    pub product_id: String,
    pub variant_id: String,
    pub store_id: String,
}

impl LineKey {
    pub fn new(
        product_id: impl Into<String>,
        variant_id: impl Into<String>,
        store_id: impl Into<String>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            variant_id: variant_id.into(),
            store_id: store_id.into(),
        }
    }
}

impl fmt::Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.product_id, self.variant_id, self.store_id)
    }
}

/// Geographic point in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Store descriptor carried on every cart line and used by the
/// delivery-availability check.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreInfo {
    pub store_id: String,
    pub store_name: String,
    pub store_location: Option<GeoPoint>,
    pub delivery_radius: f64,
}

impl StoreInfo {
    pub fn new(store_id: impl Into<String>, store_name: impl Into<String>) -> Self {
        Self {
            store_id: store_id.into(),
            store_name: store_name.into(),
            store_location: None,
            delivery_radius: DEFAULT_DELIVERY_RADIUS_KM,
        }
    }

    pub fn with_location(mut self, location: GeoPoint) -> Self {
        self.store_location = Some(location);
        self
    }

    pub fn with_delivery_radius(mut self, radius_km: f64) -> Self {
        self.delivery_radius = radius_km;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_key_equality_covers_all_three_parts() {
        let a = LineKey::new("p1", "v1", "s1");
        assert_eq!(a, LineKey::new("p1", "v1", "s1"));
        assert_ne!(a, LineKey::new("p1", "v2", "s1"));
        assert_ne!(a, LineKey::new("p1", "v1", "s2"));
    }

    #[test]
    fn store_info_defaults_radius() {
        let s = StoreInfo::new("s1", "Main St");
        assert_eq!(s.delivery_radius, DEFAULT_DELIVERY_RADIUS_KM);
        assert!(s.store_location.is_none());
    }
}
