//! Delivery-radius evaluation
//!
//! Distance to a store is the driving distance when a provider can supply
//! one, falling back to great-circle (haversine) distance otherwise. A
//! customer is deliverable when at least one represented store's delivery
//! radius covers them; the nearest such store wins.

use serde::Serialize;

use crate::domain::value_objects::{GeoPoint, StoreInfo};

/// Mean Earth radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points, in kilometres.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Optional road-network distance source. Answering `None` falls the
/// evaluation back to [`haversine_km`].
pub trait DistanceProvider {
    fn driving_km(&self, from: GeoPoint, to: GeoPoint) -> Option<f64>;
}

/// Provider with no road-network data; everything falls back to haversine.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreatCircle;

impl DistanceProvider for GreatCircle {
    fn driving_km(&self, _from: GeoPoint, _to: GeoPoint) -> Option<f64> {
        None
    }
}

/// Outcome of a delivery check, mirroring the availability endpoint's
/// response shape.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryDecision {
    pub is_deliverable: bool,
    pub message: String,
    pub store: Option<StoreInfo>,
    pub distance_km: Option<f64>,
}

/// Evaluate deliverability of `customer` against the given stores. Stores
/// without a known location are skipped.
pub fn check_delivery(
    stores: &[StoreInfo],
    customer: GeoPoint,
    provider: &impl DistanceProvider,
) -> DeliveryDecision {
    let mut nearest: Option<(f64, &StoreInfo)> = None;
    let mut nearest_covering: Option<(f64, &StoreInfo)> = None;
    for store in stores {
        let Some(location) = store.store_location else {
            continue;
        };
        let distance = provider
            .driving_km(location, customer)
            .unwrap_or_else(|| haversine_km(location, customer));
        if nearest.map_or(true, |(best, _)| distance < best) {
            nearest = Some((distance, store));
        }
        if distance <= store.delivery_radius
            && nearest_covering.map_or(true, |(best, _)| distance < best)
        {
            nearest_covering = Some((distance, store));
        }
    }

    match (nearest_covering, nearest) {
        (Some((distance, store)), _) => DeliveryDecision {
            is_deliverable: true,
            message: format!("{} delivers to this location", store.store_name),
            store: Some(store.clone()),
            distance_km: Some(distance),
        },
        (None, Some((distance, store))) => DeliveryDecision {
            is_deliverable: false,
            message: format!(
                "{} is {distance:.1} km away, outside its {} km delivery radius",
                store.store_name, store.delivery_radius
            ),
            store: Some(store.clone()),
            distance_km: Some(distance),
        },
        (None, None) => DeliveryDecision {
            is_deliverable: false,
            message: "No store with a known location serves this cart".into(),
            store: None,
            distance_km: None,
        },
    }
}
