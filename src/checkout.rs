//! Checkout and stock-refresh flows
//!
//! The async orchestration the UI layer drives: network calls are awaited
//! here, then their results run through the synchronous store mutators. The
//! cart is cleared only after the backend accepts the order.

use thiserror::Error;
use tracing::{debug, warn};

use crate::api::{
    Address, ApiError, CatalogApi, CreateOrderRequest, DeliveryApi, DeliveryCheckRequest, Order,
    OrderApi, OrderItem,
};
use crate::domain::aggregates::CartState;
use crate::domain::events::Notice;
use crate::persistence::PersistenceAdapter;
use crate::store::{CartStore, Outcome};

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("not deliverable: {0}")]
    NotDeliverable(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Re-query the catalog for every line's stock and fold the results into the
/// cart. Lines the catalog no longer knows are left untouched.
pub async fn refresh_stock<A, C>(cart: &mut CartStore<A>, catalog: &C) -> Outcome
where
    A: PersistenceAdapter<CartState>,
    C: CatalogApi,
{
    let keys: Vec<_> = cart.state().items.iter().map(|l| l.key()).collect();
    let mut notices: Vec<Notice> = vec![];
    for key in keys {
        match catalog.variant_stock(&key.product_id, &key.variant_id).await {
            Ok(stock) => notices.extend(cart.update_stock(&key, stock).notices),
            Err(err) => warn!(%key, %err, "stock refresh skipped for line"),
        }
    }
    Outcome { state: cart.state().clone(), notices }
}

/// Order placement over the backend APIs.
pub struct Checkout<'a, O, D> {
    orders: &'a O,
    delivery: &'a D,
}

impl<'a, O: OrderApi, D: DeliveryApi> Checkout<'a, O, D> {
    pub fn new(orders: &'a O, delivery: &'a D) -> Self {
        Self { orders, delivery }
    }

    /// Place an order for the current cart contents: delivery check against
    /// the stores represented in the cart, then submission. A successful
    /// placement clears the cart; any failure leaves it intact.
    pub async fn place_order<A>(
        &self,
        cart: &mut CartStore<A>,
        address: &Address,
    ) -> Result<Order, CheckoutError>
    where
        A: PersistenceAdapter<CartState>,
    {
        if cart.state().is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let check = DeliveryCheckRequest {
            address: format!("{}, {}", address.line1, address.city),
            store_ids: cart
                .stores_represented()
                .into_iter()
                .map(|s| s.store_id)
                .collect(),
            latitude: address.latitude,
            longitude: address.longitude,
        };
        let availability = self.delivery.check_delivery(&check).await?;
        if !availability.is_deliverable {
            return Err(CheckoutError::NotDeliverable(availability.message));
        }

        let request = CreateOrderRequest {
            items: cart
                .state()
                .items
                .iter()
                .map(|l| OrderItem {
                    product_id: l.product_id.clone(),
                    variant_id: l.variant_id.clone(),
                    store_id: l.store.store_id.clone(),
                    quantity: l.quantity,
                    unit_price: l.unit_price,
                })
                .collect(),
            total_price: cart.state().total_price,
            shipping_address: address.clone(),
        };
        let order = self.orders.create_order(&request).await?;
        debug!(order_id = %order.id, "order placed, clearing cart");
        cart.clear();
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{DeliveryCheckResponse, OrderStatus};
    use crate::domain::aggregates::CartCandidate;
    use crate::persistence::{KvPersistence, MemoryKv, CART_STORAGE_KEY};
    use chrono::Utc;
    use rust_decimal::Decimal;
    use std::sync::Arc;
    use uuid::Uuid;

    struct StubOrders {
        reject: bool,
    }

    impl OrderApi for StubOrders {
        async fn create_order(&self, request: &CreateOrderRequest) -> Result<Order, ApiError> {
            if self.reject {
                return Err(ApiError::Rejected("payment declined".into()));
            }
            let now = Utc::now();
            Ok(Order {
                id: Uuid::new_v4(),
                status: OrderStatus::Pending,
                items: request.items.clone(),
                total_price: request.total_price,
                shipping_address: request.shipping_address.clone(),
                created_at: now,
                updated_at: now,
            })
        }

        async fn get_order(&self, _id: Uuid) -> Result<Order, ApiError> {
            Err(ApiError::NotFound)
        }

        async fn list_orders(&self) -> Result<Vec<Order>, ApiError> {
            Ok(vec![])
        }

        async fn cancel_order(&self, _id: Uuid) -> Result<Order, ApiError> {
            Err(ApiError::NotFound)
        }
    }

    struct StubDelivery {
        deliverable: bool,
    }

    impl DeliveryApi for StubDelivery {
        async fn check_delivery(
            &self,
            _request: &DeliveryCheckRequest,
        ) -> Result<DeliveryCheckResponse, ApiError> {
            Ok(DeliveryCheckResponse {
                is_deliverable: self.deliverable,
                message: if self.deliverable {
                    "ok".into()
                } else {
                    "too far".into()
                },
                store: None,
                distance: None,
            })
        }
    }

    struct StubCatalog;

    impl CatalogApi for StubCatalog {
        async fn variant_stock(&self, _product_id: &str, variant_id: &str) -> Result<u32, ApiError> {
            match variant_id {
                "v1" => Ok(1),
                "v2" => Ok(10),
                _ => Err(ApiError::NotFound),
            }
        }
    }

    fn cart_with_items() -> CartStore<KvPersistence<CartState>> {
        let kv = Arc::new(MemoryKv::new());
        let mut cart = CartStore::open(KvPersistence::new(kv, CART_STORAGE_KEY));
        cart.add_item(&CartCandidate {
            product_id: "p1".into(),
            variant_id: "v1".into(),
            quantity: Some(3),
            price: Some(Decimal::new(10, 0)),
            stock_quantity: 5,
            store_id: Some("s1".into()),
            ..Default::default()
        });
        cart.add_item(&CartCandidate {
            product_id: "p2".into(),
            variant_id: "v2".into(),
            quantity: Some(1),
            price: Some(Decimal::new(7, 0)),
            stock_quantity: 5,
            store_id: Some("s1".into()),
            ..Default::default()
        });
        cart
    }

    fn address() -> Address {
        Address {
            line1: "1 Market St".into(),
            city: "Lagos".into(),
            country: "NG".into(),
            latitude: Some(6.5244),
            longitude: Some(3.3792),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn successful_order_clears_the_cart() {
        let mut cart = cart_with_items();
        let orders = StubOrders { reject: false };
        let delivery = StubDelivery { deliverable: true };
        let order = Checkout::new(&orders, &delivery)
            .place_order(&mut cart, &address())
            .await
            .unwrap();
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.total_price, Decimal::new(37, 0));
        assert!(cart.state().is_empty());
    }

    #[tokio::test]
    async fn failed_delivery_check_keeps_the_cart() {
        let mut cart = cart_with_items();
        let orders = StubOrders { reject: false };
        let delivery = StubDelivery { deliverable: false };
        let err = Checkout::new(&orders, &delivery)
            .place_order(&mut cart, &address())
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::NotDeliverable(ref m) if m == "too far"));
        assert_eq!(cart.state().items.len(), 2);
    }

    #[tokio::test]
    async fn rejected_order_keeps_the_cart() {
        let mut cart = cart_with_items();
        let orders = StubOrders { reject: true };
        let delivery = StubDelivery { deliverable: true };
        let err = Checkout::new(&orders, &delivery)
            .place_order(&mut cart, &address())
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::Api(_)));
        assert_eq!(cart.state().items.len(), 2);
    }

    #[tokio::test]
    async fn empty_cart_cannot_check_out() {
        let kv = Arc::new(MemoryKv::new());
        let mut cart: CartStore<KvPersistence<CartState>> =
            CartStore::open(KvPersistence::new(kv, CART_STORAGE_KEY));
        let orders = StubOrders { reject: false };
        let delivery = StubDelivery { deliverable: true };
        let err = Checkout::new(&orders, &delivery)
            .place_order(&mut cart, &address())
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
    }

    #[tokio::test]
    async fn refresh_stock_clamps_and_collects_notices() {
        let mut cart = cart_with_items();
        let out = refresh_stock(&mut cart, &StubCatalog).await;
        // p1 held 3 but stock dropped to 1; p2's stock rose without clamping.
        assert_eq!(out.notices.len(), 1);
        assert_eq!(out.state.items[0].quantity, 1);
        assert_eq!(out.state.items[0].stock_quantity, 1);
        assert_eq!(out.state.items[1].quantity, 1);
        assert_eq!(out.state.items[1].stock_quantity, 10);
        assert_eq!(out.state.total_price, Decimal::new(17, 0));
    }

    #[tokio::test]
    async fn refresh_stock_leaves_unknown_variants_untouched() {
        let kv = Arc::new(MemoryKv::new());
        let mut cart: CartStore<KvPersistence<CartState>> =
            CartStore::open(KvPersistence::new(kv, CART_STORAGE_KEY));
        cart.add_item(&CartCandidate {
            product_id: "p9".into(),
            variant_id: "gone".into(),
            quantity: Some(2),
            price: Some(Decimal::new(5, 0)),
            stock_quantity: 4,
            store_id: Some("s1".into()),
            ..Default::default()
        });
        let out = refresh_stock(&mut cart, &StubCatalog).await;
        assert!(out.notices.is_empty());
        assert_eq!(out.state.items[0].stock_quantity, 4);
        assert_eq!(out.state.items[0].quantity, 2);
    }
}
