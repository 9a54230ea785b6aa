//! Interfaces to the storefront's REST backend
//!
//! The cart core never performs network I/O itself. These DTOs and traits
//! describe what the backend exposes; the UI layer implements them over HTTP,
//! awaits the calls, and feeds results into the synchronous store mutators.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::value_objects::StoreInfo;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("not found")]
    NotFound,

    #[error("rejected: {0}")]
    Rejected(String),

    #[error("transport error: {0}")]
    Transport(String),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub variants: Vec<Variant>,
    pub store_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub stock_quantity: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    pub total_price: Decimal,
    pub shipping_address: Address,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: String,
    pub variant_id: String,
    pub store_id: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub items: Vec<OrderItem>,
    pub total_price: Decimal,
    pub shipping_address: Address,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: Option<Uuid>,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub country: String,
    pub postal_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryCheckRequest {
    pub address: String,
    pub store_ids: Vec<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryCheckResponse {
    pub is_deliverable: bool,
    pub message: String,
    pub store: Option<StoreInfo>,
    pub distance: Option<f64>,
}

/// Product/variant lookups, used by the stock-refresh flow.
pub trait CatalogApi {
    async fn variant_stock(&self, product_id: &str, variant_id: &str) -> Result<u32, ApiError>;
}

/// Order placement and tracking.
pub trait OrderApi {
    async fn create_order(&self, request: &CreateOrderRequest) -> Result<Order, ApiError>;
    async fn get_order(&self, id: Uuid) -> Result<Order, ApiError>;
    async fn list_orders(&self) -> Result<Vec<Order>, ApiError>;
    async fn cancel_order(&self, id: Uuid) -> Result<Order, ApiError>;
}

/// Saved delivery addresses.
pub trait AddressApi {
    async fn create_address(&self, address: &Address) -> Result<Address, ApiError>;
    async fn list_addresses(&self) -> Result<Vec<Address>, ApiError>;
    async fn update_address(&self, address: &Address) -> Result<Address, ApiError>;
    async fn delete_address(&self, id: Uuid) -> Result<(), ApiError>;
}

/// Server-side delivery-availability check.
pub trait DeliveryApi {
    async fn check_delivery(
        &self,
        request: &DeliveryCheckRequest,
    ) -> Result<DeliveryCheckResponse, ApiError>;
}
