//! Endpoint paths. Dynamic segments are percent-encoded.

use crate::marketplace::OrderStatus;
use crate::util::encode_path_segment;

pub const PRODUCT_UPSERT: &str = "/api/product/new/force";
pub const COMPANY_UPSERT: &str = "/api/company/new/force";

/// `GET /api/orders/{status}/list`
pub fn orders_list(status: OrderStatus) -> String {
    format!("/api/orders/{}/list", status.as_str())
}

/// `GET /api/order/{id}`
pub fn order(id: &str) -> String {
    format!("/api/order/{}", encode_path_segment(id))
}

/// `POST /api/order/{id}/{status}`
pub fn order_status(id: &str, status: OrderStatus) -> String {
    format!("/api/order/{}/{}", encode_path_segment(id), status.as_str())
}
