use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Order workflow states that appear in order URLs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Approved,
    Processed,
    Shipped,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Approved => "approved",
            OrderStatus::Processed => "processed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "approved" => Ok(OrderStatus::Approved),
            "processed" => Ok(OrderStatus::Processed),
            "shipped" => Ok(OrderStatus::Shipped),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status `{}`", other)),
        }
    }
}

/// Entry of `GET /api/orders/{status}/list`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct OrderSummary {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub order_number: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Retailer {
    #[serde(default)]
    pub retailer_code: Option<String>,
    #[serde(default)]
    pub retailer_name: Option<String>,
}

/// One ordered size. `upc` is the barcode matched against the ERP.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct OrderSize {
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub upc: Option<String>,
    pub quantity: u32,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub style_number: Option<String>,
    #[serde(default)]
    pub sizes: Vec<OrderSize>,
}

/// Body of `GET /api/order/{id}`. Unknown fields are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub order_number: Option<String>,
    #[serde(default)]
    pub retailer: Retailer,
    #[serde(default)]
    pub currency_code: Option<String>,
    #[serde(default)]
    pub start_ship: Option<String>,
    #[serde(default)]
    pub end_ship: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
}

impl Order {
    /// Human-facing reference: the order number, else the id.
    pub fn reference(&self) -> &str {
        self.order_number.as_deref().unwrap_or(&self.id)
    }
}

// NuOrder sends order numbers as strings on some accounts and numbers on others.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use test_case::test_case;

    #[test_case("pending", OrderStatus::Pending)]
    #[test_case("Approved", OrderStatus::Approved)]
    #[test_case(" processed ", OrderStatus::Processed)]
    fn parses_status(input: &str, expected: OrderStatus) {
        assert_eq!(input.parse::<OrderStatus>().unwrap(), expected);
    }

    #[test]
    fn rejects_unknown_status() {
        assert!("open".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn decodes_order_and_ignores_unknown_fields() {
        let order: Order = serde_json::from_value(json!({
            "_id": "5b0d4e",
            "order_number": 1042,
            "retailer": {"retailer_code": "CUST-0001", "buyer": "ignored"},
            "currency_code": "USD",
            "line_items": [{
                "style_number": "STYLE-1",
                "sizes": [
                    {"size": "S", "upc": "7612345000012", "quantity": 2, "price": 10.5},
                    {"size": "M", "quantity": 1}
                ]
            }],
            "total": 22.0
        }))
        .unwrap();
        assert_eq!(order.reference(), "1042");
        assert_eq!(order.retailer.retailer_code.as_deref(), Some("CUST-0001"));
        let sizes = &order.line_items[0].sizes;
        assert_eq!(sizes[0].upc.as_deref(), Some("7612345000012"));
        assert_eq!(sizes[0].price, Some(dec!(10.5)));
        assert_eq!(sizes[1].upc, None);
        assert_eq!(sizes[1].price, None);
    }

    #[test]
    fn reference_falls_back_to_id() {
        let order: Order = serde_json::from_value(json!({"_id": "abc"})).unwrap();
        assert_eq!(order.reference(), "abc");
        assert!(order.line_items.is_empty());
    }

    #[test]
    fn summary_accepts_string_order_number() {
        let summary: OrderSummary =
            serde_json::from_value(json!({"_id": "x", "order_number": "PO-7"})).unwrap();
        assert_eq!(summary.order_number.as_deref(), Some("PO-7"));
    }
}
