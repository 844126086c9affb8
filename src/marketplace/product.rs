use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Prices keyed by ISO currency code, e.g. `"USD"`.
pub type Pricing = BTreeMap<String, Price>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    #[serde(with = "rust_decimal::serde::float")]
    pub wholesale: Decimal,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub retail: Option<Decimal>,
    #[serde(default)]
    pub disabled: bool,
}

impl Price {
    pub fn new(wholesale: Decimal, retail: Option<Decimal>) -> Self {
        Price {
            wholesale,
            retail,
            disabled: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub size: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upc: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub pricing: Pricing,
}

/// Body of `PUT /api/product/new/force` (create or replace by unique key).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub style_number: String,
    pub name: String,
    pub external_id: String,
    pub unique_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub sizes: Vec<Size>,
    /// Style-level pricing; NuOrder shows it when a size has none of its own.
    #[serde(default)]
    pub pricing: Pricing,
    #[serde(default)]
    pub available_now: bool,
    #[serde(default)]
    pub cancelled: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

impl Product {
    /// Active product whose style number, external id and unique key are all
    /// `style_number`.
    pub fn new(style_number: impl Into<String>, name: impl Into<String>) -> Self {
        let style_number = style_number.into();
        Product {
            external_id: style_number.clone(),
            unique_key: style_number.clone(),
            brand_id: Some(style_number.clone()),
            style_number,
            name: name.into(),
            season: None,
            color: None,
            category: None,
            description: None,
            sizes: Vec::new(),
            pricing: Pricing::new(),
            available_now: false,
            cancelled: false,
            archived: false,
            active: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn serializes_prices_as_numbers() {
        let mut pricing = Pricing::new();
        pricing.insert("USD".to_string(), Price::new(dec!(10), Some(dec!(12.5))));
        let value = serde_json::to_value(&pricing).unwrap();
        assert_eq!(
            value,
            json!({"USD": {"wholesale": 10.0, "retail": 12.5, "disabled": false}})
        );
    }

    #[test]
    fn skips_absent_optional_fields() {
        let mut product = Product::new("STYLE-1", "Linen shirt");
        product.sizes.push(Size {
            size: "OS".to_string(),
            upc: None,
            pricing: Pricing::new(),
        });
        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["style_number"], "STYLE-1");
        assert_eq!(value["unique_key"], "STYLE-1");
        assert_eq!(value["brand_id"], "STYLE-1");
        assert_eq!(value["active"], true);
        assert!(value.get("season").is_none());
        assert!(value.get("description").is_none());
        assert_eq!(value["sizes"], json!([{"size": "OS"}]));
    }

    #[test]
    fn reads_back_integer_prices() {
        let price: Price = serde_json::from_value(json!({"wholesale": 10})).unwrap();
        assert_eq!(price.wholesale, dec!(10));
        assert_eq!(price.retail, None);
        assert!(!price.disabled);
    }
}
