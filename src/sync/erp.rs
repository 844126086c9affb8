//! The ERP side of the sync, seen through a narrow trait.
//!
//! The ERP's document model, queue and schema stay outside this crate; an
//! embedding application implements [`ErpGateway`] over its own storage.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("ERP: {message}")]
pub struct ErpError {
    pub message: String,
}

impl ErpError {
    pub fn new(message: impl Into<String>) -> Self {
        ErpError {
            message: message.into(),
        }
    }
}

/// Item master record (template, variant or standalone item).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatalogItem {
    pub item_code: String,
    pub item_name: String,
    pub item_group: Option<String>,
    pub description: Option<String>,
    /// Template this item is a variant of.
    pub variant_of: Option<String>,
    pub has_variants: bool,
    pub barcode: Option<String>,
    /// Variant attributes such as `Size` or `Colour`.
    pub attributes: BTreeMap<String, String>,
    pub disabled: bool,
    pub is_sales_item: bool,
    pub published: bool,
}

/// Which items to list. `None` means "do not filter on this".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemFilter {
    pub has_variants: Option<bool>,
    /// `Some(None)` selects items that are not variants at all.
    pub variant_of: Option<Option<String>>,
    pub include_disabled: bool,
    pub sales_items_only: bool,
    pub published_only: bool,
}

impl ItemFilter {
    /// Published sales templates.
    pub fn templates() -> Self {
        ItemFilter {
            has_variants: Some(true),
            variant_of: None,
            ..Self::published_sales_items()
        }
    }

    /// Published sales variants of `template`.
    pub fn variants_of(template: &str) -> Self {
        ItemFilter {
            has_variants: Some(false),
            variant_of: Some(Some(template.to_string())),
            ..Self::published_sales_items()
        }
    }

    /// Published sales items that are neither a template nor a variant.
    pub fn standalone() -> Self {
        ItemFilter {
            has_variants: Some(false),
            variant_of: Some(None),
            ..Self::published_sales_items()
        }
    }

    fn published_sales_items() -> Self {
        ItemFilter {
            has_variants: None,
            variant_of: None,
            include_disabled: false,
            sales_items_only: true,
            published_only: true,
        }
    }

    /// Whether `item` passes this filter.
    pub fn matches(&self, item: &CatalogItem) -> bool {
        self.has_variants.map_or(true, |h| item.has_variants == h)
            && self
                .variant_of
                .as_ref()
                .map_or(true, |v| item.variant_of.as_deref() == v.as_deref())
            && (self.include_disabled || !item.disabled)
            && (!self.sales_items_only || item.is_sales_item)
            && (!self.published_only || item.published)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CustomerAddress {
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: Option<String>,
    pub pincode: String,
    pub country: String,
    pub is_shipping_address: bool,
    pub is_primary_address: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Customer {
    /// ERP id; doubles as the marketplace company code.
    pub name: String,
    pub customer_name: String,
    pub default_currency: Option<String>,
    pub disabled: bool,
    pub addresses: Vec<CustomerAddress>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SalesOrderLine {
    pub item_code: String,
    pub qty: u32,
    pub rate: Option<Decimal>,
}

/// Sales order to be inserted into the ERP for one marketplace order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SalesOrderDraft {
    pub customer: String,
    /// Marketplace order reference, kept as the customer's PO number.
    pub po_no: String,
    pub marketplace_order_id: String,
    pub currency: Option<String>,
    pub delivery_date: Option<String>,
    pub notes: Option<String>,
    pub items: Vec<SalesOrderLine>,
}

/// Everything the sync needs from the ERP.
pub trait ErpGateway {
    fn list_items(&self, filter: &ItemFilter) -> Result<Vec<CatalogItem>, ErpError>;

    fn item_price(&self, item_code: &str, price_list: &str) -> Result<Option<Decimal>, ErpError>;

    fn customers(&self) -> Result<Vec<Customer>, ErpError>;

    fn item_code_for_barcode(&self, barcode: &str) -> Result<Option<String>, ErpError>;

    /// Name of the sales order already carrying this marketplace order id.
    fn sales_order_for(&self, marketplace_order_id: &str) -> Result<Option<String>, ErpError>;

    /// Insert and submit; returns the new sales order's name.
    fn insert_sales_order(&self, order: &SalesOrderDraft) -> Result<String, ErpError>;
}
