use tracing::{error, info, warn};

use super::{CatalogItem, ErpGateway, ItemFilter, Orchestrator, SyncReport};
use crate::client::Payload;
use crate::error::Result;
use crate::marketplace::{endpoints, Price, Pricing, Product, Size};

/// Size label for items sold without size variants ("one size").
pub const ONE_SIZE: &str = "OS";

impl<E: ErpGateway> Orchestrator<'_, E> {
    /// Upsert every published sales template and standalone item.
    ///
    /// Listing templates or standalone items failing aborts the run; anything
    /// after that is counted per product.
    pub fn push_products(&self) -> Result<SyncReport> {
        let mut report = SyncReport::default();

        for template in self.erp.list_items(&ItemFilter::templates())? {
            let variants = match self
                .erp
                .list_items(&ItemFilter::variants_of(&template.item_code))
            {
                Ok(variants) => variants,
                Err(e) => {
                    error!(item = %template.item_code, "could not list variants: {}", e);
                    report.failed += 1;
                    continue;
                }
            };
            match self.template_product(&template, &variants) {
                Ok(Some(product)) => self.upsert_product(&product, &mut report),
                Ok(None) => report.skipped += 1,
                Err(e) => {
                    error!(item = %template.item_code, "could not map product: {}", e);
                    report.failed += 1;
                }
            }
        }

        for item in self.erp.list_items(&ItemFilter::standalone())? {
            match self.standalone_product(&item) {
                Ok(Some(product)) => self.upsert_product(&product, &mut report),
                Ok(None) => report.skipped += 1,
                Err(e) => {
                    error!(item = %item.item_code, "could not map product: {}", e);
                    report.failed += 1;
                }
            }
        }

        info!(?report, "products synced");
        Ok(report)
    }

    fn upsert_product(&self, product: &Product, report: &mut SyncReport) {
        let result = Payload::json(product).and_then(|body| {
            self.client
                .put(endpoints::PRODUCT_UPSERT, Some(body), self.settings.gzip)
        });
        match result {
            Ok(_) => {
                info!(style = %product.style_number, sizes = product.sizes.len(), "product pushed");
                report.pushed += 1;
            }
            Err(e) => {
                error!(style = %product.style_number, "product push failed: {}", e);
                report.failed += 1;
            }
        }
    }

    /// One product for a template, one size per priced variant.
    ///
    /// `None` when no variant has a price.
    pub(crate) fn template_product(
        &self,
        template: &CatalogItem,
        variants: &[CatalogItem],
    ) -> Result<Option<Product>> {
        let mut product = self.base_product(template);
        for variant in variants {
            let Some(price) = self.price_for(variant)? else {
                continue;
            };
            let size = variant
                .attributes
                .get(&self.settings.size_attribute)
                .cloned()
                .unwrap_or_else(|| variant.item_code.clone());
            if product.pricing.is_empty() {
                product.pricing = self.pricing(price.clone());
            }
            product.sizes.push(Size {
                size,
                upc: variant.barcode.clone(),
                pricing: self.pricing(price),
            });
        }
        if product.sizes.is_empty() {
            warn!(item = %template.item_code, "no priced variants; skipped");
            return Ok(None);
        }
        Ok(Some(product))
    }

    /// One-size product for an item without variants.
    pub(crate) fn standalone_product(&self, item: &CatalogItem) -> Result<Option<Product>> {
        let Some(price) = self.price_for(item)? else {
            return Ok(None);
        };
        let mut product = self.base_product(item);
        product.pricing = self.pricing(price.clone());
        product.sizes.push(Size {
            size: ONE_SIZE.to_string(),
            upc: item.barcode.clone(),
            pricing: self.pricing(price),
        });
        Ok(Some(product))
    }

    fn base_product(&self, item: &CatalogItem) -> Product {
        let mut product = Product::new(item.item_code.as_str(), item.item_name.as_str());
        product.category = item.item_group.clone();
        product.description = item.description.clone();
        product.season = self.settings.season.clone();
        product.color = item.attributes.get(&self.settings.color_attribute).cloned();
        product
    }

    /// Wholesale (required) and retail (optional) price of `item`.
    ///
    /// A missing wholesale price is logged and yields `None`.
    fn price_for(&self, item: &CatalogItem) -> Result<Option<Price>> {
        let list = &self.settings.wholesale_price_list;
        let Some(wholesale) = self.erp.item_price(&item.item_code, list)? else {
            warn!(item = %item.item_code, price_list = %list, "no price; skipped");
            return Ok(None);
        };
        let retail = match &self.settings.retail_price_list {
            Some(list) => self.erp.item_price(&item.item_code, list)?,
            None => None,
        };
        Ok(Some(Price::new(wholesale, retail)))
    }

    fn pricing(&self, price: Price) -> Pricing {
        let mut pricing = Pricing::new();
        pricing.insert(self.settings.currency.clone(), price);
        pricing
    }
}
