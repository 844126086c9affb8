//! Catalog and order sync between the ERP and NuOrder.
//!
//! Products and companies are pushed with forced upserts; pending orders are
//! pulled, turned into ERP sales orders and marked processed. A problem with
//! one item or order is logged and counted, never fatal to the batch.

mod erp;
mod orders;
mod products;

use std::ops::AddAssign;

use tracing::{error, info};

pub use erp::{
    CatalogItem, Customer, CustomerAddress, ErpError, ErpGateway, ItemFilter, SalesOrderDraft,
    SalesOrderLine,
};
pub use orders::OrderOutcome;
pub use products::ONE_SIZE;

use crate::client::{Client, Payload};
use crate::config::Profile;
use crate::error::{Error, Result};
use crate::marketplace::{endpoints, Address, Company, OrderStatus};

/// Sync options, read from the same profile section as the credentials.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncSettings {
    pub wholesale_price_list: String,
    pub retail_price_list: Option<String>,
    pub currency: String,
    pub season: Option<String>,
    pub size_attribute: String,
    pub color_attribute: String,
    pub pull_status: OrderStatus,
    pub processed_status: OrderStatus,
    pub gzip: bool,
}

impl Default for SyncSettings {
    fn default() -> Self {
        SyncSettings {
            wholesale_price_list: "Standard Selling".to_string(),
            retail_price_list: None,
            currency: "USD".to_string(),
            season: None,
            size_attribute: "Size".to_string(),
            color_attribute: "Colour".to_string(),
            pull_status: OrderStatus::Pending,
            processed_status: OrderStatus::Processed,
            gzip: false,
        }
    }
}

impl SyncSettings {
    pub fn from_profile(profile: &Profile<'_>) -> Result<Self> {
        let defaults = SyncSettings::default();
        Ok(SyncSettings {
            wholesale_price_list: profile
                .get_or("wholesale_price_list", &defaults.wholesale_price_list),
            retail_price_list: profile.get_optional("retail_price_list"),
            currency: profile.get_or("currency", &defaults.currency),
            season: profile.get_optional("season"),
            size_attribute: profile.get_or("size_attribute", &defaults.size_attribute),
            color_attribute: profile.get_or("color_attribute", &defaults.color_attribute),
            pull_status: parse_status(profile, "pull_status", defaults.pull_status)?,
            processed_status: parse_status(
                profile,
                "processed_status",
                defaults.processed_status,
            )?,
            gzip: profile.get_bool_or("gzip", defaults.gzip)?,
        })
    }
}

fn parse_status(profile: &Profile<'_>, key: &str, default: OrderStatus) -> Result<OrderStatus> {
    match profile.get_optional(key) {
        Some(raw) => raw
            .parse()
            .map_err(|e: String| Error::Config(config::ConfigError::Message(e))),
        None => Ok(default),
    }
}

/// Outcome counts of one sync run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub pushed: usize,
    pub skipped: usize,
    /// Orders in the ERP that NuOrder still lists as not processed.
    pub unmarked: usize,
    pub failed: usize,
}

impl AddAssign for SyncReport {
    fn add_assign(&mut self, other: Self) {
        self.pushed += other.pushed;
        self.skipped += other.skipped;
        self.unmarked += other.unmarked;
        self.failed += other.failed;
    }
}

/// Runs the sync against one NuOrder client and one ERP.
pub struct Orchestrator<'a, E: ErpGateway> {
    client: &'a Client,
    erp: &'a E,
    settings: SyncSettings,
}

impl<'a, E: ErpGateway> Orchestrator<'a, E> {
    pub fn new(client: &'a Client, erp: &'a E, settings: SyncSettings) -> Self {
        Orchestrator {
            client,
            erp,
            settings,
        }
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    /// Upsert every ERP customer as a NuOrder company.
    pub fn push_companies(&self) -> Result<SyncReport> {
        let mut report = SyncReport::default();
        for customer in self.erp.customers()? {
            if customer.disabled {
                report.skipped += 1;
                continue;
            }
            let company = self.map_customer(&customer);
            match self.client.put(
                endpoints::COMPANY_UPSERT,
                Some(Payload::json(&company)?),
                self.settings.gzip,
            ) {
                Ok(_) => {
                    info!(customer = %customer.name, "company pushed");
                    report.pushed += 1;
                }
                Err(e) => {
                    error!(customer = %customer.name, "company push failed: {}", e);
                    report.failed += 1;
                }
            }
        }
        info!(?report, "companies synced");
        Ok(report)
    }

    /// Products, then companies, then orders.
    pub fn run(&self) -> Result<SyncReport> {
        let mut report = self.push_products()?;
        report += self.push_companies()?;
        report += self.pull_orders()?;
        Ok(report)
    }

    fn map_customer(&self, customer: &Customer) -> Company {
        let mut company = Company::new(customer.customer_name.as_str(), customer.name.as_str());
        company.currency_code = Some(
            customer
                .default_currency
                .clone()
                .unwrap_or_else(|| self.settings.currency.clone()),
        );
        company.addresses = customer
            .addresses
            .iter()
            .map(|a| Address {
                line_1: a.address_line1.clone(),
                line_2: a.address_line2.clone(),
                city: a.city.clone(),
                state: a.state.clone(),
                zip: a.pincode.clone(),
                country: a.country.clone(),
                shipping: a.is_shipping_address,
                billing: a.is_primary_address,
            })
            .collect();
        company
    }
}
