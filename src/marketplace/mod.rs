//! Typed payloads for the NuOrder REST surface used by the sync.
//!
//! Each endpoint gets its own serde struct so the field contract (required
//! vs. optional, defaults) is checked at compile time instead of being
//! assembled as loose JSON maps.

mod company;
pub mod endpoints;
mod order;
mod product;

pub use company::{Address, Company};
pub use order::{LineItem, Order, OrderSize, OrderStatus, OrderSummary, Retailer};
pub use product::{Price, Pricing, Product, Size};
