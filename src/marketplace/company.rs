use serde::{Deserialize, Serialize};

/// Retailer address as NuOrder stores it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub line_1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_2: Option<String>,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub zip: String,
    pub country: String,
    #[serde(default)]
    pub shipping: bool,
    #[serde(default)]
    pub billing: bool,
}

/// Body of `PUT /api/company/new/force` (create or replace by code).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    /// Stable retailer code; the ERP customer id.
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    #[serde(default)]
    pub addresses: Vec<Address>,
    #[serde(default)]
    pub allow_bulk: bool,
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

impl Company {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Company {
            name: name.into(),
            code: code.into(),
            currency_code: None,
            addresses: Vec::new(),
            allow_bulk: false,
            active: true,
        }
    }
}
