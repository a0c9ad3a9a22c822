//! WHOIS information attached to a client
//!
//! The registry stores this data as-is; it never interprets the fields.

use serde::{Deserialize, Serialize};

/// Filtered WHOIS information of a client address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhoisInfo {
    /// City of the network owner
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    /// Country code of the network owner
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    /// Organization name of the network owner
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orgname: Option<String>,
}

impl WhoisInfo {
    /// Create an empty WHOIS record
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the city
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Set the country
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Set the organization name
    pub fn with_orgname(mut self, orgname: impl Into<String>) -> Self {
        self.orgname = Some(orgname.into());
        self
    }
}
